use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::client::http::SyncApi;
use crate::client::status::SyncStatus;
use crate::error::LocalError;
use crate::local::{DeviceStorage, cache, transfer};
use crate::models::{Course, Day, Period, Semester, SlotRef, Timetable};

struct Session {
    timetable: Timetable,
    sync_id: Option<String>,
    status: SyncStatus,
}

/// Client session: the current timetable, the sync id and the last status.
///
/// The session lock is never held across a network call, so several
/// actions can be in flight at once. Whichever completes last wins.
pub struct SyncOrchestrator {
    storage: Arc<dyn DeviceStorage>,
    api: Arc<dyn SyncApi>,
    session: Mutex<Session>,
}

impl SyncOrchestrator {
    /// Restores the cached timetable and sync id from device storage.
    pub fn start(storage: Arc<dyn DeviceStorage>, api: Arc<dyn SyncApi>) -> Self {
        let timetable = cache::load_timetable(storage.as_ref());
        let sync_id = cache::load_sync_id(storage.as_ref());
        info!("session started, sync id: {}", sync_id.as_deref().unwrap_or("<none>"));

        Self {
            storage,
            api,
            session: Mutex::new(Session {
                timetable,
                sync_id,
                status: SyncStatus::Idle,
            }),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn timetable(&self) -> Timetable {
        self.session().timetable.clone()
    }

    pub fn sync_id(&self) -> Option<String> {
        self.session().sync_id.clone()
    }

    pub fn status(&self) -> SyncStatus {
        self.session().status.clone()
    }

    pub fn place_course(&self, semester: Semester, day: Day, period: Period, course: Course) {
        self.update(|t| t.place_course(semester, day, period, course));
    }

    pub fn remove_course(&self, semester: Semester, day: Day, period: Period) {
        self.update(|t| t.remove_course(semester, day, period));
    }

    pub fn move_course(&self, semester: Semester, source: SlotRef, destination: SlotRef) {
        self.update(|t| t.move_course(semester, source, destination));
    }

    pub fn credits_for_semester(&self, semester: Semester) -> u32 {
        self.session().timetable.credits_for_semester(semester)
    }

    pub fn credits_by_semester(&self) -> BTreeMap<Semester, u32> {
        self.session().timetable.credits_by_semester()
    }

    pub fn total_credits(&self) -> u32 {
        self.session().timetable.total_credits()
    }

    /// Replaces the timetable with `edit`'s result and writes it to the cache.
    fn update(&self, edit: impl FnOnce(&Timetable) -> Timetable) {
        let mut session = self.session();
        let next = edit(&session.timetable);
        cache::save_timetable(self.storage.as_ref(), &next);
        session.timetable = next;
    }

    fn replace_timetable(&self, timetable: Timetable) {
        self.update(move |_| timetable);
    }

    fn set_status(&self, status: SyncStatus) -> SyncStatus {
        if status.is_error() {
            warn!("{}", status);
        } else {
            info!("{}", status);
        }
        self.session().status = status.clone();
        status
    }

    /// Uploads the timetable. A new or changed id from the server becomes
    /// the session's sync id. Failures leave the session untouched.
    pub async fn sync_to_server(&self) -> SyncStatus {
        let (payload, known_id) = {
            let mut session = self.session();
            session.status = SyncStatus::Syncing;
            (serde_json::to_value(&session.timetable), session.sync_id.clone())
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => return self.set_status(SyncStatus::Rejected(e.to_string())),
        };

        match self.api.save(known_id.as_deref(), &payload).await {
            Ok(id) => {
                if known_id.as_deref() != Some(id.as_str()) {
                    info!("adopting sync id {}", id);
                    cache::save_sync_id(self.storage.as_ref(), &id);
                    self.session().sync_id = Some(id);
                }
                self.set_status(SyncStatus::Saved { at: Local::now() })
            }
            Err(e) => self.set_status(e.into()),
        }
    }

    /// Downloads a timetable by `override_id` (e.g. typed in by the user), or
    /// by the current sync id when no override is given. On success the
    /// timetable is replaced and the id used becomes the session's sync id.
    pub async fn restore_from_server(&self, override_id: Option<&str>) -> SyncStatus {
        let override_id = override_id.map(str::trim).filter(|id| !id.is_empty());
        let id = {
            let mut session = self.session();
            match override_id.map(str::to_string).or_else(|| session.sync_id.clone()) {
                Some(id) => {
                    session.status = SyncStatus::Loading;
                    id
                }
                None => {
                    drop(session);
                    return self.set_status(SyncStatus::NoSyncId);
                }
            }
        };

        let record = match self.api.load(&id).await {
            Ok(record) => record,
            Err(e) => return self.set_status(e.into()),
        };

        let Some(timetable) = Timetable::from_value_lenient(&record.data) else {
            return self.set_status(SyncStatus::BadResponse(
                "stored data is not a timetable".to_string(),
            ));
        };

        self.replace_timetable(timetable);
        cache::save_sync_id(self.storage.as_ref(), &id);
        self.session().sync_id = Some(id);
        info!("restored timetable saved at {}", record.timestamp);

        self.set_status(SyncStatus::Loaded { at: Local::now() })
    }

    /// Replaces the timetable with the contents of an exported file. `source`
    /// names the file in the status message.
    pub fn import_text(&self, source: &str, text: &str) -> SyncStatus {
        self.apply_import(source, transfer::import_from_str(text))
    }

    pub fn import_file(&self, path: &Path) -> SyncStatus {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.apply_import(&source, transfer::import_from_path(path))
    }

    fn apply_import(&self, source: &str, result: Result<Timetable, LocalError>) -> SyncStatus {
        match result {
            Ok(timetable) => {
                self.replace_timetable(timetable);
                self.set_status(SyncStatus::Imported { source: source.to_string() })
            }
            Err(e) => self.set_status(SyncStatus::import_failed(&e)),
        }
    }

    /// Writes the timetable to `dir` under the dated export name.
    pub fn export_to_dir(&self, dir: &Path, date: NaiveDate) -> SyncStatus {
        let timetable = self.timetable();
        match transfer::export_to_dir(dir, &timetable, date) {
            Ok(path) => self.set_status(SyncStatus::Exported { path }),
            Err(e) => self.set_status(SyncStatus::ExportFailed(e.to_string())),
        }
    }

    pub fn export_to_path(&self, path: &Path) -> SyncStatus {
        let timetable = self.timetable();
        match transfer::export_to_path(path, &timetable) {
            Ok(()) => self.set_status(SyncStatus::Exported { path: path.to_path_buf() }),
            Err(e) => self.set_status(SyncStatus::ExportFailed(e.to_string())),
        }
    }
}
