use std::sync::Arc;

use crate::store::SyncStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SyncStore>,
}
