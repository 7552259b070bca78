use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::course::{Course, Day, PERIODS, Period, Semester};

/// period -> course, `None` is an empty slot
pub type DaySchedule = BTreeMap<Period, Option<Course>>;

pub type SemesterData = BTreeMap<Day, DaySchedule>;

/// A (day, period) cell within one semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub day: Day,
    pub period: Period,
}

impl SlotRef {
    pub fn new(day: Day, period: Period) -> Self {
        Self { day, period }
    }
}

/// All semesters of a course plan.
///
/// Serialized as nested JSON objects keyed by semester label, day label and
/// period number: `{"1年春学期": {"月": {"1": null, ...}, ...}, ...}`.
///
/// Every operation returns a new tree and leaves `self` untouched, so a value
/// being written to the device cache never aliases the one being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetable(BTreeMap<Semester, SemesterData>);

impl Timetable {
    /// Fully dense timetable with every slot empty.
    pub fn new_initial() -> Self {
        let mut timetable = Self::default();
        timetable.ensure_dense();
        timetable
    }

    /// Fills every missing semester, day and period with an empty slot.
    /// Existing entries, including out-of-range periods, are kept as is.
    pub fn ensure_dense(&mut self) {
        for semester in Semester::ALL {
            let semester_data = self.0.entry(semester).or_default();
            for day in Day::ALL {
                let schedule = semester_data.entry(day).or_default();
                for period in PERIODS {
                    schedule.entry(period).or_insert(None);
                }
            }
        }
    }

    /// Builds a timetable from any JSON object, keeping whatever matches the
    /// semester/day/period layout. Unknown labels and non-numeric period keys
    /// are skipped, slots that are not a course become empty. Returns `None`
    /// only when `value` is not an object.
    pub fn from_value_lenient(value: &Value) -> Option<Self> {
        let semesters = value.as_object()?;
        let mut timetable = Self::default();

        for (label, days) in semesters {
            let Some(semester) = Semester::from_label(label) else {
                continue;
            };
            let Some(days) = days.as_object() else {
                continue;
            };
            let semester_data = timetable.0.entry(semester).or_default();

            for (label, periods) in days {
                let Some(day) = Day::from_label(label) else {
                    continue;
                };
                let Some(periods) = periods.as_object() else {
                    continue;
                };
                let schedule = semester_data.entry(day).or_default();

                for (key, slot) in periods {
                    let Ok(period) = key.trim().parse::<Period>() else {
                        continue;
                    };
                    let course = Course::deserialize(slot).ok();
                    schedule.insert(period, course);
                }
            }
        }

        timetable.ensure_dense();
        Some(timetable)
    }

    pub fn is_dense(&self) -> bool {
        Semester::ALL.iter().all(|semester| {
            self.0.get(semester).is_some_and(|data| {
                Day::ALL.iter().all(|day| {
                    data.get(day)
                        .is_some_and(|schedule| PERIODS.iter().all(|p| schedule.contains_key(p)))
                })
            })
        })
    }

    pub fn semester(&self, semester: Semester) -> Option<&SemesterData> {
        self.0.get(&semester)
    }

    pub fn get(&self, semester: Semester, day: Day, period: Period) -> Option<&Course> {
        self.0
            .get(&semester)
            .and_then(|data| data.get(&day))
            .and_then(|schedule| schedule.get(&period))
            .and_then(|slot| slot.as_ref())
    }

    pub fn place_course(&self, semester: Semester, day: Day, period: Period, course: Course) -> Self {
        let mut next = self.clone();
        *next.slot_mut(semester, day, period) = Some(course);
        next
    }

    pub fn remove_course(&self, semester: Semester, day: Day, period: Period) -> Self {
        let mut next = self.clone();
        *next.slot_mut(semester, day, period) = None;
        next
    }

    /// Swaps the contents of two slots. Moving onto an occupied slot exchanges
    /// both courses, moving onto an empty slot leaves the source empty.
    pub fn move_course(&self, semester: Semester, source: SlotRef, destination: SlotRef) -> Self {
        let mut next = self.clone();
        if source == destination {
            return next;
        }
        let from = next.slot_mut(semester, source.day, source.period).take();
        let to = std::mem::replace(next.slot_mut(semester, destination.day, destination.period), from);
        *next.slot_mut(semester, source.day, source.period) = to;
        next
    }

    /// Sum of credits over the occupied slots of one semester, 0 when the
    /// semester is absent.
    pub fn credits_for_semester(&self, semester: Semester) -> u32 {
        self.0
            .get(&semester)
            .map(|data| {
                data.values()
                    .flat_map(|schedule| schedule.values())
                    .flatten()
                    .fold(0u32, |total, course| total.saturating_add(course.credits))
            })
            .unwrap_or(0)
    }

    pub fn credits_by_semester(&self) -> BTreeMap<Semester, u32> {
        Semester::ALL
            .iter()
            .map(|semester| (*semester, self.credits_for_semester(*semester)))
            .collect()
    }

    /// Totals saturate at `u32::MAX` rather than overflow.
    pub fn total_credits(&self) -> u32 {
        self.credits_by_semester()
            .values()
            .fold(0u32, |total, credits| total.saturating_add(*credits))
    }

    fn slot_mut(&mut self, semester: Semester, day: Day, period: Period) -> &mut Option<Course> {
        self.0
            .entry(semester)
            .or_default()
            .entry(day)
            .or_default()
            .entry(period)
            .or_insert(None)
    }
}
