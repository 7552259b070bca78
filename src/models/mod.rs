pub mod course;
pub mod sync_record;
pub mod timetable;

pub use course::{Course, Day, PERIODS, Period, Semester, parse_period};
pub use sync_record::{LoadQuery, LoadResponse, SaveRequest, SaveResponse, SyncRecord, format_timestamp};
pub use timetable::{DaySchedule, SemesterData, SlotRef, Timetable};
