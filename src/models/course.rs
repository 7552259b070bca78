use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocalError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub credits: u32,
}

impl Course {
    /// Form-side validation. The timetable operations themselves accept any course.
    pub fn new(name: &str, credits: u32) -> Result<Self, LocalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LocalError::InvalidCourse("科目名を入力してください".to_string()));
        }
        if credits == 0 {
            return Err(LocalError::InvalidCourse(format!(
                "単位数は1以上で指定してください: {}",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            credits,
        })
    }
}

/// 学期 (1年春学期 .. 4年秋学期)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "1年春学期")]
    Y1Spring,
    #[serde(rename = "1年秋学期")]
    Y1Fall,
    #[serde(rename = "2年春学期")]
    Y2Spring,
    #[serde(rename = "2年秋学期")]
    Y2Fall,
    #[serde(rename = "3年春学期")]
    Y3Spring,
    #[serde(rename = "3年秋学期")]
    Y3Fall,
    #[serde(rename = "4年春学期")]
    Y4Spring,
    #[serde(rename = "4年秋学期")]
    Y4Fall,
}

impl Semester {
    pub const ALL: [Semester; 8] = [
        Semester::Y1Spring,
        Semester::Y1Fall,
        Semester::Y2Spring,
        Semester::Y2Fall,
        Semester::Y3Spring,
        Semester::Y3Fall,
        Semester::Y4Spring,
        Semester::Y4Fall,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Semester::ALL.into_iter().find(|semester| semester.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            Semester::Y1Spring => "1年春学期",
            Semester::Y1Fall => "1年秋学期",
            Semester::Y2Spring => "2年春学期",
            Semester::Y2Fall => "2年秋学期",
            Semester::Y3Spring => "3年春学期",
            Semester::Y3Fall => "3年秋学期",
            Semester::Y4Spring => "4年春学期",
            Semester::Y4Fall => "4年秋学期",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the label itself or a 1-based index ("3" is 2年春学期).
impl FromStr for Semester {
    type Err = LocalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(semester) = Semester::from_label(s) {
            return Ok(semester);
        }

        s.parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| Semester::ALL.get(index).copied())
            .ok_or_else(|| LocalError::InvalidCoordinate(format!("不明な学期です: {}", s)))
    }
}

/// 曜日
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "月")]
    Mon,
    #[serde(rename = "火")]
    Tue,
    #[serde(rename = "水")]
    Wed,
    #[serde(rename = "木")]
    Thu,
    #[serde(rename = "金")]
    Fri,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn from_label(label: &str) -> Option<Self> {
        Day::ALL.into_iter().find(|day| day.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "月",
            Day::Tue => "火",
            Day::Wed => "水",
            Day::Thu => "木",
            Day::Fri => "金",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = LocalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "月" | "mon" | "monday" => Day::Mon,
            "火" | "tue" | "tuesday" => Day::Tue,
            "水" | "wed" | "wednesday" => Day::Wed,
            "木" | "thu" | "thursday" => Day::Thu,
            "金" | "fri" | "friday" => Day::Fri,
            other => {
                return Err(LocalError::InvalidCoordinate(format!("不明な曜日です: {}", other)));
            }
        };
        Ok(day)
    }
}

/// 時限. Valid values are listed in [`PERIODS`].
pub type Period = u8;

pub const PERIODS: [Period; 5] = [1, 2, 3, 4, 5];

pub fn parse_period(s: &str) -> Result<Period, LocalError> {
    s.trim()
        .parse::<Period>()
        .ok()
        .filter(|p| PERIODS.contains(p))
        .ok_or_else(|| LocalError::InvalidCoordinate(format!("不明な時限です: {}", s)))
}
