use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" for everything that looks at wall-clock time.
///
/// Scoring and statistics never call `Local::now()` directly. They take a
/// `&dyn Clock` so tests (and `--now`) can pin time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    /// Freeze at noon on the given day. Panics on an invalid date.
    pub fn at_noon(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        FixedClock(date.and_hms_opt(12, 0, 0).expect("valid time"))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
