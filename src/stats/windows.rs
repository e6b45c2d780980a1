use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

/// Comparison windows anchored at a single "now".
///
/// Month arithmetic clamps to the end of shorter months (Mar 31 minus one
/// month is Feb 28/29).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub today: NaiveDate,
    pub yesterday: NaiveDate,
    pub this_month: NaiveDateTime,
    pub last_month: NaiveDateTime,
    pub this_week: NaiveDateTime,
    pub last_week: NaiveDateTime,
}

impl Windows {
    pub fn at(now: NaiveDateTime) -> Self {
        let today = now.date();
        let this_month = now.checked_sub_months(Months::new(1)).unwrap_or(now);
        let this_week = now - Duration::days(7);
        Self {
            today,
            yesterday: today.pred_opt().unwrap_or(today),
            this_month,
            last_month: this_month.checked_sub_months(Months::new(1)).unwrap_or(this_month),
            this_week,
            last_week: this_week - Duration::days(7),
        }
    }

    pub fn is_today(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d.date() == self.today)
    }

    pub fn is_yesterday(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d.date() == self.yesterday)
    }

    /// On or after the start of the trailing month. No upper bound.
    pub fn in_this_month(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d >= self.this_month)
    }

    pub fn in_last_month(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d >= self.last_month && d < self.this_month)
    }

    /// On or after the start of the trailing 7 days. No upper bound.
    pub fn in_this_week(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d >= self.this_week)
    }

    pub fn in_last_week(&self, date: Option<NaiveDateTime>) -> bool {
        date.is_some_and(|d| d >= self.last_week && d < self.this_week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        let w = Windows::at(at(2025, 6, 15, 12));
        assert_eq!(w.today, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(w.yesterday, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
        assert_eq!(w.this_month, at(2025, 5, 15, 12));
        assert_eq!(w.last_month, at(2025, 4, 15, 12));
        assert_eq!(w.this_week, at(2025, 6, 8, 12));
        assert_eq!(w.last_week, at(2025, 6, 1, 12));
    }

    #[test]
    fn test_month_end_clamps() {
        let w = Windows::at(at(2025, 3, 31, 9));
        assert_eq!(w.this_month, at(2025, 2, 28, 9));
        assert_eq!(w.last_month, at(2025, 1, 28, 9));
    }

    #[test]
    fn test_year_boundary() {
        let w = Windows::at(at(2025, 1, 1, 0));
        assert_eq!(w.yesterday, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(w.this_month, at(2024, 12, 1, 0));
    }

    #[test]
    fn test_membership() {
        let w = Windows::at(at(2025, 6, 15, 12));
        assert!(w.is_today(Some(at(2025, 6, 15, 0))));
        assert!(w.is_today(Some(at(2025, 6, 15, 23))));
        assert!(!w.is_today(None));
        assert!(w.is_yesterday(Some(at(2025, 6, 14, 8))));

        assert!(w.in_this_week(Some(at(2025, 6, 8, 12))));
        assert!(!w.in_this_week(Some(at(2025, 6, 8, 11))));
        assert!(w.in_last_week(Some(at(2025, 6, 8, 11))));
        assert!(!w.in_last_week(Some(at(2025, 6, 8, 12))));
        assert!(!w.in_last_week(Some(at(2025, 5, 31, 12))));

        assert!(w.in_this_month(Some(at(2025, 6, 20, 0))));
        assert!(w.in_last_month(Some(at(2025, 5, 1, 0))));
        assert!(!w.in_last_month(None));
    }
}
