use chrono::{Datelike, NaiveDate};

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// The previous calendar month relative to `today`.
    pub fn previous_month(today: NaiveDate) -> Self {
        let to = month_start(today) - chrono::Duration::days(1);
        Self {
            from: month_start(to),
            to,
        }
    }

    /// January 1st of the range's final year through the range end.
    pub fn year_to_date(&self) -> Self {
        Self {
            from: NaiveDate::from_ymd_opt(self.to.year(), 1, 1).unwrap(),
            to: self.to,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Human-readable label, e.g. "January 2026".
    pub fn display_label(&self) -> String {
        self.from.format("%B %Y").to_string()
    }

    pub fn from_str(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn to_str(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}
