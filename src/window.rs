use crate::models::DailyEntry;
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

pub const STANDARD_LAST_N: [usize; 3] = [7, 10, 30];

fn within(entries: &[DailyEntry], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DailyEntry> {
    entries
        .iter()
        .filter(|entry| entry.timestamp >= start && entry.timestamp <= end)
        .cloned()
        .collect()
}

pub fn weekly_start(reference: DateTime<Utc>) -> DateTime<Utc> {
    reference - Duration::days(7)
}

/// Midnight of the same day-of-month one calendar month earlier. Days past
/// the end of the shorter month clamp to its last day.
pub fn monthly_start(reference: DateTime<Utc>) -> DateTime<Utc> {
    let date = reference.date_naive();
    let start = date
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN);
    start.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn weekly(entries: &[DailyEntry], reference: DateTime<Utc>) -> Vec<DailyEntry> {
    within(entries, weekly_start(reference), reference)
}

pub fn monthly(entries: &[DailyEntry], reference: DateTime<Utc>) -> Vec<DailyEntry> {
    within(entries, monthly_start(reference), reference)
}

pub fn last_n(entries: &[DailyEntry], n: usize) -> Vec<DailyEntry> {
    let skip = entries.len().saturating_sub(n);
    entries[skip..].to_vec()
}

pub fn on_date(entries: &[DailyEntry], date: NaiveDate) -> Vec<DailyEntry> {
    entries
        .iter()
        .filter(|entry| entry.date() == date)
        .cloned()
        .collect()
}
