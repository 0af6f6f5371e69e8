//! Client-side record views
//!
//! Pure filters and orderings over collections that were already fetched.
//! None of these touch the network or the token store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use portal_domain::{Appointment, LabResult, Medication, VisitSummary};

/// Records that carry a primary timestamp
pub trait Dated {
    fn date(&self) -> DateTime<Utc>;
}

impl Dated for LabResult {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Dated for VisitSummary {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Dated for Appointment {
    fn date(&self) -> DateTime<Utc> {
        self.start
    }
}

/// Medications without a start date sort as the Unix epoch.
impl Dated for Medication {
    fn date(&self) -> DateTime<Utc> {
        self.start_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Inclusive calendar-date window; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// True if `instant` falls between the start of `start` and the end of `end`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start.and_time(NaiveTime::MIN).and_utc() {
                return false;
            }
        }
        if let Some(end) = self.end {
            // first instant of the following day is excluded
            match end.succ_opt() {
                Some(next) if instant >= next.and_time(NaiveTime::MIN).and_utc() => return false,
                _ => {}
            }
        }
        true
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

pub fn filter_by_date_range<T: Dated + Clone>(records: &[T], range: &DateRange) -> Vec<T> {
    records.iter().filter(|record| range.contains(record.date())).cloned().collect()
}

/// Stable sort by [`Dated::date`]
pub fn sort_by_date<T: Dated>(records: &mut [T], order: SortOrder) {
    match order {
        SortOrder::NewestFirst => records.sort_by(|a, b| b.date().cmp(&a.date())),
        SortOrder::OldestFirst => records.sort_by_key(|record| record.date()),
    }
}

/// Case-insensitive substring match on the test name; a blank query matches all
pub fn search_labs(labs: &[LabResult], query: &str) -> Vec<LabResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return labs.to_vec();
    }
    labs.iter().filter(|lab| lab.test_name.to_lowercase().contains(&needle)).cloned().collect()
}

pub fn abnormal_labs(labs: &[LabResult]) -> Vec<LabResult> {
    labs.iter().filter(|lab| lab.is_abnormal()).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MedicationView {
    #[default]
    Active,
    All,
}

pub fn filter_medications(medications: &[Medication], view: MedicationView) -> Vec<Medication> {
    match view {
        MedicationView::All => medications.to_vec(),
        MedicationView::Active => medications.iter().filter(|m| m.is_active()).cloned().collect(),
    }
}

/// Appointments starting at or after `now`, soonest first
pub fn upcoming_appointments(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Appointment> {
    let mut upcoming: Vec<Appointment> =
        appointments.iter().filter(|appt| appt.start >= now).cloned().collect();
    sort_by_date(&mut upcoming, SortOrder::OldestFirst);
    upcoming
}

/// Appointments that started before `now`, most recent first
pub fn past_appointments(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Appointment> {
    let mut past: Vec<Appointment> =
        appointments.iter().filter(|appt| appt.start < now).cloned().collect();
    sort_by_date(&mut past, SortOrder::NewestFirst);
    past
}
