//! Combined date+time input from `datetime-local` form fields.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::TrackerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const SEPARATOR: char = 'T';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    /// Parse `YYYY-MM-DDTHH:MM[:SS]`. Blank input is `Ok(None)`.
    pub fn parse_input(raw: Option<&str>, field: &str) -> Result<Option<Self>, TrackerError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let invalid = || TrackerError::Validation(format!("Invalid date/time for {field}"));

        let (date, time) = raw.split_once(SEPARATOR).ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;
        let time = parse_time(time).ok_or_else(invalid)?;
        Ok(Some(Self { date, time }))
    }

    /// Split into the `(date, time)` column pair; `None` stores both as NULL.
    pub fn split(slot: Option<Self>) -> (Option<NaiveDate>, Option<NaiveTime>) {
        match slot {
            Some(s) => (Some(s.date), Some(s.time)),
            None => (None, None),
        }
    }

    /// Rebuild the form value from stored columns. A date without a time lands on midnight.
    pub fn join(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<String> {
        let date = date?;
        let time = time.map(format_time).unwrap_or_else(|| "00:00".to_string());
        Some(format!("{}{}{}", format_date(date), SEPARATOR, time))
    }
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

pub fn format_time(t: NaiveTime) -> String {
    if t.second() == 0 {
        t.format("%H:%M").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    }
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_datetime_local_value() {
        let slot = Slot::parse_input(Some("2024-05-01T10:00"), "talk")
            .unwrap()
            .unwrap();
        let (date, time) = Slot::split(Some(slot));
        assert_eq!(date.map(format_date).as_deref(), Some("2024-05-01"));
        assert_eq!(time.map(format_time).as_deref(), Some("10:00"));
    }

    #[test]
    fn blank_input_is_none() {
        assert_eq!(Slot::parse_input(None, "talk").unwrap(), None);
        assert_eq!(Slot::parse_input(Some(""), "talk").unwrap(), None);
        assert_eq!(Slot::parse_input(Some("   "), "talk").unwrap(), None);
        assert_eq!(Slot::split(None), (None, None));
    }

    #[test]
    fn seconds_are_optional_and_kept_when_non_zero() {
        let with_secs = Slot::parse_input(Some("2024-05-01T10:00:30"), "talk")
            .unwrap()
            .unwrap();
        assert_eq!(format_time(with_secs.time), "10:00:30");

        let zero_secs = Slot::parse_input(Some("2024-05-01T10:00:00"), "talk")
            .unwrap()
            .unwrap();
        assert_eq!(format_time(zero_secs.time), "10:00");
    }

    #[test]
    fn rejects_malformed_input() {
        let err = Slot::parse_input(Some("2024-05-01 10:00"), "assessment").unwrap_err();
        assert!(
            matches!(&err, TrackerError::Validation(msg) if msg == "Invalid date/time for assessment")
        );
        assert!(Slot::parse_input(Some("2024-13-01T10:00"), "talk").is_err());
        assert!(Slot::parse_input(Some("2024-05-01T25:00"), "talk").is_err());
        assert!(Slot::parse_input(Some("2024-05-01T"), "talk").is_err());
    }

    #[test]
    fn join_rebuilds_form_value() {
        let slot = Slot::parse_input(Some("2024-05-01T09:30"), "talk")
            .unwrap()
            .unwrap();
        let (d, t) = Slot::split(Some(slot));
        assert_eq!(Slot::join(d, t).as_deref(), Some("2024-05-01T09:30"));
        assert_eq!(Slot::join(d, None).as_deref(), Some("2024-05-01T00:00"));
        assert_eq!(Slot::join(None, t), None);
    }
}
