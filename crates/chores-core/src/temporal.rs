//! # Week Windows
//!
//! The canonical 7-day window used for display and for deciding when the
//! rotation must advance.
//!
//! ## Policy
//!
//! A window starts on the most recent Monday at 00:00 in the timezone of the
//! instant it is computed from, and ends [`WEEK_LENGTH_DAYS`] calendar days
//! later at 00:00 in the same timezone. The window is half-open: `end` is the
//! first instant of the *next* week, so the rotation is stale once
//! `now >= end`.
//!
//! Both boundaries are computed from the local calendar date rather than by
//! adding a fixed number of hours, so a daylight-saving transition inside the
//! week does not shift the boundary off midnight.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Length of a rotation week in calendar days.
pub const WEEK_LENGTH_DAYS: i64 = 7;

/// `strftime` layout used when presenting window boundaries (e.g. `Oct-19-26`).
pub const DISPLAY_DATE_FORMAT: &str = "%b-%d-%y";

/// The `[start, end)` pair of instants defining "this week".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl WeekWindow {
    /// Compute the window containing `now`.
    ///
    /// Pure and total: the result depends only on `now` and its timezone.
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.naive_local().date();
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let next_monday = monday + Duration::days(WEEK_LENGTH_DAYS);

        Self {
            start: local_midnight(&tz, monday),
            end: local_midnight(&tz, next_monday),
        }
    }

    /// First instant of the week (Monday 00:00).
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// First instant after the week.
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Whether `now` falls inside `[start, end)`.
    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let now = now.with_timezone(&Utc);
        now >= self.start.with_timezone(&Utc) && now < self.end.with_timezone(&Utc)
    }

    /// Whether the week has ended at `now`.
    pub fn has_ended_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.with_timezone(&Utc) >= self.end.with_timezone(&Utc)
    }

    /// Time remaining until the window ends, zero if it already has.
    pub fn remaining_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> std::time::Duration {
        (self.end.with_timezone(&Utc) - now.with_timezone(&Utc))
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    /// `start` formatted with [`DISPLAY_DATE_FORMAT`].
    pub fn start_label(&self) -> String {
        self.start.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// `end` formatted with [`DISPLAY_DATE_FORMAT`].
    pub fn end_label(&self) -> String {
        self.end.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Resolve 00:00 on `date` in `tz`.
///
/// Where a DST transition makes midnight ambiguous the earlier instant wins;
/// where it skips midnight entirely the week starts at the first local hour
/// that exists.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<FixedOffset> {
    let midnight = date.and_time(NaiveTime::MIN);
    let resolved = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight));
    let offset = resolved.offset().fix();
    resolved.with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use chrono_tz::America::Havana;
    use chrono_tz::Asia::Tehran;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn wednesday_maps_to_monday_two_days_prior() {
        let window = WeekWindow::containing(&utc(2026, 10, 21, 15, 30));
        assert_eq!(window.start(), utc(2026, 10, 19, 0, 0));
        assert_eq!(window.start().weekday(), Weekday::Mon);
        assert_eq!(window.end(), utc(2026, 10, 26, 0, 0));
    }

    #[test]
    fn end_is_start_plus_policy_days() {
        let window = WeekWindow::containing(&utc(2026, 3, 4, 9, 0));
        assert_eq!(window.end() - window.start(), Duration::days(WEEK_LENGTH_DAYS));
    }

    #[test]
    fn monday_midnight_starts_its_own_week() {
        let now = utc(2026, 10, 19, 0, 0);
        let window = WeekWindow::containing(&now);
        assert_eq!(window.start(), now);
        assert!(window.contains(&now));
    }

    #[test]
    fn sunday_night_belongs_to_previous_monday() {
        let window = WeekWindow::containing(&utc(2026, 10, 25, 23, 59));
        assert_eq!(window.start(), utc(2026, 10, 19, 0, 0));
    }

    #[test]
    fn window_spans_month_and_year_boundaries() {
        // 2027-01-01 is a Friday.
        let window = WeekWindow::containing(&utc(2027, 1, 1, 12, 0));
        assert_eq!(window.start(), utc(2026, 12, 28, 0, 0));
        assert_eq!(window.end(), utc(2027, 1, 4, 0, 0));
    }

    #[test]
    fn local_timezone_decides_the_calendar_day() {
        // Sunday 20:00 UTC is already Monday 05:00 in UTC+9.
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = utc(2026, 10, 25, 20, 0).with_timezone(&tokyo);
        let window = WeekWindow::containing(&now);
        assert_eq!(window.start(), tokyo.with_ymd_and_hms(2026, 10, 26, 0, 0, 0).unwrap());
        assert_eq!(window.start().offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn has_ended_is_inclusive_of_end_instant() {
        let window = WeekWindow::containing(&utc(2026, 10, 21, 8, 0));
        assert!(!window.has_ended_at(&utc(2026, 10, 25, 23, 59)));
        assert!(window.has_ended_at(&utc(2026, 10, 26, 0, 0)));
        assert!(!window.contains(&utc(2026, 10, 26, 0, 0)));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let window = WeekWindow::containing(&utc(2026, 10, 21, 8, 0));
        assert_eq!(
            window.remaining_at(&utc(2026, 10, 25, 23, 0)),
            std::time::Duration::from_secs(3600)
        );
        assert_eq!(
            window.remaining_at(&utc(2026, 11, 2, 0, 0)),
            std::time::Duration::ZERO
        );
    }

    #[test]
    fn labels_use_display_format() {
        let window = WeekWindow::containing(&utc(2026, 10, 21, 8, 0));
        assert_eq!(window.start_label(), "Oct-19-26");
        assert_eq!(window.end_label(), "Oct-26-26");
    }

    #[test]
    fn computation_is_deterministic() {
        let now = utc(2026, 6, 17, 13, 45);
        assert_eq!(WeekWindow::containing(&now), WeekWindow::containing(&now));
    }

    #[test]
    fn skipped_monday_midnight_starts_at_first_existing_hour() {
        // Tehran jumped from 00:00 to 01:00 on Monday 2021-03-22.
        let now = Tehran.with_ymd_and_hms(2021, 3, 24, 12, 0, 0).unwrap();
        let window = WeekWindow::containing(&now);
        assert_eq!(window.start(), utc(2021, 3, 21, 20, 30));
        assert_eq!(window.start().offset().local_minus_utc(), 4 * 3600 + 1800);
        assert_eq!(window.start_label(), "Mar-22-21");
        assert_eq!(window.end(), utc(2021, 3, 28, 19, 30));
    }

    #[test]
    fn ambiguous_midnight_resolves_to_earlier_instant() {
        // Havana repeated 00:00..01:00 on 2024-11-03.
        let date = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        let midnight = local_midnight(&Havana, date);
        assert_eq!(midnight, utc(2024, 11, 3, 4, 0));
        assert_eq!(midnight.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn transition_inside_week_keeps_boundaries_on_midnight() {
        let now = Havana.with_ymd_and_hms(2024, 10, 30, 9, 0, 0).unwrap();
        let window = WeekWindow::containing(&now);
        assert_eq!(window.start(), utc(2024, 10, 28, 4, 0));
        assert_eq!(window.end(), utc(2024, 11, 4, 5, 0));
        assert_eq!(window.end() - window.start(), Duration::days(7) + Duration::hours(1));
        assert_eq!(window.end_label(), "Nov-04-24");
    }
}
