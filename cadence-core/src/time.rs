//! Calendar utilities: timezone-aware calendar-unit arithmetic.
//!
//! Timestamps are stored in UTC. Every "calendar" question is answered on the
//! wall clock of an explicit IANA zone, so "+1 month" and "same day" mean what
//! the user sees on their calendar rather than fixed 24h multiples.

use anyhow::Result;
use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Calendar date of `ts` as seen in `tz`.
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Map a wall-clock time in `tz` back to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap do not exist and yield `None`.
pub fn local_to_utc(ndt: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&ndt)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Apply a wall-clock shift in `tz`. If the shifted wall time does not exist
/// locally the same shift is applied on the UTC clock instead; if even that
/// overflows `ts` is returned untouched.
fn shift_wall_clock(
    ts: DateTime<Utc>,
    tz: Tz,
    shift: impl Fn(NaiveDateTime) -> Option<NaiveDateTime>,
) -> DateTime<Utc> {
    let local = ts.with_timezone(&tz).naive_local();
    shift(local)
        .and_then(|ndt| local_to_utc(ndt, tz))
        .or_else(|| shift(ts.naive_utc()).map(|ndt| ndt.and_utc()))
        .unwrap_or(ts)
}

pub fn add_calendar_days(ts: DateTime<Utc>, days: u64, tz: Tz) -> DateTime<Utc> {
    shift_wall_clock(ts, tz, |ndt| ndt.checked_add_days(Days::new(days)))
}

pub fn add_calendar_weeks(ts: DateTime<Utc>, weeks: u64, tz: Tz) -> DateTime<Utc> {
    add_calendar_days(ts, weeks.saturating_mul(7), tz)
}

/// Calendar-month addition. The day of month is kept where it exists and
/// clamped to the month's last day otherwise (Jan 31 + 1 month = Feb 28/29).
pub fn add_calendar_months(ts: DateTime<Utc>, months: u32, tz: Tz) -> DateTime<Utc> {
    shift_wall_clock(ts, tz, |ndt| ndt.checked_add_months(Months::new(months)))
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
/// Times of day are ignored: 23:59 to 00:01 the next day is 1.
pub fn calendar_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>, tz: Tz) -> i64 {
    (local_date(later, tz) - local_date(earlier, tz)).num_days()
}

/// Calendar months from `earlier` to `later`, ignoring day of month:
/// Jan 31 to Feb 1 is 1.
pub fn calendar_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>, tz: Tz) -> i64 {
    let month_index = |d: NaiveDate| d.year() as i64 * 12 + d.month0() as i64;
    month_index(local_date(later, tz)) - month_index(local_date(earlier, tz))
}

pub fn is_same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    local_date(a, tz) == local_date(b, tz)
}

/// Next occurrence of `target` strictly after `today`.
///
/// Asking for today's own weekday yields the date one week out, never today.
pub fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let from = today.weekday().num_days_from_sunday();
    let to = target.num_days_from_sunday();
    let ahead = match (to + 7 - from) % 7 {
        0 => 7,
        n => n,
    };
    today.checked_add_days(Days::new(ahead as u64)).unwrap_or(today)
}

/// `YYYY-MM-DD` as shown in a date input.
pub fn format_date_for_input(ts: DateTime<Utc>, tz: Tz) -> String {
    local_date(ts, tz).format("%Y-%m-%d").to_string()
}

/// Parse a local time like "2024-04-03 07:30" (or a bare "2024-04-03", read as
/// midnight) in an IANA zone like "America/Chicago", returning UTC.
pub fn parse_local_datetime_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let local = local.trim();
    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    local_to_utc(ndt, tz)
        .ok_or_else(|| anyhow::anyhow!("nonexistent local time (DST?): {local} {tz}"))
}
