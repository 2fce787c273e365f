//! Natural-language task metadata extraction.
//!
//! Best-effort, deterministic pattern matching over a typed task title. Six
//! passes run in a fixed order (date, time, priority, duration, recurring,
//! location), each on the text the previous pass left behind, so a phrase
//! consumed by an earlier pass is never seen by a later one.
//!
//! Each pass is an ordered rule table. The first rule that yields a value
//! decides the field; then every phrase any rule of that pass matches is
//! stripped, so running the extractor again on the cleaned title finds
//! nothing new. Location is the exception: it is a low-confidence hint
//! (`at`/`in` are everywhere) and only strips the phrase it reported.
//!
//! Removing a location can join words into a new scheduling phrase
//! ("in at home 2 weeks" leaves "in 2 weeks"), so when location strips
//! anything the first five passes run once more over what is left. Fields
//! already decided keep their value; the second round only fills gaps and
//! strips.

use std::ops::Range;
use std::sync::OnceLock;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::task::{Priority, Task};
use crate::time::{local_to_utc, next_weekday};

/// Fields pulled out of a free-text title. Absent fields did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTaskData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_due_date: Option<NaiveDate>,
    /// Time expression as typed, e.g. "5pm" or "17:30".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_priority: Option<Priority>,
    /// e.g. "30 minutes", "2 hours".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_duration: Option<String>,
    /// Only presence is reported, not the cadence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_location: Option<String>,
    pub cleaned_title: String,
}

impl ParsedTaskData {
    /// True when no field was extracted (the cleaned title may still be non-empty).
    pub fn is_empty(&self) -> bool {
        self.extracted_due_date.is_none()
            && self.extracted_time.is_none()
            && self.extracted_priority.is_none()
            && self.extracted_duration.is_none()
            && self.extracted_recurring.is_none()
            && self.extracted_location.is_none()
    }

    /// Pre-fill a task from the extracted fields.
    ///
    /// The due date lands at the extracted time of day in `tz`, or local
    /// midnight when there is no usable time. Recurrence is left alone since
    /// the cadence is not known.
    pub fn apply_to(&self, task: &Task, tz: Tz) -> Task {
        let mut out = task.clone();

        if !self.cleaned_title.is_empty() {
            out.title = self.cleaned_title.clone();
        }
        if let Some(date) = self.extracted_due_date {
            let time = self
                .extracted_time
                .as_deref()
                .and_then(parse_time_of_day)
                .unwrap_or(NaiveTime::MIN);
            out.due_date = local_to_utc(date.and_time(time), tz)
                .or_else(|| local_to_utc(date.and_time(NaiveTime::MIN), tz))
                .or(out.due_date);
        }
        if let Some(p) = self.extracted_priority {
            out.priority = Some(p);
        }
        if let Some(d) = &self.extracted_duration {
            out.estimated_duration = Some(d.clone());
        }
        if let Some(l) = &self.extracted_location {
            out.location = Some(l.clone());
        }
        out
    }
}

/// Extract scheduling metadata from `input`. "Today" is `now`'s calendar date.
///
/// Never fails; an empty or whitespace-only input yields an empty result.
pub fn parse_natural_language(input: &str, now: DateTime<Tz>) -> ParsedTaskData {
    let today = now.date_naive();
    let mut out = ParsedTaskData::default();

    let text = scheduling_passes(collapse_whitespace(input), today, &mut out);
    let (extracted_location, text) = LOCATION_RULES.extract(&text, today);
    let text = match extracted_location {
        Some(_) => scheduling_passes(text, today, &mut out),
        None => text,
    };

    out.extracted_location = extracted_location;
    out.cleaned_title = text.trim().to_string();
    out
}

/// Date, time, priority, duration and recurring passes, in that order.
/// A field that is already set keeps its value.
fn scheduling_passes(text: String, today: NaiveDate, out: &mut ParsedTaskData) -> String {
    let (date, text) = DATE_RULES.extract(&text, today);
    out.extracted_due_date = out.extracted_due_date.or(date);
    let (time, text) = TIME_RULES.extract(&text, today);
    out.extracted_time = out.extracted_time.take().or(time);
    let (priority, text) = PRIORITY_RULES.extract(&text, today);
    out.extracted_priority = out.extracted_priority.or(priority);
    let (duration, text) = DURATION_RULES.extract(&text, today);
    out.extracted_duration = out.extracted_duration.take().or(duration);
    let (recurring, text) = RECURRING_RULES.extract(&text, today);
    out.extracted_recurring = out.extracted_recurring.or(recurring);
    text
}

/// Wall-clock time from an extracted expression: "5pm", "5:30 pm", "17:30", "5".
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (h, m) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&h) {
                return None;
            }
            h % 12 + if pm { 12 } else { 0 }
        }
        None => h,
    };
    NaiveTime::from_hms_opt(hour, m, 0)
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

type Handler<T> = fn(&Captures<'_>, NaiveDate) -> Option<T>;

struct Rule<T: 'static> {
    pattern: &'static str,
    handler: Handler<T>,
}

impl<T: 'static> Rule<T> {
    const fn new(pattern: &'static str, handler: Handler<T>) -> Self {
        Self { pattern, handler }
    }
}

#[derive(Clone, Copy)]
enum Strip {
    /// Remove every phrase any rule of the pass matches.
    All,
    /// Remove only the phrase that produced the value.
    Winner,
}

struct RuleSet<T: 'static> {
    name: &'static str,
    strip: Strip,
    rules: &'static [Rule<T>],
    compiled: OnceLock<Vec<(Regex, Handler<T>)>>,
}

impl<T: 'static> RuleSet<T> {
    const fn new(name: &'static str, strip: Strip, rules: &'static [Rule<T>]) -> Self {
        Self {
            name,
            strip,
            rules,
            compiled: OnceLock::new(),
        }
    }

    fn compiled(&self) -> &[(Regex, Handler<T>)] {
        self.compiled.get_or_init(|| {
            self.rules
                .iter()
                .filter_map(|rule| match Regex::new(rule.pattern) {
                    Ok(re) => Some((re, rule.handler)),
                    Err(e) => {
                        warn!(pass = self.name, pattern = rule.pattern, "rule dropped: {e}");
                        None
                    }
                })
                .collect()
        })
    }

    /// Run the pass over `text`, returning the value (if any) and the text
    /// left after stripping.
    fn extract(&self, text: &str, today: NaiveDate) -> (Option<T>, String) {
        let rules = self.compiled();

        let winner = rules.iter().enumerate().find_map(|(idx, (re, handler))| {
            re.captures_iter(text).find_map(|caps| {
                let span = caps.get(0)?.range();
                handler(&caps, today).map(|value| (idx, span, value))
            })
        });

        let Some((idx, span, value)) = winner else {
            return (None, text.to_string());
        };
        trace!(pass = self.name, rule = idx, matched = &text[span.clone()], "rule matched");

        let rest = match self.strip {
            Strip::All => self.strip_all(text),
            Strip::Winner => remove_span(text, span),
        };
        (Some(value), rest)
    }

    /// Remove every match of every rule, repeating until nothing changes:
    /// one removal can expose another (`"! !x"` leaves `"!x"`).
    fn strip_all(&self, text: &str) -> String {
        let mut current = collapse_whitespace(text);
        loop {
            let next = self.compiled().iter().fold(current.clone(), |acc, (re, _)| {
                collapse_whitespace(&re.replace_all(&acc, " "))
            });
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

fn remove_span(text: &str, span: Range<usize>) -> String {
    collapse_whitespace(&format!("{} {}", &text[..span.start], &text[span.end..]))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Numeric capture, falling back to 1 when absent or unparseable.
fn count(caps: &Captures<'_>, group: &str) -> u64 {
    caps.name(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1)
}

// -- date --------------------------------------------------------------------

const DATE: &[Rule<NaiveDate>] = &[
    Rule::new(r"(?i)\bday\s+after\s+tomorrow\b", day_after_tomorrow),
    Rule::new(r"(?i)\btomorrow\b", tomorrow),
    Rule::new(r"(?i)\btoday\b", today),
    Rule::new(r"(?i)\byesterday\b", yesterday),
    Rule::new(
        r"(?i)\b(?:(?:this|next)\s+)?(?P<day>sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b",
        weekday,
    ),
    Rule::new(r"(?i)\bin\s+(?P<n>\d+)\s+days?\b", in_days),
    Rule::new(r"(?i)\bin\s+a\s+week\b", in_a_week),
    Rule::new(r"(?i)\bin\s+(?P<n>\d+)\s+weeks?\b", in_weeks),
    Rule::new(
        r"\b(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})\b",
        numeric_date,
    ),
    Rule::new(
        r"(?i)\b(?P<month>\d{1,2})[/-](?P<day>\d{1,2})(?:[/-](?P<year>\d{4}|\d{2}))?\b",
        numeric_date,
    ),
];

static DATE_RULES: RuleSet<NaiveDate> = RuleSet::new("date", Strip::All, DATE);

fn day_after_tomorrow(_: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(2))
}

fn tomorrow(_: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(1))
}

fn today(_: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    Some(today)
}

fn yesterday(_: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(1))
}

fn weekday(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let target: Weekday = caps.name("day")?.as_str().parse().ok()?;
    Some(next_weekday(today, target))
}

fn in_days(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(count(caps, "n")))
}

fn in_a_week(_: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(7))
}

fn in_weeks(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(count(caps, "n").saturating_mul(7)))
}

/// `YYYY-MM-DD` or `MM/DD[/YYYY]`; the year defaults to the current one and two-digit years
/// are read as 20YY. Impossible dates (13/45) yield nothing.
fn numeric_date(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    let month: u32 = caps.name("month")?.as_str().parse().ok()?;
    let day: u32 = caps.name("day")?.as_str().parse().ok()?;
    let year = match caps.name("year") {
        Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
        Some(y) => y.as_str().parse().ok()?,
        None => today.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

// -- time --------------------------------------------------------------------

const TIME: &[Rule<String>] = &[
    Rule::new(r"(?i)\b(?:at\s+)?(?P<time>\d{1,2}:\d{2}\s*(?:am|pm))\b", time_expr),
    Rule::new(r"(?i)\b(?:at\s+)?(?P<time>\d{1,2}\s*(?:am|pm))\b", time_expr),
    Rule::new(r"(?i)\b(?:at\s+)?(?P<time>(?:[01]?\d|2[0-3]):[0-5]\d)\b", time_expr),
    Rule::new(r"(?i)\bat\s+(?P<time>\d{1,2})\b", time_expr),
];

static TIME_RULES: RuleSet<String> = RuleSet::new("time", Strip::All, TIME);

fn time_expr(caps: &Captures<'_>, _: NaiveDate) -> Option<String> {
    caps.name("time").map(|m| m.as_str().trim().to_string())
}

// -- priority ----------------------------------------------------------------

const PRIORITY: &[Rule<Priority>] = &[
    Rule::new(
        r"(?i)\b(?:urgent|critical|asap|high\s+priority|important|emergency)\b",
        high,
    ),
    Rule::new(r"^\s*!{2,}(?:\s*!)*", high),
    Rule::new(r"(?i)\b(?:medium\s+priority|normal|regular)\b", medium),
    Rule::new(r"^\s*!(?:\s*!)*", medium),
    Rule::new(
        r"(?i)\b(?:low\s+priority|when\s+i\s+have\s+time|eventually|someday)\b",
        low,
    ),
];

static PRIORITY_RULES: RuleSet<Priority> = RuleSet::new("priority", Strip::All, PRIORITY);

fn high(_: &Captures<'_>, _: NaiveDate) -> Option<Priority> {
    Some(Priority::High)
}

fn medium(_: &Captures<'_>, _: NaiveDate) -> Option<Priority> {
    Some(Priority::Medium)
}

fn low(_: &Captures<'_>, _: NaiveDate) -> Option<Priority> {
    Some(Priority::Low)
}

// -- duration ----------------------------------------------------------------

const DURATION: &[Rule<String>] = &[
    Rule::new(
        r"(?i)\b(?:for\s+)?(?P<n>\d+)\s*(?P<unit>hours?|hrs?|minutes?|mins?|days?)\b",
        numeric_duration,
    ),
    Rule::new(r"(?i)\b(?:quick|fast)\b", quick),
    Rule::new(r"(?i)\blong\b", long),
];

static DURATION_RULES: RuleSet<String> = RuleSet::new("duration", Strip::All, DURATION);

fn numeric_duration(caps: &Captures<'_>, _: NaiveDate) -> Option<String> {
    let unit = caps.name("unit")?.as_str().to_lowercase();
    Some(format!("{} {}", count(caps, "n"), unit))
}

fn quick(_: &Captures<'_>, _: NaiveDate) -> Option<String> {
    Some("15 minutes".to_string())
}

fn long(_: &Captures<'_>, _: NaiveDate) -> Option<String> {
    Some("2 hours".to_string())
}

// -- recurring ---------------------------------------------------------------

const RECURRING: &[Rule<bool>] = &[
    Rule::new(r"(?i)\b(?:daily|every\s+day|each\s+day)\b", recurring),
    Rule::new(r"(?i)\b(?:weekly|every\s+week|each\s+week)\b", recurring),
    Rule::new(r"(?i)\b(?:monthly|every\s+month|each\s+month)\b", recurring),
    Rule::new(r"(?i)\b(?:recurring|repeat|routine)\b", recurring),
];

static RECURRING_RULES: RuleSet<bool> = RuleSet::new("recurring", Strip::All, RECURRING);

fn recurring(_: &Captures<'_>, _: NaiveDate) -> Option<bool> {
    Some(true)
}

// -- location ----------------------------------------------------------------

const LOCATION: &[Rule<String>] = &[
    Rule::new(r"(?i)\bat\s+(?P<place>[a-z][a-z ]*[a-z])", place),
    Rule::new(r"(?i)\bin\s+(?P<place>[a-z][a-z ]*[a-z])", place),
    Rule::new(r"(?i)@\s*(?P<place>[a-z][a-z ]*[a-z])", place),
];

static LOCATION_RULES: RuleSet<String> = RuleSet::new("location", Strip::Winner, LOCATION);

fn place(caps: &Captures<'_>, _: NaiveDate) -> Option<String> {
    let place = caps.name("place")?.as_str().trim();
    (place.chars().count() >= 3).then(|| place.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    /// Wednesday 2024-04-03, 09:00 UTC.
    fn wednesday() -> DateTime<Tz> {
        UTC.with_ymd_and_hms(2024, 4, 3, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(DATE_RULES.compiled().len(), DATE_RULES.rules.len());
        assert_eq!(TIME_RULES.compiled().len(), TIME_RULES.rules.len());
        assert_eq!(PRIORITY_RULES.compiled().len(), PRIORITY_RULES.rules.len());
        assert_eq!(DURATION_RULES.compiled().len(), DURATION_RULES.rules.len());
        assert_eq!(RECURRING_RULES.compiled().len(), RECURRING_RULES.rules.len());
        assert_eq!(LOCATION_RULES.compiled().len(), LOCATION_RULES.rules.len());
    }

    #[test]
    fn test_dentist_example() {
        let p = parse_natural_language("Call the dentist tomorrow at 5pm urgent", wednesday());
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 4)));
        assert_eq!(p.extracted_time.as_deref(), Some("5pm"));
        assert_eq!(p.extracted_priority, Some(Priority::High));
        assert_eq!(p.extracted_location, None);
        assert_eq!(p.cleaned_title, "Call the dentist");
    }

    #[test]
    fn test_empty_input() {
        for input in ["", "   \t  "] {
            let p = parse_natural_language(input, wednesday());
            assert!(p.is_empty());
            assert_eq!(p.cleaned_title, "");
        }
    }

    #[test]
    fn test_relative_days() {
        let now = wednesday();
        let cases = [
            ("pay rent today", date(2024, 4, 3)),
            ("pay rent Tomorrow", date(2024, 4, 4)),
            ("pay rent day after tomorrow", date(2024, 4, 5)),
            ("pay rent yesterday", date(2024, 4, 2)),
            ("pay rent in 3 days", date(2024, 4, 6)),
            ("pay rent in a week", date(2024, 4, 10)),
            ("pay rent in 2 weeks", date(2024, 4, 17)),
        ];
        for (input, expected) in cases {
            let p = parse_natural_language(input, now);
            assert_eq!(p.extracted_due_date, Some(expected), "{input}");
            assert_eq!(p.cleaned_title, "pay rent", "{input}");
        }
    }

    #[test]
    fn test_weekday_rollover() {
        let now = wednesday();
        let p = parse_natural_language("standup wednesday", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 10)));

        let p = parse_natural_language("standup this friday", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 5)));
        assert_eq!(p.cleaned_title, "standup");

        let p = parse_natural_language("standup next Monday", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 8)));
    }

    #[test]
    fn test_rule_order_decides_date() {
        // "tomorrow" is checked before weekdays regardless of position
        let p = parse_natural_language("friday or tomorrow", wednesday());
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 4)));
        assert_eq!(p.cleaned_title, "or");
    }

    #[test]
    fn test_numeric_dates() {
        let now = wednesday();
        let p = parse_natural_language("renew passport 05/20", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 5, 20)));
        assert_eq!(p.cleaned_title, "renew passport");

        let p = parse_natural_language("renew passport 12-01-2025", now);
        assert_eq!(p.extracted_due_date, Some(date(2025, 12, 1)));

        let p = parse_natural_language("renew passport 1/2/26", now);
        assert_eq!(p.extracted_due_date, Some(date(2026, 1, 2)));

        let p = parse_natural_language("renew passport 13/45", now);
        assert_eq!(p.extracted_due_date, None);
        assert_eq!(p.cleaned_title, "renew passport 13/45");
    }

    #[test]
    fn test_iso_dates_are_taken_whole() {
        let now = wednesday();
        let p = parse_natural_language("2024-04-03 report", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 3)));
        assert_eq!(p.cleaned_title, "report");

        let p = parse_natural_language("file taxes 2025-4-15", now);
        assert_eq!(p.extracted_due_date, Some(date(2025, 4, 15)));
        assert_eq!(p.cleaned_title, "file taxes");
    }

    #[test]
    fn test_times() {
        let now = wednesday();
        let cases = [
            ("standup at 9:30 am", "9:30 am"),
            ("standup 10AM", "10AM"),
            ("standup at 17:45", "17:45"),
            ("standup at 9", "9"),
        ];
        for (input, expected) in cases {
            let p = parse_natural_language(input, now);
            assert_eq!(p.extracted_time.as_deref(), Some(expected), "{input}");
            assert_eq!(p.cleaned_title, "standup", "{input}");
        }
    }

    #[test]
    fn test_priorities() {
        let now = wednesday();
        let cases = [
            ("!! fix prod", Priority::High),
            ("fix prod ASAP", Priority::High),
            ("fix prod high priority", Priority::High),
            ("! fix prod", Priority::Medium),
            ("fix prod normal", Priority::Medium),
            ("fix prod when I have time", Priority::Low),
            ("fix prod someday", Priority::Low),
        ];
        for (input, expected) in cases {
            let p = parse_natural_language(input, now);
            assert_eq!(p.extracted_priority, Some(expected), "{input}");
            assert_eq!(p.cleaned_title, "fix prod", "{input}");
        }
    }

    #[test]
    fn test_leading_bang_runs_are_stripped_whole() {
        let now = wednesday();
        let p = parse_natural_language("! !fix sink", now);
        assert_eq!(p.extracted_priority, Some(Priority::Medium));
        assert_eq!(p.cleaned_title, "fix sink");

        let p = parse_natural_language("!!! ! fix sink", now);
        assert_eq!(p.extracted_priority, Some(Priority::High));
        assert_eq!(p.cleaned_title, "fix sink");

        let again = parse_natural_language(&p.cleaned_title, now);
        assert_eq!(again.extracted_priority, None);
    }

    #[test]
    fn test_high_wins_over_low_and_both_are_stripped() {
        let p = parse_natural_language("eventually fix prod urgent", wednesday());
        assert_eq!(p.extracted_priority, Some(Priority::High));
        assert_eq!(p.cleaned_title, "fix prod");
    }

    #[test]
    fn test_durations() {
        let now = wednesday();
        let p = parse_natural_language("review PR for 45 mins", now);
        assert_eq!(p.extracted_duration.as_deref(), Some("45 mins"));
        assert_eq!(p.cleaned_title, "review PR");

        let p = parse_natural_language("quick review", now);
        assert_eq!(p.extracted_duration.as_deref(), Some("15 minutes"));
        assert_eq!(p.cleaned_title, "review");

        let p = parse_natural_language("long review", now);
        assert_eq!(p.extracted_duration.as_deref(), Some("2 hours"));

        // Overflowing number falls back to 1
        let p = parse_natural_language("nap 99999999999999999999999 hours", now);
        assert_eq!(p.extracted_duration.as_deref(), Some("1 hours"));
    }

    #[test]
    fn test_recurring() {
        let now = wednesday();
        for input in ["water plants daily", "water plants every week", "water plants routine"] {
            let p = parse_natural_language(input, now);
            assert_eq!(p.extracted_recurring, Some(true), "{input}");
            assert_eq!(p.cleaned_title, "water plants", "{input}");
        }
        let p = parse_natural_language("water plants", now);
        assert_eq!(p.extracted_recurring, None);
    }

    #[test]
    fn test_location_is_naive() {
        let now = wednesday();
        let p = parse_natural_language("lunch with Sam at the Blue Door cafe", now);
        assert_eq!(p.extracted_location.as_deref(), Some("the Blue Door cafe"));
        assert_eq!(p.cleaned_title, "lunch with Sam");

        let p = parse_natural_language("buy stamps @post office", now);
        assert_eq!(p.extracted_location.as_deref(), Some("post office"));

        // Known false positive: "in" is just a word here
        let p = parse_natural_language("check in with Bob", now);
        assert_eq!(p.extracted_location.as_deref(), Some("with Bob"));
        assert_eq!(p.cleaned_title, "check");

        // Too short to count
        let p = parse_natural_language("meet at LA", now);
        assert_eq!(p.extracted_location, None);
    }

    #[test]
    fn test_phrase_exposed_by_location_is_extracted() {
        let now = wednesday();
        let p = parse_natural_language("water plants in at home 2 weeks", now);
        assert_eq!(p.extracted_location.as_deref(), Some("home"));
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 17)));
        assert_eq!(p.cleaned_title, "water plants");

        // An earlier decision is not overwritten by the second round
        let p = parse_natural_language("tomorrow water plants in at home 2 weeks", now);
        assert_eq!(p.extracted_due_date, Some(date(2024, 4, 4)));
        assert_eq!(p.cleaned_title, "water plants");
    }

    #[test]
    fn test_parse_time_of_day() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(parse_time_of_day("5pm"), t(17, 0));
        assert_eq!(parse_time_of_day("5:30 PM"), t(17, 30));
        assert_eq!(parse_time_of_day("12am"), t(0, 0));
        assert_eq!(parse_time_of_day("12pm"), t(12, 0));
        assert_eq!(parse_time_of_day("17:45"), t(17, 45));
        assert_eq!(parse_time_of_day("9"), t(9, 0));
        assert_eq!(parse_time_of_day("13pm"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn test_apply_to_task() {
        let p = parse_natural_language("Call the dentist tomorrow at 5pm urgent for 30 minutes", wednesday());
        let tz: Tz = "America/New_York".parse().unwrap();
        let task = p.apply_to(&Task::new("t1", "draft"), tz);
        assert_eq!(task.title, "Call the dentist");
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.estimated_duration.as_deref(), Some("30 minutes"));
        // 17:00 EDT = 21:00Z
        assert_eq!(task.due_date.unwrap().to_rfc3339(), "2024-04-04T21:00:00+00:00");
        assert_eq!(task.id, "t1");
    }
}
