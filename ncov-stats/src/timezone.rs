use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone as _};
use chrono_tz::{OffsetComponents, Tz};
use ics::{properties::TzName, Daylight, Standard, TimeZone};
use thiserror::Error;

// 1970-01-01T00:00:00Z up to 2038-01-01T00:00:00Z
const SCAN_START: i64 = 0;
const SCAN_END: i64 = 2_145_916_800;
const DAY: i64 = 86_400;

#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("unknown timezone `{0}`")]
    Unknown(String),
}

/// Builds a `VTIMEZONE` for an IANA zone name from the tz database.
///
/// The first sub-component describes the offset in force at the Unix epoch,
/// followed by one sub-component per offset change until 2038.
pub fn vtimezone(name: &str) -> Result<TimeZone<'static>, TimezoneError> {
    let tz: Tz = name
        .parse()
        .map_err(|_| TimezoneError::Unknown(name.to_owned()))?;

    let initial = observance(tz, SCAN_START);
    let epoch = Rule {
        onset: SCAN_START,
        from: initial,
        to: initial,
    };

    let mut timezone = if initial.dst {
        TimeZone::daylight(name.to_owned(), epoch.daylight(tz))
    } else {
        TimeZone::standard(name.to_owned(), epoch.standard(tz))
    };

    for rule in transitions(tz) {
        if rule.to.dst {
            timezone.add_daylight(rule.daylight(tz));
        } else {
            timezone.add_standard(rule.standard(tz));
        }
    }

    Ok(timezone)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observance {
    offset: i32,
    dst: bool,
}

struct Rule {
    onset: i64,
    from: Observance,
    to: Observance,
}

impl Rule {
    fn standard(&self, tz: Tz) -> Standard<'static> {
        let (dtstart, from, to, name) = self.properties(tz);
        let mut standard = Standard::new(dtstart, from, to);
        standard.push(TzName::new(name));
        standard
    }

    fn daylight(&self, tz: Tz) -> Daylight<'static> {
        let (dtstart, from, to, name) = self.properties(tz);
        let mut daylight = Daylight::new(dtstart, from, to);
        daylight.push(TzName::new(name));
        daylight
    }

    fn properties(&self, tz: Tz) -> (String, String, String, String) {
        // DTSTART is the local wall time under the offset being replaced
        let dtstart = utc(self.onset + i64::from(self.from.offset))
            .format("%Y%m%dT%H%M%S")
            .to_string();
        let name = tz.from_utc_datetime(&utc(self.onset)).format("%Z").to_string();

        (
            dtstart,
            format_offset(self.from.offset),
            format_offset(self.to.offset),
            name,
        )
    }
}

fn transitions(tz: Tz) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut before = observance(tz, SCAN_START);
    let mut day = SCAN_START;

    while day < SCAN_END {
        let next = day + DAY;
        let after = observance(tz, next);

        if after != before {
            rules.push(Rule {
                onset: onset(tz, day, next, before),
                from: before,
                to: after,
            });
            before = after;
        }

        day = next;
    }

    rules
}

// First second in (lo, hi] whose observance differs from `before`.
fn onset(tz: Tz, mut lo: i64, mut hi: i64, before: Observance) -> i64 {
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if observance(tz, mid) == before {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

fn observance(tz: Tz, at: i64) -> Observance {
    let offset = tz.offset_from_utc_datetime(&utc(at));
    Observance {
        offset: offset.fix().local_minus_utc(),
        dst: offset.dst_offset() != Duration::zero(),
    }
}

fn utc(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .naive_utc()
}

fn format_offset(secs: i32) -> String {
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.unsigned_abs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);

    if seconds == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{seconds:02}")
    }
}
