use anyhow::{Context, Result, bail};
use jiff::{civil::Date, tz::TimeZone};
use query_syntax::DateVariant;

/// Time zone used to turn calendar dates into timestamps.
#[derive(Debug, Clone)]
pub struct DateContext {
    tz: TimeZone,
}

impl DateContext {
    /// Dates are interpreted in the system time zone.
    pub fn system() -> Self {
        Self {
            tz: TimeZone::system(),
        }
    }

    pub fn utc() -> Self {
        Self { tz: TimeZone::UTC }
    }

    pub fn with_time_zone(tz: TimeZone) -> Self {
        Self { tz }
    }
}

impl Default for DateContext {
    fn default() -> Self {
        Self::system()
    }
}

/// Resolves a `from:`/`to:` value to unix milliseconds.
///
/// Calendar dates cover the whole day: `from` takes its first millisecond and
/// `to` its last. Bare integers are taken as unix milliseconds already.
pub(crate) fn parse_date_bound(
    raw: &str,
    variant: DateVariant,
    context: &DateContext,
) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("date filters require a value");
    }
    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return trimmed
            .parse::<i64>()
            .with_context(|| format!("Timestamp {trimmed:?} is out of range"));
    }
    let Some(date) = calendar_date(trimmed) else {
        bail!("Unrecognized date literal: {trimmed}");
    };
    let first = date
        .to_zoned(context.tz.clone())
        .with_context(|| format!("Date {trimmed:?} is out of range"))?;
    Ok(match variant {
        DateVariant::From => first.timestamp().as_millisecond(),
        DateVariant::To => {
            let next = date
                .tomorrow()
                .and_then(|day| day.to_zoned(context.tz.clone()))
                .with_context(|| format!("Date {trimmed:?} is out of range"))?;
            next.timestamp().as_millisecond() - 1
        }
    })
}

// `YYYY-MM-DD` or `DD-MM-YYYY`, with `-`, `/` or `.` used throughout.
fn calendar_date(raw: &str) -> Option<Date> {
    let sep = raw.chars().find(|ch| matches!(ch, '-' | '/' | '.'))?;
    let fields: Vec<&str> = raw.split(sep).collect();
    let [first, month, last] = fields[..] else {
        return None;
    };
    if ![first, month, last]
        .iter()
        .all(|field| !field.is_empty() && field.chars().all(|ch| ch.is_ascii_digit()))
    {
        return None;
    }
    let (year, day) = match (first.len(), last.len()) {
        (4, 1..=2) => (first, last),
        (1..=2, 4) => (last, first),
        _ => return None,
    };
    Date::new(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?).ok()
}
