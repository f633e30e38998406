// Uptime text parsing for the legacy API.
//
// The SOAP service reports uptime as prose ("3 days 4 hours 5 minutes").
// Each `<number> <unit>` pair is rewritten to humantime's compact form
// ("3d 4h 5m") and parsed by it.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UptimeError {
    #[error("empty uptime string")]
    Empty,

    #[error("missing unit after {value:?} in uptime {input:?}")]
    MissingUnit { value: String, input: String },

    #[error("unknown unit {unit:?} in uptime {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("invalid uptime {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: humantime::DurationError,
    },
}

fn unit_suffix(unit: &str) -> Option<&'static str> {
    match unit.trim_end_matches(',').to_ascii_lowercase().as_str() {
        "day" | "days" => Some("d"),
        "hour" | "hours" => Some("h"),
        "minute" | "minutes" => Some("m"),
        "second" | "seconds" => Some("s"),
        _ => None,
    }
}

/// Parse a textual uptime such as `"1 day 1 hour"` into a [`Duration`].
///
/// Any subset of days, hours, minutes and seconds is accepted, singular or
/// plural.
pub fn parse_uptime(input: &str) -> Result<Duration, UptimeError> {
    let mut spans = Vec::new();
    let mut tokens = input.split_whitespace();

    while let Some(value) = tokens.next() {
        let Some(unit) = tokens.next() else {
            return Err(UptimeError::MissingUnit {
                value: value.to_owned(),
                input: input.to_owned(),
            });
        };
        let Some(suffix) = unit_suffix(unit) else {
            return Err(UptimeError::UnknownUnit {
                unit: unit.to_owned(),
                input: input.to_owned(),
            });
        };
        spans.push(format!("{value}{suffix}"));
    }

    if spans.is_empty() {
        return Err(UptimeError::Empty);
    }

    humantime::parse_duration(&spans.join(" ")).map_err(|source| UptimeError::Invalid {
        input: input.to_owned(),
        source,
    })
}
