use crate::domain::ports::Clock;
use crate::utils::error::{PrintError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};

pub const DEFAULT_TS_FORMAT: &str = "[%Y-%m-%d] (%H:%M:%S {tzoffset})";

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    pub fn parse(rfc3339: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(FixedClock)
            .map_err(|e| PrintError::config(format!("invalid clock instant {:?}: {}", rfc3339, e)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Reject formats chrono would fail on while rendering.
pub fn check_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PrintError::InvalidTimestampFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// `+HHMM` / `-HHMM`
fn offset_digits(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}

fn zone_name(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("UTC{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

#[derive(Debug, Clone, Copy)]
pub struct Timestamper<'a> {
    pub use_utc: bool,
    pub format: &'a str,
}

impl<'a> Timestamper<'a> {
    pub fn new(use_utc: bool, format: &'a str) -> Self {
        Self { use_utc, format }
    }

    pub fn stamp(&self, clock: &dyn Clock) -> Result<String> {
        self.render(clock.now())
    }

    pub fn render(&self, now: DateTime<FixedOffset>) -> Result<String> {
        if self.format.is_empty() {
            return Ok(String::new());
        }
        check_format(self.format)?;

        let now = if self.use_utc {
            now.with_timezone(&Utc).fixed_offset()
        } else {
            now
        };
        let offset = now.offset();

        let formatted = now
            .format(self.format)
            .to_string()
            .replace("{tzname}", &zone_name(offset))
            .replace("{tzoffset}", &offset_digits(offset));

        Ok(formatted.trim().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock::parse("2024-03-05T21:07:09-05:00").unwrap()
    }

    #[test]
    fn test_default_format_local() {
        let ts = Timestamper::new(false, DEFAULT_TS_FORMAT).stamp(&clock()).unwrap();
        assert_eq!(ts, "[2024-03-05] (21:07:09 -0500)");
    }

    #[test]
    fn test_default_format_utc() {
        let ts = Timestamper::new(true, DEFAULT_TS_FORMAT).stamp(&clock()).unwrap();
        assert_eq!(ts, "[2024-03-06] (02:07:09 +0000)");
    }

    #[test]
    fn test_tzname_placeholder() {
        let ts = Timestamper::new(false, "%H:%M {tzname}").stamp(&clock()).unwrap();
        assert_eq!(ts, "21:07 UTC-05:00");

        let ts = Timestamper::new(true, "{tzname}").stamp(&clock()).unwrap();
        assert_eq!(ts, "UTC");
    }

    #[test]
    fn test_half_hour_offset() {
        let clock = FixedClock::parse("2024-01-01T12:00:00+05:30").unwrap();
        let ts = Timestamper::new(false, "{tzoffset}").stamp(&clock).unwrap();
        assert_eq!(ts, "+0530");
    }

    #[test]
    fn test_result_is_trimmed_and_uppercased() {
        let ts = Timestamper::new(false, "  %b %a  ").stamp(&clock()).unwrap();
        assert_eq!(ts, "MAR TUE");
    }

    #[test]
    fn test_empty_format_gives_empty_timestamp() {
        assert_eq!(Timestamper::new(false, "").stamp(&clock()).unwrap(), "");
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        let err = Timestamper::new(false, "%Q").stamp(&clock()).unwrap_err();
        assert!(matches!(err, PrintError::InvalidTimestampFormat { .. }));
    }
}
