use crate::FacadeError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an `xs:dateTime` value.
///
/// Values without a zone designator are taken as UTC.
pub(crate) fn parse_validation_date(raw: &str) -> Result<DateTime<Utc>, FacadeError> {
    let value = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| FacadeError::InvalidDate(value.to_string()))
}
