use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("timestamp {millis} is out of range: {source}")]
    Range {
        millis: i64,
        #[source]
        source: time::error::ComponentRange,
    },
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}

/// Formats a backend timestamp (milliseconds since the Unix epoch).
pub fn epoch_millis_rfc3339(millis: i64) -> Result<String, TimestampError> {
    let nanos = i128::from(millis) * 1_000_000;
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|source| TimestampError::Range { millis, source })?;
    Ok(datetime.format(&Rfc3339)?)
}
