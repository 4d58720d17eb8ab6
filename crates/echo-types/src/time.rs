//! Chain timestamps (`YYYY-MM-DDTHH:MM:SS`, UTC, no zone suffix)

use chrono::{DateTime, NaiveDateTime};

use crate::TypesError;

const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a chain timestamp into unix seconds
pub fn parse_chain_time(s: &str) -> Result<u32, TypesError> {
    let trimmed = s.trim_end_matches('Z');
    let parsed = NaiveDateTime::parse_from_str(trimmed, CHAIN_TIME_FORMAT)
        .map_err(|e| TypesError::InvalidTimestamp(format!("{s}: {e}")))?;
    u32::try_from(parsed.and_utc().timestamp())
        .map_err(|_| TypesError::InvalidTimestamp(format!("{s}: out of range")))
}

/// Format unix seconds as a chain timestamp
pub fn format_chain_time(secs: u32) -> String {
    match DateTime::from_timestamp(i64::from(secs), 0) {
        Some(dt) => dt.format(CHAIN_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_time() {
        assert_eq!(parse_chain_time("2019-01-01T00:00:00").unwrap(), 1_546_300_800);
        assert_eq!(parse_chain_time("2019-01-01T00:00:00Z").unwrap(), 1_546_300_800);
    }

    #[test]
    fn test_format_known_time() {
        assert_eq!(format_chain_time(1_546_300_840), "2019-01-01T00:00:40");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_chain_time("yesterday"),
            Err(TypesError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_pre_epoch_rejected() {
        assert!(parse_chain_time("1960-01-01T00:00:00").is_err());
    }
}
