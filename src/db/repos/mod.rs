pub mod alerts;
pub mod campaigns;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as fixed-width RFC3339 (millisecond precision, `Z`
/// suffix) so that string comparison in SQL matches chronological order.
pub(crate) fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_ts(column: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                format!("invalid timestamp '{raw}': {e}").into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ts_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 45).unwrap();
        assert_eq!(parse_ts(0, ts(at)).unwrap(), at);
    }

    #[test]
    fn test_ts_is_lexicographically_sortable() {
        let early = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let late = early + chrono::Duration::milliseconds(5);
        assert!(ts(early) < ts(late));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_ts(0, "not-a-time".into()).is_err());
    }
}
