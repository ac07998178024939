use std::time::{SystemTime, UNIX_EPOCH};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod game;
pub mod history;
pub mod validation;

/// RFC 3339 rendering of `time`; values `time` cannot represent render as a placeholder.
fn format_system_time(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|since| i128::try_from(since.as_nanos()).ok())
        .and_then(|nanos| OffsetDateTime::from_unix_timestamp_nanos(nanos).ok())
        .and_then(|date| date.format(&Rfc3339).ok())
        .unwrap_or_else(|| "invalid-timestamp".into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn formats_epoch_offsets_as_rfc3339() {
        let time = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(format_system_time(time), "1970-01-01T00:00:01.5Z");
    }

    #[test]
    fn dates_outside_the_calendar_range_do_not_panic() {
        let far_future = UNIX_EPOCH + Duration::from_secs(400_000_000_000);
        assert_eq!(format_system_time(far_future), "invalid-timestamp");
    }
}
