//! Fixed-offset clock helpers. Reports and invoice sequences bucket by the
//! business's local calendar day, configured as a UTC offset in hours.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

pub fn fixed_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.clamp(-23, 23) * 3600).unwrap_or_else(|| Utc.fix())
}

pub fn local_today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// The instant local midnight of `date` occurs at, expressed in `offset`.
pub fn day_start(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let midnight = date.and_time(NaiveTime::MIN);
    let as_utc = midnight - Duration::seconds(offset.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(as_utc, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_clamped_to_valid_hours() {
        assert_eq!(fixed_offset(7).local_minus_utc(), 7 * 3600);
        assert_eq!(fixed_offset(-5).local_minus_utc(), -5 * 3600);
        assert_eq!(fixed_offset(99).local_minus_utc(), 23 * 3600);
        assert_eq!(fixed_offset(-99).local_minus_utc(), -23 * 3600);
    }

    #[test]
    fn day_start_lands_on_local_midnight() {
        let offset = fixed_offset(7);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let start = day_start(date, offset);

        assert_eq!(
            start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 14, 17, 0, 0).unwrap()
        );
        assert_eq!(start.date_naive(), date);
    }

    #[test]
    fn day_start_handles_negative_offsets() {
        let offset = fixed_offset(-3);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let start = day_start(date, offset);

        assert_eq!(
            start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()
        );
    }
}
