use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};

/// Timesheet weeks run Saturday through Friday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_since_saturday = (date.weekday().num_days_from_sunday() + 1) % 7;
    date - Days::new(u64::from(days_since_saturday))
}

/// Storage key of the week containing `date`, e.g. `2025-3-8`.
pub fn week_id(date: NaiveDate) -> String {
    let start = week_start(date);
    format!("{}-{}-{}", start.year(), start.month(), start.day())
}

/// Week id for today as seen from the office's UTC offset.
pub fn current_week_id(offset: FixedOffset) -> String {
    week_id(Utc::now().with_timezone(&offset).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saturday_starts_its_own_week() {
        // 2025-03-08 is a Saturday.
        assert_eq!(week_start(date(2025, 3, 8)), date(2025, 3, 8));
    }

    #[test]
    fn every_day_maps_back_to_saturday() {
        for offset in 0..7 {
            let day = date(2025, 3, 8 + offset);
            assert_eq!(week_start(day), date(2025, 3, 8), "day {}", day);
        }
        assert_eq!(week_start(date(2025, 3, 15)), date(2025, 3, 15));
    }

    #[test]
    fn week_id_crosses_month_and_year_without_padding() {
        // Friday 2025-01-03 belongs to the week starting Saturday 2024-12-28.
        assert_eq!(week_id(date(2025, 1, 3)), "2024-12-28");
        assert_eq!(week_id(date(2025, 3, 14)), "2025-3-8");
    }
}
