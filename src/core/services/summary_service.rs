//! Read-only aggregation over income records.

use chrono::Datelike;

use crate::domain::record::IncomeRecord;

use super::{ServiceError, ServiceResult};

/// Records for one calendar day, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: u32,
    pub total: f64,
    pub records: Vec<IncomeRecord>,
}

/// Records for one calendar month, split into day groups.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub days: Vec<DayGroup>,
}

/// Aggregation helpers over a slice of income records.
pub struct SummaryService;

impl SummaryService {
    /// Sum of all record amounts. Empty input yields zero.
    pub fn total(records: &[IncomeRecord]) -> f64 {
        records.iter().map(|record| record.amount).sum()
    }

    /// Percentage of the yearly goal reached, clamped at 100.
    ///
    /// A non-positive or non-finite goal is a configuration error and is
    /// reported to the caller rather than divided through.
    pub fn goal_progress(total: f64, goal: f64) -> ServiceResult<f64> {
        if !goal.is_finite() || goal <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "yearly goal must be a positive amount, got {goal}"
            )));
        }
        Ok((total / goal * 100.0).min(100.0))
    }

    /// Groups records by month and then by day, newest first.
    ///
    /// Records are sorted by timestamp descending before bucketing, so month
    /// groups appear most-recent first, day groups within a month most-recent
    /// first, and records inside a day keep the post-sort order. Every group
    /// carries the subtotal of the records beneath it.
    pub fn group_by_month_then_day(records: &[IncomeRecord]) -> Vec<MonthGroup> {
        let mut sorted: Vec<IncomeRecord> = records.to_vec();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut months: Vec<MonthGroup> = Vec::new();
        for record in sorted {
            let (year, month, day) = (
                record.timestamp.year(),
                record.timestamp.month(),
                record.timestamp.day(),
            );
            let month_idx = match months
                .iter()
                .position(|group| group.year == year && group.month == month)
            {
                Some(idx) => idx,
                None => {
                    months.push(MonthGroup {
                        year,
                        month,
                        total: 0.0,
                        days: Vec::new(),
                    });
                    months.len() - 1
                }
            };
            let month_group = &mut months[month_idx];
            month_group.total += record.amount;

            let day_idx = match month_group.days.iter().position(|group| group.day == day) {
                Some(idx) => idx,
                None => {
                    month_group.days.push(DayGroup {
                        day,
                        total: 0.0,
                        records: Vec::new(),
                    });
                    month_group.days.len() - 1
                }
            };
            let day_group = &mut month_group.days[day_idx];
            day_group.total += record.amount;
            day_group.records.push(record);
        }
        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use chrono::{TimeZone, Utc};

    fn record_on(amount: f64, year: i32, month: u32, day: u32, hour: u32) -> IncomeRecord {
        IncomeRecord::new(amount, "salary", "work", UserId::Wife)
            .with_timestamp(Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn total_of_empty_slice_is_zero() {
        assert_eq!(SummaryService::total(&[]), 0.0);
    }

    #[test]
    fn goal_progress_rejects_non_positive_goal() {
        assert!(SummaryService::goal_progress(100.0, 0.0).is_err());
        assert!(SummaryService::goal_progress(100.0, -5.0).is_err());
        assert!(SummaryService::goal_progress(100.0, f64::NAN).is_err());
    }

    #[test]
    fn goal_progress_clamps_at_one_hundred() {
        let progress = SummaryService::goal_progress(500_000.0, 200_000.0).unwrap();
        assert_eq!(progress, 100.0);
    }

    #[test]
    fn grouping_orders_months_and_days_newest_first() {
        let records = vec![
            record_on(100.0, 2025, 6, 3, 9),
            record_on(200.0, 2025, 7, 10, 9),
            record_on(300.0, 2025, 7, 10, 18),
            record_on(400.0, 2025, 7, 2, 9),
        ];
        let groups = SummaryService::group_by_month_then_day(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].year, groups[0].month), (2025, 7));
        assert_eq!(groups[0].total, 900.0);
        assert_eq!(groups[0].days[0].day, 10);
        assert_eq!(groups[0].days[0].total, 500.0);
        // Inside a day, later timestamps come first.
        assert_eq!(groups[0].days[0].records[0].amount, 300.0);
        assert_eq!(groups[0].days[1].day, 2);
        assert_eq!((groups[1].year, groups[1].month), (2025, 6));
    }
}
