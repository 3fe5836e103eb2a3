use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub active_today: bool,
}

impl StreakSummary {
    pub fn from_dates<I>(dates: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            current: current_streak(&days, today),
            longest: longest_streak(&days),
            active_today: days.contains(&today),
        }
    }
}

/// Consecutive active days ending today, or yesterday while today is still open
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let start = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut cursor = Some(start);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

/// One cell per day for the `days` days ending at `today`, oldest first
pub fn heatmap<I>(dates: I, today: NaiveDate, days: u32) -> Vec<HeatmapCell>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let counts = count_by_day(dates);
    (0..days)
        .rev()
        .map(|offset| today - Duration::days(i64::from(offset)))
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            HeatmapCell {
                date,
                count,
                level: intensity_level(count),
            }
        })
        .collect()
}

fn count_by_day<I>(dates: I) -> BTreeMap<NaiveDate, u32>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut counts = BTreeMap::new();
    for date in dates {
        *counts.entry(date).or_insert(0) += 1;
    }
    counts
}

fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2..=3 => 2,
        4..=5 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn set(dates: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        dates.iter().copied().collect()
    }

    #[test]
    fn test_current_streak_including_today() {
        let days = set(&[d(3, 8), d(3, 9), d(3, 10)]);
        assert_eq!(current_streak(&days, d(3, 10)), 3);
    }

    #[test]
    fn test_current_streak_survives_until_end_of_today() {
        let days = set(&[d(3, 8), d(3, 9)]);
        assert_eq!(current_streak(&days, d(3, 10)), 2);
        assert_eq!(current_streak(&days, d(3, 11)), 0);
    }

    #[test]
    fn test_current_streak_crosses_month_boundary() {
        let days = set(&[d(2, 28), d(2, 29), d(3, 1)]);
        assert_eq!(current_streak(&days, d(3, 1)), 3);
    }

    #[test]
    fn test_longest_streak() {
        let days = set(&[d(1, 1), d(1, 2), d(1, 5), d(1, 6), d(1, 7), d(1, 9)]);
        assert_eq!(longest_streak(&days), 3);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_summary_ignores_duplicates() {
        let summary = StreakSummary::from_dates(vec![d(4, 1), d(4, 1), d(4, 2)], d(4, 2));
        assert_eq!(
            summary,
            StreakSummary {
                current: 2,
                longest: 2,
                active_today: true
            }
        );
    }

    #[test]
    fn test_heatmap_cells() {
        let dates = vec![d(6, 1), d(6, 3), d(6, 3), d(6, 3), d(6, 3), d(6, 3), d(6, 3), d(5, 1)];
        let cells = heatmap(dates, d(6, 3), 3);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], HeatmapCell { date: d(6, 1), count: 1, level: 1 });
        assert_eq!(cells[1], HeatmapCell { date: d(6, 2), count: 0, level: 0 });
        assert_eq!(cells[2], HeatmapCell { date: d(6, 3), count: 6, level: 4 });
    }

    #[test]
    fn test_intensity_levels() {
        let levels: Vec<u8> = (0..8).map(intensity_level).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 3, 3, 4, 4]);
    }
}
