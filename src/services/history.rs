//! Streak and weekly mood aggregation over a user's check-in history.
//!
//! All functions are pure; callers supply the UTC anchor (`today` / `now`).
//! Several check-ins on the same UTC day count as one day.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::mood::Humor;

pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const INSUFFICIENT_DATA_LABEL: &str = "Sem dados suficientes";

/// Consecutive days with a check-in, ending at `today`. Zero when there is no
/// check-in today.
pub fn current_streak<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = days.into_iter().filter(|d| *d <= today).collect();

    let mut streak = 0u32;
    let mut expected = today;
    for day in days.iter().rev() {
        if *day != expected {
            break;
        }
        streak += 1;
        expected -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive check-in days up to `today`. Future-dated days
/// are ignored, as in [`current_streak`].
pub fn longest_streak<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = days.into_iter().filter(|d| *d <= today).collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if day == p + Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeeklyMood {
    InsufficientData,
    Band {
        average: f64,
        humor: Humor,
        count: usize,
    },
}

/// Mean mood score over check-ins dated at or after `now - 7 days`, banded
/// back onto the mood vocabulary.
pub fn weekly_average<I>(check_ins: I, now: DateTime<Utc>) -> WeeklyMood
where
    I: IntoIterator<Item = (DateTime<Utc>, Humor)>,
{
    let since = now - Duration::days(WEEKLY_WINDOW_DAYS);

    let (total, count) = check_ins
        .into_iter()
        .filter(|(date, _)| *date >= since)
        .fold((0u32, 0usize), |(total, count), (_, humor)| {
            (total + u32::from(humor.score()), count + 1)
        });

    if count == 0 {
        return WeeklyMood::InsufficientData;
    }

    let average = f64::from(total) / count as f64;
    WeeklyMood::Band {
        average,
        humor: Humor::from_average(average),
        count,
    }
}

/// Client view of [`WeeklyMood`]: the label is either a mood or the
/// insufficient-data sentinel.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAverage {
    pub label: String,
    pub band: Option<Humor>,
    pub average: Option<f64>,
    pub count: usize,
}

impl From<WeeklyMood> for WeeklyAverage {
    fn from(mood: WeeklyMood) -> Self {
        match mood {
            WeeklyMood::InsufficientData => Self {
                label: INSUFFICIENT_DATA_LABEL.into(),
                band: None,
                average: None,
                count: 0,
            },
            WeeklyMood::Band {
                average,
                humor,
                count,
            } => Self {
                label: humor.label().into(),
                band: Some(humor),
                average: Some((average * 100.0).round() / 100.0),
                count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 18, 30, 0).unwrap()
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let days = vec![days_ago(0), days_ago(1), days_ago(2), days_ago(4)];
        assert_eq!(current_streak(days, today()), 3);
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(current_streak(Vec::new(), today()), 0);
        assert_eq!(longest_streak(Vec::new(), today()), 0);
    }

    #[test]
    fn streak_requires_a_check_in_today() {
        let days = vec![days_ago(1), days_ago(2)];
        assert_eq!(current_streak(days, today()), 0);
    }

    #[test]
    fn same_day_check_ins_count_once() {
        let days = vec![days_ago(0), days_ago(0), days_ago(1), days_ago(1), days_ago(2)];
        assert_eq!(current_streak(days, today()), 3);
    }

    #[test]
    fn unordered_history_is_accepted() {
        let days = vec![days_ago(2), days_ago(0), days_ago(1)];
        assert_eq!(current_streak(days, today()), 3);
    }

    #[test]
    fn future_dates_are_ignored() {
        let days = vec![today() + Duration::days(1), days_ago(0)];
        assert_eq!(current_streak(days, today()), 1);
    }

    #[test]
    fn longest_streak_spans_history() {
        let days = vec![
            days_ago(0),
            days_ago(5),
            days_ago(6),
            days_ago(7),
            days_ago(7),
            days_ago(8),
            days_ago(20),
        ];
        assert_eq!(longest_streak(days, today()), 4);
    }

    #[test]
    fn longest_streak_ignores_future_days() {
        let days = vec![days_ago(0), days_ago(-1), days_ago(-2), days_ago(-3)];
        assert_eq!(current_streak(days.clone(), today()), 1);
        assert_eq!(longest_streak(days, today()), 1);
    }

    #[test]
    fn weekly_average_bands_mean() {
        let moods = [Humor::MuitoBem, Humor::MuitoBem, Humor::Bem, Humor::Bem, Humor::Normal];
        let history: Vec<_> = moods
            .iter()
            .enumerate()
            .map(|(i, h)| (now() - Duration::days(i as i64), *h))
            .collect();

        match weekly_average(history, now()) {
            WeeklyMood::Band {
                average,
                humor,
                count,
            } => {
                assert!((average - 4.2).abs() < 1e-9);
                assert_eq!(humor, Humor::Bem);
                assert_eq!(count, 5);
            }
            other => panic!("expected a band, got {other:?}"),
        }
    }

    #[test]
    fn weekly_average_window_is_inclusive() {
        let history = vec![
            (now() - Duration::days(7), Humor::Exausto),
            (now() - Duration::days(7) - Duration::seconds(1), Humor::MuitoBem),
        ];
        match weekly_average(history, now()) {
            WeeklyMood::Band { humor, count, .. } => {
                assert_eq!(humor, Humor::Exausto);
                assert_eq!(count, 1);
            }
            other => panic!("expected a band, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_moods_score_as_normal() {
        let history = vec![(now(), Humor::Unrecognized), (now(), Humor::MuitoBem)];
        match weekly_average(history, now()) {
            WeeklyMood::Band { average, .. } => assert!((average - 4.0).abs() < 1e-9),
            other => panic!("expected a band, got {other:?}"),
        }
    }

    #[test]
    fn no_recent_check_ins_is_insufficient() {
        let history = vec![(now() - Duration::days(30), Humor::Bem)];
        assert_eq!(weekly_average(history, now()), WeeklyMood::InsufficientData);

        let view = WeeklyAverage::from(WeeklyMood::InsufficientData);
        assert_eq!(view.label, INSUFFICIENT_DATA_LABEL);
        assert_eq!(view.band, None);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let days = vec![days_ago(0), days_ago(1)];
        let history = vec![(now(), Humor::Cansado)];
        assert_eq!(current_streak(days.clone(), today()), current_streak(days, today()));
        assert_eq!(
            weekly_average(history.clone(), now()),
            weekly_average(history, now())
        );
    }
}
