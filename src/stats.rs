use crate::models::{
    BmiCategory, BmiReport, Challenge, ChallengeProgress, ChartPoint, ChartSeries, DailyEntry,
    DerivedSummary, GoalProgress, Goals, Metric, Streak, WeatherSnapshot, WindowAverages,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

const RESTFUL_SLEEP_HOURS: f64 = 7.0;
const ACTIVE_MINUTES_BASELINE: u32 = 30;
const MAX_STRESS: f64 = 100.0;

pub struct RewardRule {
    pub name: &'static str,
    pub metric: Metric,
    pub threshold: f64,
}

pub const REWARD_RULES: [RewardRule; 4] = [
    RewardRule {
        name: "Free Movie Ticket",
        metric: Metric::Steps,
        threshold: 70_000.0,
    },
    RewardRule {
        name: "Healthy Snack Voucher",
        metric: Metric::Calories,
        threshold: 3_500.0,
    },
    RewardRule {
        name: "Hydration Hero Badge",
        metric: Metric::Water,
        threshold: 56.0,
    },
    RewardRule {
        name: "Sleep Master Badge",
        metric: Metric::Sleep,
        threshold: 56.0,
    },
];

pub fn summarize(window: &[DailyEntry]) -> DerivedSummary {
    let mut summary = DerivedSummary {
        entry_count: window.len(),
        total_steps: 0,
        total_calories: 0,
        total_water: 0,
        total_sleep: 0.0,
        total_active_minutes: 0,
        total_mood: 0,
        latest_weight: None,
        averages: None,
        average_stress: None,
    };

    let mut stress_sum = 0.0;
    let mut stress_count = 0usize;
    for entry in window {
        summary.total_steps += u64::from(entry.steps);
        summary.total_calories += u64::from(entry.calories);
        summary.total_water += u64::from(entry.water);
        summary.total_sleep += entry.sleep;
        summary.total_active_minutes += u64::from(entry.active_minutes);
        summary.total_mood += u64::from(entry.mood);
        if let Some(stress) = entry.stress {
            stress_sum += stress;
            stress_count += 1;
        }
    }

    // Windows may come from an unsorted import, so "latest" is by timestamp.
    summary.latest_weight = window
        .iter()
        .max_by_key(|entry| entry.timestamp)
        .map(|entry| entry.weight);

    if !window.is_empty() {
        let len = window.len() as f64;
        summary.averages = Some(WindowAverages {
            steps: summary.total_steps as f64 / len,
            calories: summary.total_calories as f64 / len,
            water: summary.total_water as f64 / len,
            sleep: summary.total_sleep / len,
            active_minutes: summary.total_active_minutes as f64 / len,
            mood: summary.total_mood as f64 / len,
        });
    }
    if stress_count > 0 {
        summary.average_stress = Some(stress_sum / stress_count as f64);
    }

    summary
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<BmiReport> {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    // Bands apply to the exact ratio; only the reported value is rounded.
    let category = if raw < 18.5 {
        BmiCategory::Underweight
    } else if raw < 25.0 {
        BmiCategory::Normal
    } else if raw < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };
    Some(BmiReport {
        value: round2(raw),
        category,
    })
}

pub fn goal_progress(window: &[DailyEntry], goals: &Goals) -> Vec<GoalProgress> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let actual: f64 = window.iter().map(|entry| entry.metric(metric)).sum();
            let goal = goals.target(metric);
            let percent = if goal > 0.0 {
                round2(actual / goal * 100.0)
            } else {
                0.0
            };
            GoalProgress {
                metric,
                actual,
                goal,
                percent,
                met: goal > 0.0 && actual >= goal,
            }
        })
        .collect()
}

/// Runs over distinct calendar days, whatever order the entries are in.
pub fn streak(entries: &[DailyEntry]) -> Streak {
    let days: BTreeSet<NaiveDate> = entries.iter().map(DailyEntry::date).collect();

    let mut result = Streak::default();
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        result.current = match previous {
            Some(prev) if (day - prev).num_days() == 1 => result.current + 1,
            _ => 1,
        };
        result.longest = result.longest.max(result.current);
        previous = Some(day);
    }
    result.last_day = previous;
    result
}

pub fn lifetime_total(entries: &[DailyEntry], metric: Metric) -> f64 {
    entries.iter().map(|entry| entry.metric(metric)).sum()
}

/// Every reward whose lifetime threshold has been reached.
pub fn earned_rewards(entries: &[DailyEntry]) -> Vec<&'static str> {
    REWARD_RULES
        .iter()
        .filter(|rule| lifetime_total(entries, rule.metric) >= rule.threshold)
        .map(|rule| rule.name)
        .collect()
}

/// Adds newly earned rewards to `unlocked` and returns just those.
pub fn unlock_rewards(entries: &[DailyEntry], unlocked: &mut BTreeSet<String>) -> Vec<String> {
    earned_rewards(entries)
        .into_iter()
        .filter(|name| unlocked.insert((*name).to_string()))
        .map(str::to_string)
        .collect()
}

pub fn stress_score(sleep: f64, active_minutes: u32, weather: Option<&WeatherSnapshot>) -> f64 {
    let mut score = 0.0;
    if sleep < RESTFUL_SLEEP_HOURS {
        score += (RESTFUL_SLEEP_HOURS - sleep) * 10.0;
    }
    if active_minutes < ACTIVE_MINUTES_BASELINE {
        score += f64::from(ACTIVE_MINUTES_BASELINE - active_minutes) * 2.0;
    }
    if weather.is_some_and(WeatherSnapshot::is_adverse) {
        score += 10.0;
    }
    score.min(MAX_STRESS)
}

pub fn chart_series(window: &[DailyEntry]) -> Vec<ChartSeries> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let max = window
                .iter()
                .map(|entry| entry.metric(metric))
                .fold(0.0_f64, f64::max);
            let points = window
                .iter()
                .map(|entry| {
                    let value = entry.metric(metric);
                    ChartPoint {
                        date: entry.date(),
                        value,
                        width_percent: if max > 0.0 {
                            round2(value / max * 100.0)
                        } else {
                            0.0
                        },
                    }
                })
                .collect();
            ChartSeries {
                metric,
                title: format!("{} - Last {} Entries", metric.label(), window.len()),
                points,
            }
        })
        .collect()
}

pub fn challenge_progress(entries: &[DailyEntry], challenge: &Challenge) -> ChallengeProgress {
    let total: f64 = entries
        .iter()
        .filter(|entry| (challenge.start..=challenge.end).contains(&entry.date()))
        .map(|entry| entry.metric(challenge.metric))
        .sum();
    let percent = if challenge.target > 0.0 {
        round2(total / challenge.target * 100.0)
    } else {
        0.0
    };
    ChallengeProgress {
        challenge: challenge.clone(),
        total,
        percent,
        completed: total >= challenge.target,
    }
}
