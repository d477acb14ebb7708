use crate::models::{DailyEntry, Goals, RawEntry, UserProfile, WeatherSnapshot};
use crate::stats::stress_score;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must be a valid number")]
    NotANumber(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber(field))?;
    if value < 0 {
        return Err(ValidationError::Negative(field));
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        min: 0,
        max: i64::from(u32::MAX),
    })
}

fn parse_real(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber(field))?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber(field));
    }
    Ok(value)
}

fn parse_mood(raw: &str) -> Result<u8, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber("mood"))?;
    if !(0..=10).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "mood",
            min: 0,
            max: 10,
        });
    }
    Ok(value as u8)
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value < 0.0 {
        Err(ValidationError::Negative(field))
    } else {
        Ok(value)
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

fn split_activities(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Validates form input and builds an entry stamped at `now`.
///
/// The stress score is derived from the parsed values and the optional
/// weather snapshot.
pub fn build_entry(
    raw: &RawEntry,
    now: DateTime<Utc>,
    weather: Option<WeatherSnapshot>,
) -> Result<DailyEntry, ValidationError> {
    let steps = parse_count("steps", &raw.steps)?;
    let calories = parse_count("calories", &raw.calories)?;
    let water = parse_count("water", &raw.water)?;
    let sleep = non_negative("sleep", parse_real("sleep", &raw.sleep)?)?;
    let weight = positive("weight", parse_real("weight", &raw.weight)?)?;
    let mood = parse_mood(&raw.mood)?;
    let active_minutes = parse_count("active minutes", &raw.active_minutes)?;

    let stress = stress_score(sleep, active_minutes, weather.as_ref());

    Ok(DailyEntry {
        timestamp: now,
        steps,
        calories,
        water,
        sleep,
        weight,
        mood,
        active_minutes,
        activities: split_activities(raw.activities.as_deref()),
        weather,
        stress: Some(stress),
    })
}

/// Checks an already-typed entry, e.g. one read back from an imported file.
pub fn validate_entry(entry: &DailyEntry) -> Result<(), ValidationError> {
    non_negative("sleep", entry.sleep)?;
    if !entry.sleep.is_finite() {
        return Err(ValidationError::NotANumber("sleep"));
    }
    if !entry.weight.is_finite() {
        return Err(ValidationError::NotANumber("weight"));
    }
    positive("weight", entry.weight)?;
    if entry.mood > 10 {
        return Err(ValidationError::OutOfRange {
            field: "mood",
            min: 0,
            max: 10,
        });
    }
    if let Some(stress) = entry.stress {
        if !(0.0..=100.0).contains(&stress) {
            return Err(ValidationError::OutOfRange {
                field: "stress",
                min: 0,
                max: 100,
            });
        }
    }
    Ok(())
}

pub fn validate_goals(goals: &Goals) -> Result<(), ValidationError> {
    positive("steps goal", f64::from(goals.steps))?;
    positive("calories goal", f64::from(goals.calories))?;
    positive("water goal", f64::from(goals.water))?;
    if !goals.sleep.is_finite() {
        return Err(ValidationError::NotANumber("sleep goal"));
    }
    positive("sleep goal", goals.sleep)?;
    positive("active minutes goal", f64::from(goals.active_minutes))?;
    Ok(())
}

pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    if !profile.height_cm.is_finite() {
        return Err(ValidationError::NotANumber("height"));
    }
    positive("height", profile.height_cm)?;
    Ok(())
}

pub fn validate_name(field: &'static str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(trimmed.to_string())
}

pub fn confirmation_message(entry: &DailyEntry) -> String {
    format!(
        "Great job! You've taken {} steps, burned {} calories, drank {} glasses of water, and slept for {} hours.",
        entry.steps, entry.calories, entry.water, entry.sleep
    )
}
