use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub condition: String,
    pub humidity: f64,
}

impl WeatherSnapshot {
    pub fn is_adverse(&self) -> bool {
        let condition = self.condition.to_ascii_lowercase();
        condition.contains("rain") || condition.contains("snow")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub timestamp: DateTime<Utc>,
    pub steps: u32,
    pub calories: u32,
    pub water: u32,
    pub sleep: f64,
    pub weight: f64,
    pub mood: u8,
    pub active_minutes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<f64>,
}

impl DailyEntry {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Steps => f64::from(self.steps),
            Metric::Calories => f64::from(self.calories),
            Metric::Water => f64::from(self.water),
            Metric::Sleep => self.sleep,
            Metric::ActiveMinutes => f64::from(self.active_minutes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Steps,
    Calories,
    Water,
    Sleep,
    ActiveMinutes,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Steps,
        Metric::Calories,
        Metric::Water,
        Metric::Sleep,
        Metric::ActiveMinutes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Steps => "Steps",
            Metric::Calories => "Calories",
            Metric::Water => "Water",
            Metric::Sleep => "Sleep",
            Metric::ActiveMinutes => "Active Minutes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub steps: u32,
    pub calories: u32,
    pub water: u32,
    pub sleep: f64,
    pub active_minutes: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            steps: 10_000,
            calories: 500,
            water: 8,
            sleep: 8.0,
            active_minutes: 30,
        }
    }
}

impl Goals {
    pub fn target(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Steps => f64::from(self.steps),
            Metric::Calories => f64::from(self.calories),
            Metric::Water => f64::from(self.water),
            Metric::Sleep => self.sleep,
            Metric::ActiveMinutes => f64::from(self.active_minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    pub height_cm: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            height_cm: 170.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub name: String,
    pub added_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub name: String,
    pub metric: Metric,
    pub target: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The persisted document. Each field is one named key of the store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub entries: Vec<DailyEntry>,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub rewards: BTreeSet<String>,
    #[serde(default)]
    pub friends: Vec<Friend>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    pub profile: Option<UserProfile>,
}

/// Field values as typed into the tracking form. JSON clients may send
/// numbers; they are kept as text until validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub steps: String,
    #[serde(deserialize_with = "string_or_number")]
    pub calories: String,
    #[serde(deserialize_with = "string_or_number")]
    pub water: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sleep: String,
    #[serde(deserialize_with = "string_or_number")]
    pub weight: String,
    #[serde(deserialize_with = "string_or_number")]
    pub mood: String,
    #[serde(deserialize_with = "string_or_number")]
    pub active_minutes: String,
    #[serde(default)]
    pub activities: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WearableReading {
    pub steps: u32,
    pub calories_burned: u32,
    pub active_minutes: u32,
    pub sleep_hours: f64,
    pub average_heart_rate: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub message: String,
    pub entry: DailyEntry,
    pub newly_unlocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAverages {
    pub steps: f64,
    pub calories: f64,
    pub water: f64,
    pub sleep: f64,
    pub active_minutes: f64,
    pub mood: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSummary {
    pub entry_count: usize,
    pub total_steps: u64,
    pub total_calories: u64,
    pub total_water: u64,
    pub total_sleep: f64,
    pub total_active_minutes: u64,
    pub total_mood: u64,
    pub latest_weight: Option<f64>,
    /// `None` when the window holds no entries.
    pub averages: Option<WindowAverages>,
    pub average_stress: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    Normal,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obese")]
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub value: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    /// Day the current run ends on; it may lie in the past.
    pub last_day: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub metric: Metric,
    pub actual: f64,
    pub goal: f64,
    pub percent: f64,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub challenge: Challenge,
    pub total: f64,
    pub percent: f64,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub weekly: DerivedSummary,
    pub monthly: DerivedSummary,
    pub bmi: Option<BmiReport>,
    pub streak: Streak,
    pub goal_progress: Vec<GoalProgress>,
    pub rewards: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub model_loaded: bool,
    pub forecast: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct LastQuery {
    pub last: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FriendRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_entry_accepts_numbers_and_strings() {
        let raw: RawEntry = serde_json::from_value(serde_json::json!({
            "steps": 4200,
            "calories": "300",
            "water": 5,
            "sleep": 6.5,
            "weight": "72.4",
            "mood": 8,
            "active_minutes": "25"
        }))
        .unwrap();
        assert_eq!(raw.steps, "4200");
        assert_eq!(raw.sleep, "6.5");
        assert_eq!(raw.weight, "72.4");
        assert!(raw.activities.is_none());

        let err = serde_json::from_value::<RawEntry>(serde_json::json!({
            "steps": [1],
            "calories": "1", "water": "1", "sleep": "1",
            "weight": "1", "mood": "1", "active_minutes": "1"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn bmi_category_serializes_with_display_label() {
        let json = serde_json::to_string(&BmiCategory::Normal).unwrap();
        assert_eq!(json, "\"Normal weight\"");
    }

    #[test]
    fn adverse_weather_matches_rain_and_snow() {
        let mut weather = WeatherSnapshot {
            temperature: 1.0,
            condition: "Heavy SNOW".into(),
            humidity: 80.0,
        };
        assert!(weather.is_adverse());
        weather.condition = "Partly cloudy".into();
        assert!(!weather.is_adverse());
    }
}
