//! Optional enrichment sources: weather, wearable devices and the forecast
//! model. Each sits behind a trait so the mocks used here can be swapped for
//! real integrations.

use crate::models::{DailyEntry, WeatherSnapshot, WearableReading};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    #[error("weather lookup failed: {0}")]
    Weather(String),
    #[error("wearable device unavailable: {0}")]
    Wearable(String),
    #[error("prediction failed: {0}")]
    Prediction(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, CollaboratorError>;
}

#[async_trait]
pub trait WearableDevice: Send + Sync {
    async fn sync(&self) -> Result<WearableReading, CollaboratorError>;
}

#[async_trait]
pub trait PredictionModel: Send + Sync {
    /// Length of the vector returned by `forecast`.
    fn output_len(&self) -> usize;

    async fn forecast(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, CollaboratorError>;
}

/// Numeric features of an entry in a fixed order:
/// steps, calories, water, sleep, weight, mood, active minutes.
pub const FEATURE_COUNT: usize = 7;

pub fn feature_vector(entry: &DailyEntry) -> Vec<f64> {
    vec![
        f64::from(entry.steps),
        f64::from(entry.calories),
        f64::from(entry.water),
        entry.sleep,
        entry.weight,
        f64::from(entry.mood),
        f64::from(entry.active_minutes),
    ]
}

/// Reports a fixed condition for every location.
pub struct StaticWeather {
    snapshot: WeatherSnapshot,
}

impl StaticWeather {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            snapshot: WeatherSnapshot {
                temperature: 18.0,
                condition: condition.into(),
                humidity: 55.0,
            },
        }
    }
}

#[async_trait]
impl WeatherProvider for StaticWeather {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, CollaboratorError> {
        if location.trim().is_empty() {
            return Err(CollaboratorError::Weather("no location given".to_string()));
        }
        Ok(self.snapshot.clone())
    }
}

/// Stand-in for a paired device; returns one canned reading.
pub struct MockWearable {
    reading: Option<WearableReading>,
}

impl MockWearable {
    pub fn connected() -> Self {
        Self {
            reading: Some(WearableReading {
                steps: 8_500,
                calories_burned: 420,
                active_minutes: 45,
                sleep_hours: 7.0,
                average_heart_rate: 72,
            }),
        }
    }

    pub fn disconnected() -> Self {
        Self { reading: None }
    }
}

#[async_trait]
impl WearableDevice for MockWearable {
    async fn sync(&self) -> Result<WearableReading, CollaboratorError> {
        self.reading
            .ok_or_else(|| CollaboratorError::Wearable("no device paired".to_string()))
    }
}

/// Forecasts each feature as its mean over the input window.
pub struct MeanModel;

#[async_trait]
impl PredictionModel for MeanModel {
    fn output_len(&self) -> usize {
        FEATURE_COUNT
    }

    async fn forecast(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, CollaboratorError> {
        if features.is_empty() {
            return Err(CollaboratorError::Prediction("no history to forecast from".to_string()));
        }
        let mut sums = vec![0.0; FEATURE_COUNT];
        for row in features {
            if row.len() != FEATURE_COUNT {
                return Err(CollaboratorError::Prediction(format!(
                    "expected {FEATURE_COUNT} features, got {}",
                    row.len()
                )));
            }
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        let count = features.len() as f64;
        Ok(sums.into_iter().map(|sum| sum / count).collect())
    }
}
