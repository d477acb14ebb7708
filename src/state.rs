use crate::collaborators::{
    MeanModel, MockWearable, PredictionModel, StaticWeather, WearableDevice, WeatherProvider,
};
use crate::config::AppConfig;
use crate::models::{AppData, UserProfile};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub location: String,
    pub default_height_cm: f64,
    pub data: Arc<Mutex<AppData>>,
    pub weather: Arc<dyn WeatherProvider>,
    pub wearable: Arc<dyn WearableDevice>,
    pub model: Option<Arc<dyn PredictionModel>>,
}

impl AppState {
    /// State wired with the mock collaborators the config asks for.
    pub fn new(config: &AppConfig, data: AppData) -> Self {
        let model: Option<Arc<dyn PredictionModel>> = if config.prediction_model {
            Some(Arc::new(MeanModel))
        } else {
            None
        };
        Self {
            data_path: config.data_path.clone(),
            location: config.location.clone(),
            default_height_cm: config.default_height_cm,
            data: Arc::new(Mutex::new(data)),
            weather: Arc::new(StaticWeather::new(config.weather_condition.clone())),
            wearable: Arc::new(MockWearable::connected()),
            model,
        }
    }

    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_wearable(mut self, wearable: Arc<dyn WearableDevice>) -> Self {
        self.wearable = wearable;
        self
    }

    pub fn profile(&self, data: &AppData) -> UserProfile {
        data.profile.clone().unwrap_or_else(|| UserProfile {
            height_cm: self.default_height_cm,
            ..UserProfile::default()
        })
    }
}
