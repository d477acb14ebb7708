use std::{env, path::PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub location: String,
    pub default_height_cm: f64,
    pub prediction_model: bool,
    pub weather_condition: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            location: "home".to_string(),
            default_height_cm: 170.0,
            prediction_model: true,
            weather_condition: "Clear".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unparsable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let location = lookup("TRACKER_LOCATION")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.location);
        let default_height_cm = lookup("DEFAULT_HEIGHT_CM")
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|height| height.is_finite() && *height > 0.0)
            .unwrap_or(defaults.default_height_cm);
        let prediction_model = match lookup("PREDICTION_MODEL").as_deref().map(str::trim) {
            Some("off") | Some("none") => false,
            _ => defaults.prediction_model,
        };
        let weather_condition = lookup("WEATHER_CONDITION")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.weather_condition);

        Self {
            port,
            data_path,
            location,
            default_height_cm,
            prediction_model,
            weather_condition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_values_use_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9090"),
            ("APP_DATA_PATH", "/tmp/tracker.json"),
            ("DEFAULT_HEIGHT_CM", "-4"),
            ("PREDICTION_MODEL", "off"),
            ("WEATHER_CONDITION", "Snow"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 9090);
        assert_eq!(config.data_path, PathBuf::from("/tmp/tracker.json"));
        assert_eq!(config.default_height_cm, 170.0);
        assert!(!config.prediction_model);
        assert_eq!(config.weather_condition, "Snow");
        assert_eq!(config.location, "home");
    }
}
