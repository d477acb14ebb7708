use crate::collaborators::{CollaboratorError, feature_vector};
use crate::errors::AppError;
use crate::ingest::{
    build_entry, confirmation_message, validate_goals, validate_name, validate_profile,
};
use crate::models::{
    AppData, Challenge, ChallengeProgress, ChartSeries, DailyEntry, Friend, FriendRequest, Goals,
    LastQuery, PredictionResponse, RawEntry, SummaryResponse, TrackResponse, UserProfile,
    WearableReading,
};
use crate::state::AppState;
use crate::stats::{
    bmi, challenge_progress, chart_series, goal_progress, streak, summarize, unlock_rewards,
};
use crate::storage::{export_entries, import_entries, persist_or_log};
use crate::ui::render_index;
use crate::window;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

const DEFAULT_CHART_ENTRIES: usize = 7;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let now = Utc::now();
    let data = state.data.lock().await;
    let weekly = summarize(&window::weekly(&data.entries, now));
    let monthly = summarize(&window::monthly(&data.entries, now));
    Html(render_index(&weekly, &monthly, streak(&data.entries)))
}

pub async fn track_entry(
    State(state): State<AppState>,
    Json(raw): Json<RawEntry>,
) -> Result<Json<TrackResponse>, AppError> {
    Ok(Json(apply_entry(&state, &raw, Utc::now()).await?))
}

pub async fn track_form(
    State(state): State<AppState>,
    Form(raw): Form<RawEntry>,
) -> Result<Redirect, AppError> {
    apply_entry(&state, &raw, Utc::now()).await?;
    Ok(Redirect::to("/"))
}

async fn apply_entry(
    state: &AppState,
    raw: &RawEntry,
    now: DateTime<Utc>,
) -> Result<TrackResponse, AppError> {
    let weather = match state.weather.current(&state.location).await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("continuing without weather: {err}");
            None
        }
    };

    let entry = build_entry(raw, now, weather)?;

    let mut data = state.data.lock().await;
    data.entries.push(entry.clone());
    let AppData {
        entries, rewards, ..
    } = &mut *data;
    let newly_unlocked = unlock_rewards(entries, rewards);
    for name in &newly_unlocked {
        info!(reward = %name, "reward unlocked");
    }

    persist_or_log(&state.data_path, &data).await;

    Ok(TrackResponse {
        message: confirmation_message(&entry),
        entry,
        newly_unlocked,
    })
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<DailyEntry>> {
    let data = state.data.lock().await;
    Json(data.entries.clone())
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let data = state.data.lock().await;
    Json(build_summary(&state, &data, Utc::now()))
}

pub fn build_summary(state: &AppState, data: &AppData, now: DateTime<Utc>) -> SummaryResponse {
    let weekly = summarize(&window::weekly(&data.entries, now));
    let monthly = summarize(&window::monthly(&data.entries, now));
    let profile = state.profile(data);
    let latest_weight = data
        .entries
        .iter()
        .max_by_key(|entry| entry.timestamp)
        .map(|entry| entry.weight);
    let today = window::on_date(&data.entries, now.date_naive());

    SummaryResponse {
        weekly,
        monthly,
        bmi: latest_weight.and_then(|weight| bmi(weight, profile.height_cm)),
        streak: streak(&data.entries),
        goal_progress: goal_progress(&today, &data.goals),
        rewards: data.rewards.iter().cloned().collect(),
    }
}

pub async fn get_charts(
    State(state): State<AppState>,
    Query(query): Query<LastQuery>,
) -> Json<Vec<ChartSeries>> {
    let last = query.last.unwrap_or(DEFAULT_CHART_ENTRIES);
    let data = state.data.lock().await;
    Json(chart_series(&window::last_n(&data.entries, last)))
}

pub async fn get_goals(State(state): State<AppState>) -> Json<Goals> {
    let data = state.data.lock().await;
    Json(data.goals.clone())
}

pub async fn update_goals(
    State(state): State<AppState>,
    Json(goals): Json<Goals>,
) -> Result<Json<Goals>, AppError> {
    validate_goals(&goals)?;
    let mut data = state.data.lock().await;
    data.goals = goals.clone();
    persist_or_log(&state.data_path, &data).await;
    info!("goals updated");
    Ok(Json(goals))
}

pub async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    let data = state.data.lock().await;
    Json(state.profile(&data))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    validate_profile(&profile)?;
    let mut data = state.data.lock().await;
    data.profile = Some(profile.clone());
    persist_or_log(&state.data_path, &data).await;
    Ok(Json(profile))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let document = export_entries(&data.entries)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"fitness-data.json\"",
            ),
        ],
        document,
    ))
}

pub async fn import(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<DailyEntry>>, AppError> {
    let entries = import_entries(&body)?;
    let mut data = state.data.lock().await;
    data.entries = entries;
    let AppData {
        entries, rewards, ..
    } = &mut *data;
    unlock_rewards(entries, rewards);
    info!(count = data.entries.len(), "entries imported");
    persist_or_log(&state.data_path, &data).await;
    Ok(Json(data.entries.clone()))
}

pub async fn sync_wearable(
    State(state): State<AppState>,
) -> Result<Json<WearableReading>, AppError> {
    match state.wearable.sync().await {
        Ok(reading) => Ok(Json(reading)),
        Err(err) => {
            warn!("wearable sync failed: {err}");
            Err(AppError::bad_gateway(format!(
                "{err}; please enter today's data manually"
            )))
        }
    }
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Query(query): Query<LastQuery>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Some(model) = state.model.clone() else {
        return Ok(Json(PredictionResponse {
            model_loaded: false,
            forecast: None,
        }));
    };

    let last = query.last.unwrap_or(DEFAULT_CHART_ENTRIES);
    let features: Vec<Vec<f64>> = {
        let data = state.data.lock().await;
        window::last_n(&data.entries, last)
            .iter()
            .map(feature_vector)
            .collect()
    };
    if features.is_empty() {
        return Ok(Json(PredictionResponse {
            model_loaded: true,
            forecast: None,
        }));
    }

    let forecast = model.forecast(&features).await?;
    if forecast.len() != model.output_len() {
        warn!(
            expected = model.output_len(),
            got = forecast.len(),
            "discarding malformed forecast"
        );
        return Err(CollaboratorError::Prediction(format!(
            "model returned {} values, expected {}",
            forecast.len(),
            model.output_len()
        ))
        .into());
    }
    Ok(Json(PredictionResponse {
        model_loaded: true,
        forecast: Some(forecast),
    }))
}

pub async fn list_friends(State(state): State<AppState>) -> Json<Vec<Friend>> {
    let data = state.data.lock().await;
    Json(data.friends.clone())
}

pub async fn add_friend(
    State(state): State<AppState>,
    Json(request): Json<FriendRequest>,
) -> Result<Json<Friend>, AppError> {
    let name = validate_name("friend name", &request.name)?;
    let mut data = state.data.lock().await;
    if data.friends.iter().any(|friend| friend.name == name) {
        return Err(AppError::bad_request(format!("{name} is already a friend")));
    }
    let friend = Friend {
        name,
        added_on: Utc::now().date_naive(),
    };
    data.friends.push(friend.clone());
    persist_or_log(&state.data_path, &data).await;
    Ok(Json(friend))
}

pub async fn list_challenges(State(state): State<AppState>) -> Json<Vec<ChallengeProgress>> {
    let data = state.data.lock().await;
    Json(
        data.challenges
            .iter()
            .map(|challenge| challenge_progress(&data.entries, challenge))
            .collect(),
    )
}

pub async fn add_challenge(
    State(state): State<AppState>,
    Json(challenge): Json<Challenge>,
) -> Result<Json<ChallengeProgress>, AppError> {
    let name = validate_name("challenge name", &challenge.name)?;
    if !(challenge.target.is_finite() && challenge.target > 0.0) {
        return Err(AppError::bad_request("challenge target must be greater than zero"));
    }
    if challenge.end < challenge.start {
        return Err(AppError::bad_request("challenge must end on or after its start"));
    }
    let challenge = Challenge { name, ..challenge };

    let mut data = state.data.lock().await;
    data.challenges.push(challenge.clone());
    persist_or_log(&state.data_path, &data).await;
    Ok(Json(challenge_progress(&data.entries, &challenge)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockWearable, PredictionModel, WeatherProvider};
    use crate::config::AppConfig;
    use crate::models::WeatherSnapshot;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use std::sync::Arc;

    struct FailingWeather;

    #[async_trait]
    impl WeatherProvider for FailingWeather {
        async fn current(&self, _location: &str) -> Result<WeatherSnapshot, CollaboratorError> {
            Err(CollaboratorError::Weather("offline".to_string()))
        }
    }

    struct ShortModel;

    #[async_trait]
    impl PredictionModel for ShortModel {
        fn output_len(&self) -> usize {
            3
        }

        async fn forecast(&self, _features: &[Vec<f64>]) -> Result<Vec<f64>, CollaboratorError> {
            Ok(vec![1.0])
        }
    }

    fn test_state(config: AppConfig) -> AppState {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("fitness_tracker_handlers_{}_{}.json", std::process::id(), nanos));
        let config = AppConfig {
            data_path: path,
            ..config
        };
        AppState::new(&config, AppData::default())
    }

    fn raw(steps: &str) -> RawEntry {
        RawEntry {
            steps: steps.into(),
            calories: "200".into(),
            water: "4".into(),
            sleep: "5".into(),
            weight: "70".into(),
            mood: "6".into(),
            active_minutes: "40".into(),
            activities: None,
        }
    }

    #[tokio::test]
    async fn entry_is_stored_with_weather_and_stress() {
        let state = test_state(AppConfig {
            weather_condition: "Rain".into(),
            ..AppConfig::default()
        });
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        let response = apply_entry(&state, &raw("70000"), now).await.unwrap();

        assert_eq!(response.entry.stress, Some(30.0));
        assert_eq!(response.newly_unlocked, vec!["Free Movie Ticket"]);
        assert!(response.message.starts_with("Great job! You've taken 70000 steps"));

        let again = apply_entry(&state, &raw("10"), now).await.unwrap();
        assert!(again.newly_unlocked.is_empty());
        assert_eq!(state.data.lock().await.entries.len(), 2);
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn weather_failure_does_not_block_ingestion() {
        let state = test_state(AppConfig::default()).with_weather(Arc::new(FailingWeather));
        let response = apply_entry(&state, &raw("100"), Utc::now()).await.unwrap();
        assert!(response.entry.weather.is_none());
        assert_eq!(response.entry.stress, Some(20.0));
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn invalid_entry_leaves_state_untouched() {
        let state = test_state(AppConfig::default());
        let err = apply_entry(&state, &raw("many"), Utc::now()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "steps must be a valid number");
        assert!(state.data.lock().await.entries.is_empty());
    }

    #[tokio::test]
    async fn summary_uses_profile_height() {
        let state = test_state(AppConfig::default());
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        apply_entry(&state, &raw("1000"), now).await.unwrap();

        let data = state.data.lock().await;
        let summary = build_summary(&state, &data, now);
        let report = summary.bmi.unwrap();
        assert_eq!(report.value, 24.22);
        assert_eq!(summary.weekly.entry_count, 1);
        assert_eq!(summary.streak.current, 1);
        drop(data);

        let Json(profile) = update_profile(
            State(state.clone()),
            Json(UserProfile {
                name: "Alex".into(),
                height_cm: 180.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(profile.height_cm, 180.0);
        let data = state.data.lock().await;
        assert_eq!(build_summary(&state, &data, now).bmi.unwrap().value, 21.6);
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn prediction_short_circuits_without_model() {
        let state = test_state(AppConfig {
            prediction_model: false,
            ..AppConfig::default()
        });
        let Json(response) = get_prediction(State(state), Query(LastQuery { last: None }))
            .await
            .unwrap();
        assert!(!response.model_loaded);
        assert!(response.forecast.is_none());
    }

    #[tokio::test]
    async fn prediction_returns_mean_forecast() {
        let state = test_state(AppConfig::default());
        apply_entry(&state, &raw("1000"), Utc::now()).await.unwrap();
        apply_entry(&state, &raw("3000"), Utc::now()).await.unwrap();

        let Json(response) = get_prediction(State(state.clone()), Query(LastQuery { last: None }))
            .await
            .unwrap();
        let forecast = response.forecast.unwrap();
        assert_eq!(forecast.len(), crate::collaborators::FEATURE_COUNT);
        assert_eq!(forecast[0], 2000.0);
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn forecast_of_wrong_length_is_rejected() {
        let mut state = test_state(AppConfig::default());
        state.model = Some(Arc::new(ShortModel));
        apply_entry(&state, &raw("1000"), Utc::now()).await.unwrap();

        let err = get_prediction(State(state.clone()), Query(LastQuery { last: Some(7) }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "prediction failed: model returned 1 values, expected 3");
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn disconnected_wearable_asks_for_manual_entry() {
        let state =
            test_state(AppConfig::default()).with_wearable(Arc::new(MockWearable::disconnected()));
        let err = sync_wearable(State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.ends_with("please enter today's data manually"));
    }
}
