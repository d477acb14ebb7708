use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/track", post(handlers::track_form))
        .route("/api/entries", get(handlers::list_entries).post(handlers::track_entry))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/charts", get(handlers::get_charts))
        .route("/api/goals", get(handlers::get_goals).put(handlers::update_goals))
        .route("/api/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .route("/api/wearable/sync", post(handlers::sync_wearable))
        .route("/api/prediction", get(handlers::get_prediction))
        .route("/api/friends", get(handlers::list_friends).post(handlers::add_friend))
        .route("/api/challenges", get(handlers::list_challenges).post(handlers::add_challenge))
        .with_state(state)
}
