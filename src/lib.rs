pub mod app;
pub mod collaborators;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod window;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;
