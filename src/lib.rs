pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod groups;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod summary;
pub mod ui;

pub use aggregate::{RecordsTopStatistics, aggregate};
pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
