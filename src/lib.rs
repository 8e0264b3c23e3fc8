pub mod app;
pub mod controller;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod speech;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;
pub mod state;

pub use app::router;
pub use controller::Controller;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use store::Store;
