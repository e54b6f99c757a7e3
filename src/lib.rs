pub mod app;
pub mod catalog;
pub mod errors;
pub mod export;
pub mod flatten;
pub mod handlers;
pub mod models;
pub mod photos;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;
pub mod state;

pub use app::router;
pub use catalog::Catalog;
pub use handlers::restore_saved;
pub use state::AppState;
pub use storage::resolve_data_path;
pub use store::ChecklistStore;
