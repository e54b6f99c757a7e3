use crate::store::ChecklistStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<ChecklistStore>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: ChecklistStore) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
        }
    }
}
