use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Constructed once at startup, shared by every request.
    pub engine: Arc<dyn OcrEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
