use std::sync::Arc;

use crate::service::WinRateService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WinRateService>,
}

impl AppState {
    pub fn new(service: Arc<WinRateService>) -> Self {
        Self { service }
    }
}
