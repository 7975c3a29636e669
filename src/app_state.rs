use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::{amadeus::FlightProvider, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn FlightProvider>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn FlightProvider>,
        shutdown_sender: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self {
            config,
            provider,
            shutdown_sender: Arc::new(Mutex::new(shutdown_sender)),
        }
    }
}
