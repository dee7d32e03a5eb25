use std::sync::Arc;

use crate::config::{AppConfig, LatencyConfig};
use crate::latency::{Latency, NoLatency, Op, SimulatedLatency};
use crate::store::{Fixtures, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<AppConfig>,
    pub latency: Arc<dyn Latency>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let fixtures = match &config.fixtures_dir {
            Some(dir) => Fixtures::from_dir(dir).await?,
            None => Fixtures::embedded()?,
        };

        let latency: Arc<dyn Latency> = if config.latency.enabled {
            Arc::new(SimulatedLatency::new(config.latency.scale))
        } else {
            Arc::new(NoLatency)
        };

        Ok(Self::from_parts(Store::new(fixtures), config, latency))
    }

    pub fn from_parts(store: Store, config: Arc<AppConfig>, latency: Arc<dyn Latency>) -> Self {
        Self {
            store: Arc::new(store),
            config,
            latency,
        }
    }

    /// Waits out the simulated latency of `op`.
    pub async fn pause(&self, op: Op) {
        self.latency.pause(op).await;
    }

    /// Embedded fixtures, no latency, default identity enabled.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            fixtures_dir: None,
            latency: LatencyConfig {
                enabled: false,
                scale: 0.0,
            },
            default_identity: true,
        });
        let fixtures = Fixtures::embedded().expect("embedded fixtures are valid");
        Self::from_parts(Store::new(fixtures), config, Arc::new(NoLatency))
    }
}
