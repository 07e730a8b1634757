use std::sync::Arc;

use tolk_config::Config;
use tolk_config::translator::TranslationSettings;
use tolk_core::{PageLimits, ResolverOptions, SessionManager, Transport, TranslatorFactory};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub factory: Arc<dyn TranslatorFactory>,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config, factory: Arc<dyn TranslatorFactory>, transport: Arc<dyn Transport>) -> Self {
        let options = ResolverOptions::from_pipeline(&config.pipeline);
        let sessions = SessionManager::new(factory.clone(), transport, options);

        Self {
            config: Arc::new(RwLock::new(config)),
            factory,
            sessions,
        }
    }

    /// Request settings, or the configured ones when the request has none
    pub async fn settings_or_default(&self, settings: Option<TranslationSettings>) -> TranslationSettings {
        match settings {
            Some(settings) => settings,
            None => self.config.read().await.translator.clone(),
        }
    }

    pub async fn limits_or_default(&self, limits: Option<PageLimits>) -> PageLimits {
        match limits {
            Some(limits) => limits,
            None => PageLimits::from_pipeline(&self.config.read().await.pipeline),
        }
    }
}
