pub mod api;
pub mod common;
pub mod config;
pub mod demo;
pub mod fight_card;
pub mod http_client;
pub mod model;
pub mod notify;
pub mod provider;
pub mod rows;
pub mod search;
pub mod selection;
pub mod state;
pub mod view;

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, SourceKind};
use crate::provider::FightSource;

/// Builds the data source named by the configuration.
pub fn build_source(config: &Config) -> Result<Arc<dyn FightSource>> {
    match config.source {
        SourceKind::Demo => Ok(Arc::new(demo::DemoSource::new())),
        SourceKind::Http => Ok(Arc::new(api::HttpSource::new(
            &config.base_url,
            config.http_timeout,
        )?)),
    }
}
