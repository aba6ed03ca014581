use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;

pub mod catalog;
pub mod completion_service;
pub mod progress_service;
pub mod scoring_service;
pub mod sequencer;

use catalog::CourseCatalog;
use completion_service::CompletionStore;

/// Shared application state: configuration, the published catalog and the
/// completion table. Services are constructed per request on top of these
/// handles.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<CourseCatalog>,
    pub completions: Arc<CompletionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let catalog = CourseCatalog::load(Path::new(&config.catalog_path))?;
        tracing::info!(
            "Catalog loaded: {} courses, {} exams",
            catalog.course_count(),
            catalog.exam_count()
        );
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            completions: Arc::new(CompletionStore::new()),
        })
    }

    /// State seeded with an in-memory catalog, bypassing the snapshot file.
    pub fn with_catalog(config: Config, catalog: CourseCatalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            completions: Arc::new(CompletionStore::new()),
        }
    }
}
