//! Service container for dependency injection
//!
//! Wires up the course builder with its collaborators.

use std::sync::Arc;

use crate::application::services::CourseBuilderService;
use crate::config::Settings;
use crate::infrastructure::traits::{BlobRegistry, PayloadResolver, Prompter, StdioPrompter};

/// Container holding settings and collaborator implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// File-to-reference resolver for image and PDF payloads
    pub resolver: Arc<dyn PayloadResolver>,

    /// Rename prompts and help/contact alerts
    pub prompter: Arc<dyn Prompter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let resolver = Arc::new(BlobRegistry::new(settings.blob_scheme.clone()));
        Self::with_deps(settings, resolver, Arc::new(StdioPrompter))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        resolver: Arc<dyn PayloadResolver>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            resolver,
            prompter,
        }
    }

    /// Fresh course builder over an empty tree.
    pub fn course_builder(&self) -> CourseBuilderService {
        CourseBuilderService::new(Arc::clone(&self.resolver), self.settings.id_strategy)
    }
}
