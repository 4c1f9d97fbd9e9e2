//! Shared application state for axum handlers.

use std::sync::Arc;

use opsdeck_app::ports::IdGenerator;
use opsdeck_app::services::automation_service::AutomationService;

/// Application state shared across all axum handlers.
///
/// Generic over the id generator to avoid dynamic dispatch. `Clone` is
/// implemented manually so the generator itself does not need to be `Clone`;
/// only the `Arc` wrapper is cloned.
pub struct AppState<G> {
    /// Automation store behind its lock.
    pub automation_service: Arc<AutomationService<G>>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            automation_service: Arc::clone(&self.automation_service),
        }
    }
}

impl<G> AppState<G>
where
    G: IdGenerator + Send + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(automation_service: AutomationService<G>) -> Self {
        Self {
            automation_service: Arc::new(automation_service),
        }
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service is also shared outside the HTTP layer.
    pub fn from_arc(automation_service: Arc<AutomationService<G>>) -> Self {
        Self { automation_service }
    }
}
