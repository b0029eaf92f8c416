use std::sync::Arc;

use lms_core::model::Lesson;
use services::{CompletionCallback, PlayerServices};

pub trait UiApp: Send + Sync {
    fn lesson(&self) -> Lesson;
    fn player_services(&self) -> Arc<PlayerServices>;

    /// Called once when the lesson first completes. Hosts that advance a course
    /// outline hook in here.
    fn on_lesson_complete(&self) -> Option<CompletionCallback> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    lesson: Arc<Lesson>,
    player_services: Arc<PlayerServices>,
    on_lesson_complete: Option<CompletionCallback>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            lesson: Arc::new(app.lesson()),
            player_services: app.player_services(),
            on_lesson_complete: app.on_lesson_complete(),
        }
    }

    #[must_use]
    pub fn lesson(&self) -> Arc<Lesson> {
        Arc::clone(&self.lesson)
    }

    #[must_use]
    pub fn player_services(&self) -> Arc<PlayerServices> {
        Arc::clone(&self.player_services)
    }

    #[must_use]
    pub fn on_lesson_complete(&self) -> Option<CompletionCallback> {
        self.on_lesson_complete.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
