//! Application state for the grade engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::gradebook::Gradebook;

/// Shared application state.
///
/// Holds the gradebook every handler works against. Cloning the state only
/// clones the `Arc`.
#[derive(Clone)]
pub struct AppState {
    gradebook: Arc<Gradebook>,
}

impl AppState {
    /// Creates a new application state around a gradebook.
    pub fn new(gradebook: Gradebook) -> Self {
        Self {
            gradebook: Arc::new(gradebook),
        }
    }

    /// Returns the shared gradebook.
    pub fn gradebook(&self) -> &Gradebook {
        &self.gradebook
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradebook::tests::{new_enrollment, seeded_gradebook};

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_the_gradebook() {
        let state = AppState::new(seeded_gradebook());
        let clone = state.clone();
        let created = state
            .gradebook()
            .create_enrollment(new_enrollment("SV00001", "MH00101", Some("7")))
            .unwrap();
        assert!(clone.gradebook().get_enrollment(created.id()).is_ok());
    }
}
