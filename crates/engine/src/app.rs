//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{AdminSettingsRepo, CharacterRepo, ClaimsPort, ClockPort};
use crate::use_cases;

/// Main application state.
///
/// Holds the store ports and the use cases built on them.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub claims: Arc<dyn ClaimsPort>,
}

/// Port traits injected directly; both may be the same store adapter.
pub struct Repositories {
    pub characters: Arc<dyn CharacterRepo>,
    pub admin_settings: Arc<dyn AdminSettingsRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub character_sheet: use_cases::CharacterSheetUseCases,
    pub roster: use_cases::RosterUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        admin_settings: Arc<dyn AdminSettingsRepo>,
        claims: Arc<dyn ClaimsPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let use_cases = UseCases {
            character_sheet: use_cases::CharacterSheetUseCases::new(characters.clone(), clock),
            roster: use_cases::RosterUseCases::new(characters.clone(), admin_settings.clone()),
        };

        Self {
            repositories: Repositories {
                characters,
                admin_settings,
            },
            use_cases,
            claims,
        }
    }
}
