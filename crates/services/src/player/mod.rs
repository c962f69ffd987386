mod state;
mod workflow;

// Public API of the player subsystem.
pub use crate::error::PlayerError;
pub use state::CoursePlayer;
pub use workflow::{CourseProgressService, MarkCompleteOutcome};
