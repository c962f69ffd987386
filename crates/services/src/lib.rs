#![forbid(unsafe_code)]

pub mod app_services;
pub mod certificate;
pub mod error;
pub mod player;
pub mod quiz_gen;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use certificate::CertificateService;
pub use error::{CertificateError, PlayerError};
pub use player::{CoursePlayer, CourseProgressService, MarkCompleteOutcome};
