use std::sync::Arc;

use api::{
    CertificateApi, CourseApi, HttpBackend, ProgressApi, QuizApi, Session, TextGenerationApi,
};
use course_core::Clock;

use crate::certificate::CertificateService;
use crate::player::CourseProgressService;

/// Assembles the app-facing services over a set of backend collaborators.
#[derive(Clone)]
pub struct AppServices {
    course_progress: Arc<CourseProgressService>,
    certificates: Arc<CertificateService>,
}

impl AppServices {
    /// Build services over the platform's HTTP API for the given session.
    #[must_use]
    pub fn new_http(session: Session, clock: Clock) -> Self {
        let backend = Arc::new(HttpBackend::new(session));
        Self::with_backends(
            clock,
            Arc::clone(&backend) as Arc<dyn CourseApi>,
            Arc::clone(&backend) as Arc<dyn ProgressApi>,
            Arc::clone(&backend) as Arc<dyn QuizApi>,
            Arc::clone(&backend) as Arc<dyn TextGenerationApi>,
            backend as Arc<dyn CertificateApi>,
        )
    }

    /// Build services over arbitrary collaborator implementations.
    #[must_use]
    pub fn with_backends(
        clock: Clock,
        courses: Arc<dyn CourseApi>,
        progress: Arc<dyn ProgressApi>,
        quizzes: Arc<dyn QuizApi>,
        generation: Arc<dyn TextGenerationApi>,
        certificates: Arc<dyn CertificateApi>,
    ) -> Self {
        let course_progress = Arc::new(CourseProgressService::new(
            clock, courses, progress, quizzes, generation,
        ));
        let certificates = Arc::new(CertificateService::new(clock, certificates));
        Self {
            course_progress,
            certificates,
        }
    }

    #[must_use]
    pub fn course_progress(&self) -> Arc<CourseProgressService> {
        Arc::clone(&self.course_progress)
    }

    #[must_use]
    pub fn certificates(&self) -> Arc<CertificateService> {
        Arc::clone(&self.certificates)
    }
}
