use std::sync::Arc;

use api::{CertificateApi, CertificateDetails, CertificateRecord};
use course_core::Clock;
use course_core::model::CourseId;

use crate::error::CertificateError;

/// Certificate eligibility and issuance.
#[derive(Clone)]
pub struct CertificateService {
    clock: Clock,
    certificates: Arc<dyn CertificateApi>,
}

impl CertificateService {
    #[must_use]
    pub fn new(clock: Clock, certificates: Arc<dyn CertificateApi>) -> Self {
        Self {
            clock,
            certificates,
        }
    }

    /// Fetch the learner's eligibility for a course certificate.
    ///
    /// # Errors
    ///
    /// Returns `CertificateError::Api` when eligibility cannot be fetched.
    pub async fn eligibility(
        &self,
        course_id: &CourseId,
    ) -> Result<CertificateDetails, CertificateError> {
        Ok(self.certificates.eligibility(course_id).await?)
    }

    /// Persist an issued certificate, stamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `CertificateError::NotEligible` when the details say the
    /// learner has not reached the threshold, and `CertificateError::Api`
    /// when the record cannot be stored.
    pub async fn issue(
        &self,
        course_id: &CourseId,
        certificate_url: impl Into<String>,
        details: &CertificateDetails,
    ) -> Result<CertificateRecord, CertificateError> {
        if !details.eligible {
            return Err(CertificateError::NotEligible);
        }

        let record = CertificateRecord {
            course_id: course_id.clone(),
            certificate_url: certificate_url.into(),
            learner_name: details.learner_name.clone(),
            course_name: details.course_name.clone(),
            completion_percent: details.completion_percent,
            issued_at: self.clock.now(),
        };
        self.certificates.save_certificate(&record).await?;
        Ok(record)
    }
}
