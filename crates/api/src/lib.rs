#![forbid(unsafe_code)]

pub mod contracts;
pub mod http;
pub mod memory;
pub mod records;

pub use contracts::{
    ApiError, CertificateApi, CertificateDetails, CertificateRecord, CourseApi, ProgressApi,
    QuizApi, TextGenerationApi,
};
pub use http::{HttpBackend, Session};
pub use memory::InMemoryBackend;
pub use records::{QuestionRecord, QuizRecord};
