//! `learnhub-core`: shared building blocks for the learnhub client.
//!
//! Pure types and helpers only: identifiers, wire enumerations and
//! display formatting. Nothing here performs IO.

pub mod entity;
pub mod error;
pub mod format;
pub mod id;
pub mod kinds;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CertificateId, CourseId, LessonId, QuizId, ReviewId, UserId};
pub use kinds::{CourseLevel, CourseStatus, LessonType, QuizType, UserStatus};
