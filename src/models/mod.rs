//! Domain models and gateway DTOs
//!
//! Backend payloads (users, courses, reviews) plus the request and response
//! bodies the gateway itself defines.

pub mod course;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use course::{
    Course, CourseContent, CourseId, CourseModule, CourseReview, Enrollment, Lesson, Resource,
};
pub use requests::{
    CourseDetailQuery, CourseQuery, InvalidateRequest, MarkReadRequest, NotificationQuery,
    PaginationQuery, PasswordChangeRequest, PreferencesUpdate, RelatedQuery, ReviewRequest,
};
pub use responses::{CacheStatsResponse, HealthResponse, InvalidateResponse, MessageResponse};
pub use user::{Notification, ProfileUpdate, User, UserRole};
