//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /profile`, `PUT /profile` - Current user's profile
//! - `PUT /profile/preferences` - Replace user preferences
//! - `POST /profile/password` - Change password
//! - `GET /notifications`, `POST /notifications/read` - Notifications
//! - `GET /courses`, `GET|DELETE /courses/:id` - Course catalogue
//! - `POST /courses/:id/enroll` - Enroll in a course
//! - `GET /courses/:id/content` - Module and lesson tree
//! - `GET|POST /courses/:id/reviews` - Course reviews
//! - `GET /courses/:id/related` - Related courses
//! - `GET /cache/stats`, `POST /cache/invalidate`, `DELETE /cache` - Cache administration
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
