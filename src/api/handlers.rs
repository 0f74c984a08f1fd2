//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint. Reads go through the
//! cached services; writes go to the backend and invalidate on success.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::CacheRegistry;
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{ApiError, GatewayError, Result};
use crate::models::{
    CacheStatsResponse, Course, CourseContent, CourseDetailQuery, CourseId, CourseQuery,
    CourseReview, Enrollment, HealthResponse, InvalidateRequest, InvalidateResponse,
    MarkReadRequest, MessageResponse, Notification, NotificationQuery, PaginationQuery,
    PasswordChangeRequest, PreferencesUpdate, ProfileUpdate, RelatedQuery, ReviewRequest, User,
};
use crate::services::{CourseService, UserService};

/// Application state shared across all handlers.
///
/// Owns every cache in the process through the services and the registry;
/// tests build a fresh one per case.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub courses: Arc<CourseService>,
    pub registry: CacheRegistry,
}

impl AppState {
    /// Creates the services and their caches around one backend client.
    pub fn new(api: ApiClient, default_ttl: Duration) -> Self {
        let registry = CacheRegistry::new();
        let users = UserService::new(api.clone(), registry.clone(), default_ttl);
        let courses = CourseService::new(api, registry.clone(), default_ttl);
        Self {
            users: Arc::new(users),
            courses: Arc::new(courses),
            registry,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ApiError> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::new(api, config.default_ttl()))
    }
}

// == Profile ==

/// Handler for GET /profile
pub async fn get_profile_handler(State(state): State<AppState>) -> Result<Json<User>> {
    Ok(Json(state.users.get_profile().await?))
}

/// Handler for PUT /profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    if update.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Profile update has no fields".to_string(),
        ));
    }
    Ok(Json(state.users.update_profile(&update).await?))
}

/// Handler for PUT /profile/preferences
pub async fn update_preferences_handler(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<User>> {
    Ok(Json(state.users.update_preferences(&update).await?))
}

/// Handler for POST /profile/password
pub async fn change_password_handler(
    State(state): State<AppState>,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }
    let result = state
        .users
        .change_password(&req.current_password, &req.new_password)
        .await?;
    Ok(Json(result))
}

// == Notifications ==

/// Handler for GET /notifications
pub async fn get_notifications_handler(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.users.get_notifications(query).await?))
}

/// Handler for POST /notifications/read
pub async fn mark_notifications_read_handler(
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<MessageResponse>> {
    if req.notification_ids.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "No notification ids given".to_string(),
        ));
    }
    let result = state
        .users
        .mark_notifications_read(&req.notification_ids)
        .await?;
    Ok(Json(result))
}

// == Courses ==

/// Handler for GET /courses
pub async fn list_courses_handler(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<Course>>> {
    Ok(Json(state.courses.get_courses(query).await?))
}

/// Handler for GET /courses/:id
pub async fn get_course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CourseDetailQuery>,
) -> Result<Json<Course>> {
    let id = CourseId::parse(&id)?;
    Ok(Json(
        state.courses.get_course(&id, query.with_content).await?,
    ))
}

/// Handler for DELETE /courses/:id
pub async fn delete_course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = CourseId::parse(&id)?;
    state.courses.delete_course(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Course '{}' deleted successfully",
        id
    ))))
}

/// Handler for POST /courses/:id/enroll
pub async fn enroll_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>> {
    let id = CourseId::parse(&id)?;
    Ok(Json(state.courses.enroll(&id).await?))
}

/// Handler for GET /courses/:id/content
pub async fn course_content_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseContent>> {
    let id = CourseId::parse(&id)?;
    Ok(Json(state.courses.get_course_content(&id).await?))
}

/// Handler for GET /courses/:id/reviews
pub async fn course_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<CourseReview>>> {
    let id = CourseId::parse(&id)?;
    Ok(Json(state.courses.get_course_reviews(&id, query).await?))
}

/// Handler for POST /courses/:id/reviews
pub async fn submit_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(review): Json<ReviewRequest>,
) -> Result<Json<CourseReview>> {
    let id = CourseId::parse(&id)?;
    if let Some(error_msg) = review.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }
    Ok(Json(state.courses.submit_review(&id, &review).await?))
}

/// Handler for GET /courses/:id/related
pub async fn related_courses_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<Course>>> {
    let id = CourseId::parse(&id)?;
    Ok(Json(
        state.courses.get_related_courses(&id, query.limit).await?,
    ))
}

// == Cache Administration ==

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::new(state.registry.stats()))
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }
    let removed = state.registry.invalidate_prefix(&req.prefix);
    Ok(Json(InvalidateResponse {
        prefix: req.prefix,
        removed,
    }))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    let removed = state.registry.total_entries();
    state.registry.clear_all();
    info!(removed, "Cache cleared on request");
    Json(MessageResponse::new(format!(
        "Cleared {} cached entries",
        removed
    )))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
