//! Course catalogue, content and review access.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use super::{cached_fetch, join_key, key_part, nonzero, CachedFetch};
use crate::cache::{CacheRegistry, SharedCache};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    Course, CourseContent, CourseId, CourseQuery, CourseReview, Enrollment, PaginationQuery,
    ReviewRequest,
};

// Listings and details only absorb bursts of repeat reads
const LIST_TTL: Duration = Duration::from_millis(600);
const DETAIL_TTL: Duration = Duration::from_millis(600);
const CONTENT_TTL: Duration = Duration::from_secs(15 * 60);
const REVIEWS_TTL: Duration = Duration::from_secs(10 * 60);
const RELATED_TTL: Duration = Duration::from_secs(30 * 60);

pub const DEFAULT_RELATED_LIMIT: u32 = 4;
pub const COURSE_LIST_PREFIX: &str = "courses_list_";

/// Prefix shared by every key scoped to one course.
///
/// The trailing `_` keeps `course_4_` from matching `course_42_...`.
pub fn course_prefix(course_id: &CourseId) -> String {
    format!("course_{course_id}_")
}

pub fn reviews_prefix(course_id: &CourseId) -> String {
    format!("course_{course_id}_reviews_")
}

pub fn courses_key(query: &CourseQuery) -> String {
    join_key(&[
        COURSE_LIST_PREFIX,
        &key_part("search", query.search.as_deref()),
        &key_part("status", query.status.as_deref()),
        &key_part("skip", nonzero(query.skip)),
        &key_part("limit", nonzero(query.limit)),
    ])
}

fn course_key((id, with_content): &(CourseId, bool)) -> String {
    if *with_content {
        format!("course_{id}_details_with_content")
    } else {
        format!("course_{id}_details")
    }
}

fn content_key(id: &CourseId) -> String {
    format!("course_{id}_content")
}

pub fn reviews_key((id, query): &(CourseId, PaginationQuery)) -> String {
    join_key(&[
        &reviews_prefix(id),
        &key_part("skip", nonzero(query.skip)),
        &key_part("limit", nonzero(query.limit)),
    ])
}

fn related_key((id, limit): &(CourseId, u32)) -> String {
    format!("course_{id}_related_limit_{limit}")
}

/// Course reads, cached per course and per filter, plus the writes that
/// invalidate them.
pub struct CourseService {
    api: ApiClient,
    registry: CacheRegistry,
    courses: CachedFetch<CourseQuery, Vec<Course>>,
    course: CachedFetch<(CourseId, bool), Course>,
    content: CachedFetch<CourseId, CourseContent>,
    reviews: CachedFetch<(CourseId, PaginationQuery), Vec<CourseReview>>,
    related: CachedFetch<(CourseId, u32), Vec<Course>>,
}

impl CourseService {
    /// Creates the service and registers its caches with `registry`.
    pub fn new(api: ApiClient, registry: CacheRegistry, default_ttl: Duration) -> Self {
        let course_lists: SharedCache<Vec<Course>> = SharedCache::new("course_lists", default_ttl);
        let details: SharedCache<Course> = SharedCache::new("course_details", default_ttl);
        let contents: SharedCache<CourseContent> = SharedCache::new("course_content", default_ttl);
        let review_lists: SharedCache<Vec<CourseReview>> =
            SharedCache::new("course_reviews", default_ttl);
        registry.register(course_lists.clone());
        registry.register(details.clone());
        registry.register(contents.clone());
        registry.register(review_lists.clone());

        let client = api.clone();
        let courses = cached_fetch(
            course_lists.clone(),
            move |query: CourseQuery| {
                let api = client.clone();
                async move { api.get_with_query::<Vec<Course>, _>("/courses/", &query).await }
            },
            courses_key,
            LIST_TTL,
        );

        let client = api.clone();
        let course = cached_fetch(
            details,
            move |(id, with_content): (CourseId, bool)| {
                let api = client.clone();
                async move {
                    api.get_with_query::<Course, _>(
                        &format!("/courses/{id}"),
                        &[("with_content", with_content)],
                    )
                    .await
                }
            },
            course_key,
            DETAIL_TTL,
        );

        let client = api.clone();
        let content = cached_fetch(
            contents,
            move |id: CourseId| {
                let api = client.clone();
                async move { api.get::<CourseContent>(&format!("/courses/{id}/content")).await }
            },
            content_key,
            CONTENT_TTL,
        );

        let client = api.clone();
        let reviews = cached_fetch(
            review_lists,
            move |(id, query): (CourseId, PaginationQuery)| {
                let api = client.clone();
                async move {
                    api.get_with_query::<Vec<CourseReview>, _>(
                        &format!("/courses/{id}/reviews"),
                        &query,
                    )
                    .await
                }
            },
            reviews_key,
            REVIEWS_TTL,
        );

        let client = api.clone();
        let related = cached_fetch(
            course_lists,
            move |(id, limit): (CourseId, u32)| {
                let api = client.clone();
                async move {
                    api.get_with_query::<Vec<Course>, _>(
                        &format!("/courses/{id}/related"),
                        &[("limit", limit)],
                    )
                    .await
                }
            },
            related_key,
            RELATED_TTL,
        );

        Self {
            api,
            registry,
            courses,
            course,
            content,
            reviews,
            related,
        }
    }

    /// Course catalogue matching `query`, cached briefly per filter.
    pub async fn get_courses(&self, query: CourseQuery) -> Result<Vec<Course>, ApiError> {
        self.courses.call(query).await
    }

    pub async fn get_course(&self, id: &CourseId, with_content: bool) -> Result<Course, ApiError> {
        self.course.call((id.clone(), with_content)).await
    }

    /// Deletes a course and drops everything cached about it, along with
    /// every catalogue listing.
    pub async fn delete_course(&self, id: &CourseId) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/courses/{id}/")).await?;
        self.registry.invalidate_prefix(&course_prefix(id));
        self.registry.invalidate_prefix(COURSE_LIST_PREFIX);
        Ok(())
    }

    /// Enrolls the signed-in user; cached views of the course are dropped.
    pub async fn enroll(&self, id: &CourseId) -> Result<Enrollment, ApiError> {
        let enrollment: Enrollment = self
            .api
            .post("/enrollments/individual", &json!({ "course_id": id }))
            .await?;
        self.registry.invalidate_prefix(&course_prefix(id));
        Ok(enrollment)
    }

    /// Module and lesson tree, cached for fifteen minutes.
    pub async fn get_course_content(&self, id: &CourseId) -> Result<CourseContent, ApiError> {
        let content = self.content.call(id.clone()).await?;
        debug!(course = %id, lessons = content.lesson_count(), "Course content loaded");
        Ok(content)
    }

    pub async fn get_course_reviews(
        &self,
        id: &CourseId,
        query: PaginationQuery,
    ) -> Result<Vec<CourseReview>, ApiError> {
        self.reviews.call((id.clone(), query)).await
    }

    /// Posts a review and drops every cached review page of the course.
    pub async fn submit_review(
        &self,
        id: &CourseId,
        review: &ReviewRequest,
    ) -> Result<CourseReview, ApiError> {
        let created: CourseReview = self
            .api
            .post(&format!("/courses/{id}/reviews"), review)
            .await?;
        self.registry.invalidate_prefix(&reviews_prefix(id));
        Ok(created)
    }

    pub async fn get_related_courses(
        &self,
        id: &CourseId,
        limit: Option<u32>,
    ) -> Result<Vec<Course>, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT);
        self.related.call((id.clone(), limit)).await
    }
}
