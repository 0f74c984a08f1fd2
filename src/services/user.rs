//! Profile and notification access for the signed-in user.

use std::time::Duration;

use serde_json::json;

use super::{cached_fetch, CachedFetch};
use crate::cache::{CacheRegistry, SharedCache};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    MessageResponse, Notification, NotificationQuery, PreferencesUpdate, ProfileUpdate, User,
};

const PROFILE_TTL: Duration = Duration::from_secs(5 * 60);
const NOTIFICATIONS_TTL: Duration = Duration::from_secs(2 * 60);

/// Every user-scoped key starts with this
pub const USER_PREFIX: &str = "user_";
pub const PROFILE_KEY: &str = "user_profile";
pub const NOTIFICATIONS_PREFIX: &str = "user_notifications_";

fn profile_key(_: &()) -> String {
    PROFILE_KEY.to_string()
}

/// `user_notifications_read_{true|false|all}_limit_{n|default}`
pub fn notifications_key(query: &NotificationQuery) -> String {
    let read = match query.read {
        Some(read) => format!("read_{read}"),
        None => "read_all".to_string(),
    };
    let limit = match query.limit {
        Some(limit) if limit > 0 => format!("limit_{limit}"),
        _ => "limit_default".to_string(),
    };
    format!("{NOTIFICATIONS_PREFIX}{read}_{limit}")
}

/// User profile and notification reads, cached, plus the writes that
/// invalidate them.
pub struct UserService {
    api: ApiClient,
    registry: CacheRegistry,
    profile: CachedFetch<(), User>,
    notifications: CachedFetch<NotificationQuery, Vec<Notification>>,
}

impl UserService {
    /// Creates the service and registers its caches with `registry`.
    pub fn new(api: ApiClient, registry: CacheRegistry, default_ttl: Duration) -> Self {
        let profiles: SharedCache<User> = SharedCache::new("profiles", default_ttl);
        let notification_lists: SharedCache<Vec<Notification>> =
            SharedCache::new("notifications", default_ttl);
        registry.register(profiles.clone());
        registry.register(notification_lists.clone());

        let client = api.clone();
        let profile = cached_fetch(
            profiles,
            move |()| {
                let api = client.clone();
                async move { api.get::<User>("/users/me").await }
            },
            profile_key,
            PROFILE_TTL,
        );

        let client = api.clone();
        let notifications = cached_fetch(
            notification_lists,
            move |query: NotificationQuery| {
                let api = client.clone();
                async move {
                    api.get_with_query::<Vec<Notification>, _>("/users/me/notifications", &query)
                        .await
                }
            },
            notifications_key,
            NOTIFICATIONS_TTL,
        );

        Self {
            api,
            registry,
            profile,
            notifications,
        }
    }

    /// Current user's profile (`GET /users/me`), cached for five minutes.
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.profile.call(()).await
    }

    /// Updates the profile and drops every user-scoped cache entry.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user: User = self.api.put("/users/me", update).await?;
        self.registry.invalidate_prefix(USER_PREFIX);
        Ok(user)
    }

    /// Replaces the user's preferences and drops the cached profile.
    pub async fn update_preferences(&self, update: &PreferencesUpdate) -> Result<User, ApiError> {
        let user: User = self.api.put("/users/me/preferences", update).await?;
        self.registry.invalidate_prefix(PROFILE_KEY);
        Ok(user)
    }

    /// Password changes touch nothing cached.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.api
            .post(
                "/users/me/change-password",
                &json!({
                    "current_password": current_password,
                    "new_password": new_password,
                }),
            )
            .await
    }

    /// Notifications matching `query`, cached for two minutes per filter.
    pub async fn get_notifications(
        &self,
        query: NotificationQuery,
    ) -> Result<Vec<Notification>, ApiError> {
        self.notifications.call(query).await
    }

    /// Marks notifications read and drops every cached notification list.
    pub async fn mark_notifications_read(
        &self,
        notification_ids: &[String],
    ) -> Result<MessageResponse, ApiError> {
        let result: MessageResponse = self
            .api
            .post(
                "/users/me/notifications/mark-read",
                &json!({ "notification_ids": notification_ids }),
            )
            .await?;
        self.registry.invalidate_prefix(NOTIFICATIONS_PREFIX);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_key() {
        let key = |read, limit| notifications_key(&NotificationQuery { read, limit });

        assert_eq!(key(None, None), "user_notifications_read_all_limit_default");
        assert_eq!(key(Some(true), Some(10)), "user_notifications_read_true_limit_10");
        assert_eq!(key(Some(false), Some(0)), "user_notifications_read_false_limit_default");
    }

    #[test]
    fn test_user_keys_share_prefix() {
        assert!(profile_key(&()).starts_with(USER_PREFIX));
        assert!(notifications_key(&NotificationQuery::default()).starts_with(USER_PREFIX));
        assert!(!notifications_key(&NotificationQuery::default()).starts_with(PROFILE_KEY));
    }

    #[test]
    fn test_new_registers_caches() {
        let registry = CacheRegistry::new();
        let api = ApiClient::with_client(reqwest::Client::new(), "http://localhost:1");
        let _service = UserService::new(api, registry.clone(), Duration::from_secs(60));

        let names: Vec<String> = registry.stats().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["profiles", "notifications"]);
    }
}
