//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use trove_core::{Email, UserId, Username};

/// A registered user (domain type).
///
/// The password hash is deliberately not part of this type; it is only
/// handled inside the auth service.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Public display name, unique site-wide.
    pub username: Username,
    /// User's email address, unique site-wide.
    pub email: Email,
    /// Optional profile and shipping details.
    pub profile: Profile,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Optional profile fields edited from the dashboard.
///
/// Every field is free-form text; blank form inputs are stored as `None`.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl User {
    /// Display name for greetings: first name when set, else the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.profile
            .first_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.username.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(1),
            username: Username::parse("finder_keeper").unwrap(),
            email: Email::parse("finder@example.com").unwrap(),
            profile: Profile::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = sample_user();
        assert_eq!(user.display_name(), "finder_keeper");
    }

    #[test]
    fn test_display_name_prefers_first_name() {
        let mut user = sample_user();
        user.profile.first_name = Some("Ada".to_string());
        assert_eq!(user.display_name(), "Ada");
    }
}
