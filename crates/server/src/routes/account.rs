//! Dashboard and profile routes.
//!
//! The dashboard re-reads the user row rather than trusting the session
//! snapshot, so profile edits show up immediately and a session pointing at
//! a deleted account falls back to the login page.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::user::{Profile, User};
use crate::routes::{MessageQuery, redirect_error, redirect_success, short_date};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// ============================================================================
// View models
// ============================================================================

/// Profile fields as shown in the edit form, blanks for unset values.
#[derive(Default)]
pub struct ProfileFormView {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl From<&Profile> for ProfileFormView {
    fn from(profile: &Profile) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            first_name: text(&profile.first_name),
            last_name: text(&profile.last_name),
            phone: text(&profile.phone),
            street: text(&profile.street),
            city: text(&profile.city),
            state: text(&profile.state),
            zip_code: text(&profile.zip_code),
            country: text(&profile.country),
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub member_since: String,
    pub profile: ProfileFormView,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl DashboardTemplate {
    fn for_user(user: &User, error: Option<String>, success: Option<String>) -> Self {
        Self {
            username: user.username.to_string(),
            email: user.email.to_string(),
            display_name: user.display_name().to_string(),
            member_since: short_date(&user.created_at),
            profile: ProfileFormView::from(&user.profile),
            error,
            success,
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Profile edit form; every field is optional and a blank clears it.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl ProfileForm {
    /// Trim every field and store blanks as `None`.
    fn into_profile(self) -> Profile {
        let clean = |field: Option<String>| {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Profile {
            first_name: clean(self.first_name),
            last_name: clean(self.last_name),
            phone: clean(self.phone),
            street: clean(self.street),
            city: clean(self.city),
            state: clean(self.state),
            zip_code: clean(self.zip_code),
            country: clean(self.country),
        }
    }
}

// ============================================================================
// Route handlers
// ============================================================================

/// Handle GET /dashboard - account overview and profile edit form.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    match AuthService::new(state.pool()).get_user(user.id).await {
        Ok(user) => {
            DashboardTemplate::for_user(&user, query.error, query.success).into_response()
        }
        Err(AuthError::UserNotFound) => {
            redirect_error("/auth/login", "User not found").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load dashboard for {}: {e}", user.id);
            redirect_error("/products", "Error loading dashboard").into_response()
        }
    }
}

/// Handle POST /profile - replace the profile fields.
#[instrument(skip(state, user, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Response {
    let profile = form.into_profile();

    match AuthService::new(state.pool())
        .update_profile(user.id, &profile)
        .await
    {
        Ok(()) => redirect_success("/dashboard", "Profile updated successfully!").into_response(),
        Err(e) => {
            tracing::error!("Failed to update profile for {}: {e}", user.id);
            redirect_error("/dashboard", "Error updating profile").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_form_blanks_clear_fields() {
        let form = ProfileForm {
            first_name: Some("  Ada  ".to_string()),
            last_name: Some("   ".to_string()),
            phone: None,
            street: Some("12 Curio Lane".to_string()),
            city: Some(String::new()),
            state: None,
            zip_code: Some("90210".to_string()),
            country: None,
        };

        let profile = form.into_profile();
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert!(profile.last_name.is_none());
        assert!(profile.phone.is_none());
        assert_eq!(profile.street.as_deref(), Some("12 Curio Lane"));
        assert!(profile.city.is_none());
        assert_eq!(profile.zip_code.as_deref(), Some("90210"));
    }
}
