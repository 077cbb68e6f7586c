//! Authentication route handlers.
//!
//! Handles login, registration, and logout. Successful login and
//! registration bind a [`CurrentUser`] to the session; everything else in
//! the app hangs off that identity.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{RequireGuest, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::routes::{MessageQuery, redirect_error};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(_guest: RequireGuest, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// A missing account and a wrong password produce the same notice, so the
/// form can't be used to probe which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return redirect_error("/auth/login", "Please provide email and password").into_response();
    }

    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {e}");
                return redirect_error("/auth/login", "An error occurred during login")
                    .into_response();
            }

            set_sentry_user(&current_user.id, Some(current_user.email.as_str()));
            Redirect::to("/products").into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            redirect_error("/auth/login", "Invalid email or password").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            redirect_error("/auth/login", "An error occurred during login").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    _guest: RequireGuest,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle registration form submission.
///
/// A successful registration logs the user straight in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.username.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return redirect_error("/auth/register", "All fields are required").into_response();
    }

    if form.password != form.confirm_password {
        return redirect_error("/auth/register", "Passwords do not match").into_response();
    }

    match AuthService::new(state.pool())
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session after registration: {e}");
                return redirect_error("/auth/login", "An error occurred during registration")
                    .into_response();
            }

            set_sentry_user(&current_user.id, Some(current_user.email.as_str()));
            Redirect::to("/products").into_response()
        }
        Err(AuthError::UserAlreadyExists) => redirect_error(
            "/auth/register",
            "User with this email or username already exists",
        )
        .into_response(),
        Err(AuthError::WeakPassword(_)) => redirect_error(
            "/auth/register",
            "Password must be at least 6 characters long",
        )
        .into_response(),
        Err(AuthError::InvalidEmail(_)) => {
            redirect_error("/auth/register", "Please enter a valid email address").into_response()
        }
        Err(AuthError::InvalidUsername(e)) => {
            redirect_error("/auth/register", &e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            redirect_error("/auth/register", "An error occurred during registration")
                .into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the stored identity and destroys the session; failures are
/// logged and the user is sent to the login page regardless.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();
    Redirect::to("/auth/login").into_response()
}
