//! Registration, login, and logout over HTTP.
//!
//! These tests drive the auth forms the way a browser does and check
//! where the server sends the user, including the notice carried in the
//! redirect query string.

#![allow(clippy::unwrap_used)]

use trove_integration_tests::{TestApp, TestUser, assert_is_redirect_to};

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_logs_the_user_in() {
    let app = TestApp::spawn().await;
    let client = app.client();
    let user = TestUser::generate();

    let response = client.register(&user).await;
    assert_is_redirect_to(&response, "/products");

    // The session cookie from registration reaches protected pages directly
    let dashboard = client.get("/dashboard").await;
    assert_eq!(dashboard.status().as_u16(), 200);

    let body = dashboard.text().await.unwrap();
    assert!(body.contains(&user.username));
    assert!(body.contains(&user.email));
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = TestApp::spawn().await;
    let client = app.client();
    let user = TestUser::generate();

    let response = client
        .post_form(
            "/auth/register",
            &[
                ("username", user.username.as_str()),
                ("email", user.email.as_str()),
                ("password", "one-password"),
                ("confirm_password", "another-password"),
            ],
        )
        .await;

    assert_is_redirect_to(&response, "/auth/register?error=Passwords%20do%20not%20match");
}

#[tokio::test]
async fn test_register_rejects_taken_email() {
    let app = TestApp::spawn().await;
    let user = TestUser::generate();
    app.client().register(&user).await;

    // Same email, different username, from a fresh session
    let rival = TestUser {
        username: format!("rival-{}", trove_integration_tests::unique_tag()),
        ..user
    };
    let response = app.client().register(&rival).await;

    assert_is_redirect_to(
        &response,
        "/auth/register?error=User%20with%20this%20email%20or%20username%20already%20exists",
    );
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::spawn().await;
    let client = app.client();
    let user = TestUser {
        password: "tiny".to_owned(),
        ..TestUser::generate()
    };

    let response = client.register(&user).await;

    assert_is_redirect_to(
        &response,
        "/auth/register?error=Password%20must%20be%20at%20least%206%20characters%20long",
    );
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_login_round_trip() {
    let app = TestApp::spawn().await;
    let user = TestUser::generate();
    app.client().register(&user).await;

    // A separate session logs in with the same credentials
    let client = app.client();
    let response = client.login(&user).await;
    assert_is_redirect_to(&response, "/products");

    let response = client.logout().await;
    assert_is_redirect_to(&response, "/auth/login");

    // The session is gone, protected pages bounce to login again
    let response = client.get("/dashboard").await;
    assert_is_redirect_to(&response, "/auth/login");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::spawn().await;
    let user = TestUser::generate();
    app.client().register(&user).await;

    let client = app.client();
    let response = client
        .post_form(
            "/auth/login",
            &[
                ("email", user.email.as_str()),
                ("password", "not-the-password"),
            ],
        )
        .await;

    assert_is_redirect_to(&response, "/auth/login?error=Invalid%20email%20or%20password");
}

#[tokio::test]
async fn test_login_with_unknown_email_gives_the_same_notice() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .post_form(
            "/auth/login",
            &[("email", "nobody@example.com"), ("password", "whatever-1")],
        )
        .await;

    // Indistinguishable from a wrong password, so the form can't be used
    // to probe which emails are registered
    assert_is_redirect_to(&response, "/auth/login?error=Invalid%20email%20or%20password");
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn test_guests_are_redirected_from_protected_pages() {
    let app = TestApp::spawn().await;
    let client = app.client();

    for path in [
        "/products",
        "/products/new",
        "/products/my/listings",
        "/cart",
        "/purchases",
        "/dashboard",
    ] {
        let response = client.get(path).await;
        assert_is_redirect_to(&response, "/auth/login");
    }

    // Mutations too
    let response = client.post("/checkout").await;
    assert_is_redirect_to(&response, "/auth/login");
}

#[tokio::test]
async fn test_logged_in_users_skip_the_auth_pages() {
    let app = TestApp::spawn().await;
    let client = app.client();
    client.register(&TestUser::generate()).await;

    for path in ["/auth/login", "/auth/register"] {
        let response = client.get(path).await;
        assert_is_redirect_to(&response, "/products");
    }
}

#[tokio::test]
async fn test_home_redirects_by_session_state() {
    let app = TestApp::spawn().await;

    let guest = app.client();
    let response = guest.get("/").await;
    assert_is_redirect_to(&response, "/auth/login");

    let client = app.client();
    client.register(&TestUser::generate()).await;
    let response = client.get("/").await;
    assert_is_redirect_to(&response, "/products");
}

#[tokio::test]
async fn test_login_page_displays_the_notice_from_the_query() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get("/auth/login?error=Invalid%20email%20or%20password")
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_notices_are_escaped_not_rendered() {
    let app = TestApp::spawn().await;

    // %3Cscript%3E is "<script>"; the page must show it as text
    let response = app
        .client()
        .get("/auth/login?error=%3Cscript%3Ealert(1)%3C%2Fscript%3E")
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}
