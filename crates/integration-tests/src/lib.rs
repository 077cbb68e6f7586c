//! Integration tests for Trove.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trove-integration-tests
//! ```
//!
//! Each test spawns the real application on an ephemeral port with its own
//! temporary database and upload directory, then drives it over HTTP the
//! way a browser would: cookie jar, form posts, multipart uploads. The
//! harness never follows redirects, so every test can assert exactly where
//! a handler sends the user.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Harness code; a panic here is a test failure with a usable message.
#![allow(clippy::expect_used)]
#![allow(clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::Router;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde::Serialize;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower_http::services::ServeDir;
use tower_sessions_sqlx_store::SqliteStore;
use uuid::Uuid;

use trove_server::config::TroveConfig;
use trove_server::db;
use trove_server::middleware;
use trove_server::routes;
use trove_server::services::media::MediaStore;
use trove_server::state::AppState;

/// A small real JPEG for upload tests, borrowed from the bundled assets.
pub const TINY_JPEG: &[u8] =
    include_bytes!("../../server/static/images/placeholder-product.jpg");

// =============================================================================
// Test Application
// =============================================================================

/// A running instance of the application under test.
pub struct TestApp {
    /// Base URL of the spawned server, e.g. `http://127.0.0.1:54321`.
    pub base_url: String,
    /// Direct pool into the test database, for row-level assertions.
    pub pool: SqlitePool,
    // Held for its Drop; the database file and uploads vanish with it.
    _data_dir: TempDir,
}

impl TestApp {
    /// Spawn the application with a fresh database and upload directory.
    pub async fn spawn() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let db_path = data_dir.path().join("trove-test.db");
        let upload_dir = data_dir.path().join("uploads");

        let config = TroveConfig {
            database_url: SecretString::from(format!("sqlite://{}", db_path.display())),
            host: "127.0.0.1".parse().expect("loopback address"),
            port: 0,
            base_url: "http://127.0.0.1".to_owned(),
            upload_dir: upload_dir.clone(),
            static_dir: PathBuf::from("../server/static"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("create pool");
        db::MIGRATOR.run(&pool).await.expect("run migrations");

        let media = MediaStore::init(config.upload_dir.clone())
            .await
            .expect("create upload directory");

        let session_store = SqliteStore::new(pool.clone());
        session_store
            .migrate()
            .await
            .expect("create session table");
        let session_layer = middleware::create_session_layer(session_store, &config);

        let state = AppState::new(config.clone(), pool.clone(), media);

        let app = Router::new()
            .merge(routes::routes())
            .nest_service("/uploads", ServeDir::new(&upload_dir))
            .nest_service("/images", ServeDir::new(config.static_dir.join("images")))
            .layer(session_layer)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server runs");
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
            _data_dir: data_dir,
        }
    }

    /// A fresh cookie-holding client against this app.
    ///
    /// Each client is an independent browser session; tests that involve a
    /// buyer and a seller create one per user.
    #[must_use]
    pub fn client(&self) -> TestClient {
        let http = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("build http client");

        TestClient {
            base_url: self.base_url.clone(),
            http,
        }
    }
}

// =============================================================================
// Test Client
// =============================================================================

/// One browser session: a cookie jar plus request helpers.
pub struct TestClient {
    base_url: String,
    http: Client,
}

impl TestClient {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Response {
        self.http
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// POST a urlencoded form.
    pub async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Response {
        self.http
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST form request")
    }

    /// POST a multipart form, as the listing routes expect.
    pub async fn post_multipart(&self, path: &str, form: reqwest::multipart::Form) -> Response {
        self.http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("POST multipart request")
    }

    /// POST with an empty body (logout, checkout).
    pub async fn post(&self, path: &str) -> Response {
        self.http
            .post(self.url(path))
            .send()
            .await
            .expect("POST request")
    }

    /// Register an account. On success the server logs the session in.
    pub async fn register(&self, user: &TestUser) -> Response {
        self.post_form(
            "/auth/register",
            &[
                ("username", user.username.as_str()),
                ("email", user.email.as_str()),
                ("password", user.password.as_str()),
                ("confirm_password", user.password.as_str()),
            ],
        )
        .await
    }

    /// Log in with an account's credentials.
    pub async fn login(&self, user: &TestUser) -> Response {
        self.post_form(
            "/auth/login",
            &[
                ("email", user.email.as_str()),
                ("password", user.password.as_str()),
            ],
        )
        .await
    }

    /// Log out the current session.
    pub async fn logout(&self) -> Response {
        self.post("/auth/logout").await
    }
}

// =============================================================================
// Test Data
// =============================================================================

/// Credentials for a generated test account.
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// A unique account that satisfies the registration rules.
    #[must_use]
    pub fn generate() -> Self {
        let tag = unique_tag();
        Self {
            username: format!("user-{tag}"),
            email: format!("{tag}@example.com"),
            password: "a-decent-password".to_owned(),
        }
    }
}

/// A short unique tag for usernames and emails, so accounts created within
/// one test never collide.
#[must_use]
pub fn unique_tag() -> String {
    let mut tag = Uuid::new_v4().simple().to_string();
    tag.truncate(8);
    tag
}

/// A complete listing form with no images attached. The category is
/// `Electronics` and the condition `Good`; tests that care override by
/// building their own form.
#[must_use]
pub fn listing_form(title: &str, price: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("title", title.to_owned())
        .text("description", "Listed from an automated test.")
        .text("category", "Electronics")
        .text("price", price.to_owned())
        .text("condition", "Good")
        .text("tags", "test-data")
}

/// Attach an image part holding a real JPEG to a listing form.
#[must_use]
pub fn with_image(form: reqwest::multipart::Form, filename: &str) -> reqwest::multipart::Form {
    form.part(
        "images",
        reqwest::multipart::Part::bytes(TINY_JPEG.to_vec())
            .file_name(filename.to_owned())
            .mime_str("image/jpeg")
            .expect("static mime type"),
    )
}

// =============================================================================
// Assertions
// =============================================================================

/// Assert that a response is a redirect to exactly `location`.
pub fn assert_is_redirect_to(response: &Response, location: &str) {
    assert_eq!(
        response.status().as_u16(),
        303,
        "expected a redirect, got {}",
        response.status()
    );
    assert_eq!(redirect_target(response), location);
}

/// The Location header of a redirect response.
#[must_use]
pub fn redirect_target(response: &Response) -> &str {
    response
        .headers()
        .get("location")
        .expect("Location header")
        .to_str()
        .expect("ASCII Location header")
}
