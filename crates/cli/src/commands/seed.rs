//! Seed the database with demo accounts and listings.
//!
//! This command reads demo users and their listings from a YAML file and
//! inserts them through the same repositories and services the server uses,
//! so seeded rows look exactly like organically created ones. Users that
//! already exist (by email) and listings a seller already has (by title)
//! are skipped, which makes re-running the command safe.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use trove_core::{Category, Condition, Email, Price, Username};
use trove_server::config::TroveConfig;
use trove_server::db::{self, UserRepository};
use trove_server::models::product::NewListing;
use trove_server::services::auth::hash_password;
use trove_server::services::catalog::CatalogService;

/// Minimum password length accepted at registration; seeded accounts must
/// satisfy it too or logins would work while re-registration would not.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Seed file format
// =============================================================================

/// Root of the YAML seed file.
#[derive(Debug, Deserialize)]
struct SeedFile {
    users: Vec<SeedUser>,
}

/// One demo account with its listings.
#[derive(Debug, Deserialize)]
struct SeedUser {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    listings: Vec<SeedListing>,
}

/// One demo listing, in the same shape sellers submit through the site.
#[derive(Debug, Deserialize)]
struct SeedListing {
    title: String,
    description: String,
    category: String,
    price: String,
    condition: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// A seed user after validation, ready to insert.
#[derive(Debug)]
struct DemoUser {
    username: Username,
    email: Email,
    password: String,
    listings: Vec<NewListing>,
}

/// Counts reported after seeding.
#[derive(Debug, Default)]
struct Summary {
    users_created: usize,
    users_skipped: usize,
    listings_created: usize,
    listings_skipped: usize,
}

// =============================================================================
// Validation
// =============================================================================

/// Validate the parsed file into domain values.
///
/// Collects every problem instead of stopping at the first, so a broken
/// seed file can be fixed in one pass.
fn validate(file: &SeedFile) -> Result<Vec<DemoUser>, Vec<String>> {
    let mut users = Vec::with_capacity(file.users.len());
    let mut errors = Vec::new();

    for entry in &file.users {
        let who = &entry.username;

        let username = Username::parse(&entry.username)
            .map_err(|e| errors.push(format!("user '{who}': {e}")))
            .ok();
        let email = Email::parse(&entry.email)
            .map_err(|e| errors.push(format!("user '{who}': {e}")))
            .ok();
        if entry.password.len() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "user '{who}': password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }

        let mut listings = Vec::with_capacity(entry.listings.len());
        for listing in &entry.listings {
            match validate_listing(listing) {
                Ok(valid) => listings.push(valid),
                Err(e) => errors.push(format!("user '{who}', listing '{}': {e}", listing.title)),
            }
        }

        if let (Some(username), Some(email)) = (username, email) {
            users.push(DemoUser {
                username,
                email,
                password: entry.password.clone(),
                listings,
            });
        }
    }

    if errors.is_empty() {
        Ok(users)
    } else {
        Err(errors)
    }
}

fn validate_listing(raw: &SeedListing) -> Result<NewListing, String> {
    if raw.title.trim().is_empty() {
        return Err("title cannot be empty".to_owned());
    }
    if raw.description.trim().is_empty() {
        return Err("description cannot be empty".to_owned());
    }

    let category: Category = raw.category.parse()?;
    let price = Price::parse(&raw.price).map_err(|e| e.to_string())?;
    let condition = match raw.condition.as_deref() {
        Some(s) => s.parse::<Condition>()?,
        None => Condition::default(),
    };

    Ok(NewListing {
        title: raw.title.trim().to_owned(),
        description: raw.description.trim().to_owned(),
        category,
        price,
        condition,
        // Seeded listings carry no uploads; the catalog fills in the
        // placeholder image.
        images: Vec::new(),
        tags: raw
            .tags
            .iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect(),
    })
}

// =============================================================================
// Seeding
// =============================================================================

/// Load a YAML seed file into the database.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML seed file
/// * `reset` - If true, delete all marketplace rows first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation
/// fails, or a database operation fails.
pub async fn run(file_path: &str, reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = TroveConfig::from_env()?;

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed data from file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let file: SeedFile = serde_yaml::from_str(&content)?;

    let users = match validate(&file) {
        Ok(users) => users,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!(users = users.len(), "Seed file validated");

    // Connect to the database
    let pool = db::create_pool(&config.database_url).await?;
    info!("Connected to database");

    if reset {
        warn!("Reset requested, deleting all marketplace rows");
        // Children before parents. The foreign keys are only enforced when
        // the pragma is on, but the order costs nothing.
        for table in ["purchases", "cart_items", "products", "users"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&pool)
                .await?;
        }
    }

    let repo = UserRepository::new(&pool);
    let catalog = CatalogService::new(&pool);

    let mut summary = Summary::default();

    for demo in users {
        let user = match repo.get_by_email(&demo.email).await? {
            Some(existing) => {
                summary.users_skipped += 1;
                existing
            }
            None => {
                let hash = hash_password(&demo.password)?;
                let created = repo.create(&demo.username, &demo.email, &hash).await?;
                summary.users_created += 1;
                created
            }
        };

        let taken: HashSet<String> = catalog
            .my_listings(user.id)
            .await?
            .into_iter()
            .map(|p| p.title)
            .collect();

        for listing in demo.listings {
            if taken.contains(&listing.title) {
                summary.listings_skipped += 1;
                continue;
            }
            catalog.create(user.id, listing).await?;
            summary.listings_created += 1;
        }
    }

    // Print summary
    info!("Seeding complete!");
    info!("  Users created: {}", summary.users_created);
    info!("  Users skipped (already exist): {}", summary.users_skipped);
    info!("  Listings created: {}", summary.listings_created);
    info!(
        "  Listings skipped (already exist): {}",
        summary.listings_skipped
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn yaml(input: &str) -> SeedFile {
        serde_yaml::from_str(input).unwrap()
    }

    #[test]
    fn test_validate_accepts_well_formed_file() {
        let file = yaml(
            r"
users:
  - username: demo_seller
    email: seller@example.com
    password: trove-demo
    listings:
      - title: Road bike
        description: A sturdy commuter.
        category: Sports
        price: '120.00'
        condition: Good
        tags: [bike, commuting]
",
        );

        let users = validate(&file).unwrap();
        assert_eq!(users.len(), 1);
        let listing = users.first().unwrap().listings.first().unwrap();
        assert_eq!(listing.category, Category::Sports);
        assert_eq!(listing.condition, Condition::Good);
        assert!(listing.images.is_empty());
    }

    #[test]
    fn test_validate_defaults_missing_condition() {
        let file = yaml(
            r"
users:
  - username: demo_seller
    email: seller@example.com
    password: trove-demo
    listings:
      - title: Paperback
        description: Well thumbed.
        category: Books
        price: '3.50'
",
        );

        let users = validate(&file).unwrap();
        let listing = users.first().unwrap().listings.first().unwrap();
        assert_eq!(listing.condition, Condition::Good);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let file = yaml(
            r"
users:
  - username: x
    email: not-an-email
    password: shrt
    listings:
      - title: Lamp
        description: Warm light.
        category: Lighting
        price: '12.00'
",
        );

        // Bad username, bad email, short password, unknown category.
        let errors = validate(&file).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validate_allows_user_without_listings() {
        let file = yaml(
            r"
users:
  - username: demo_buyer
    email: buyer@example.com
    password: trove-demo
",
        );

        let users = validate(&file).unwrap();
        assert!(users[0].listings.is_empty());
    }
}
