//! Listing routes: browse, detail, create, edit, delete, my listings, and
//! add-to-cart.
//!
//! Create and update submissions arrive as `multipart/form-data` because
//! they can carry image files. The text fields are collected into a
//! [`ListingForm`] and validated as a whole, so a submission with several
//! problems reports all of them in one notice instead of one per round trip.
//! Image files are only written to disk after the form validates, which
//! keeps rejected submissions from leaving files behind.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;

use trove_core::{Category, Condition, Price, PriceError, ProductId};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::product::{
    BrowseQuery, ListingUpdate, NewListing, Product, ProductWithSeller, SellerContact, parse_tags,
};
use crate::routes::{MessageQuery, redirect_error, redirect_success, short_date};
use crate::services::cart::{CartError, CartService};
use crate::services::catalog::{CatalogError, CatalogService};
use crate::services::media::UploadedFile;
use crate::state::AppState;

const NOT_YOURS_TO_EDIT: &str = "Product not found or you are not authorized to edit it";
const NOT_YOURS_TO_DELETE: &str = "Product not found or you are not authorized to delete it";

// ============================================================================
// View models
// ============================================================================

/// A listing as shown on browse cards.
pub struct ProductCardView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub category: String,
    pub condition: String,
    pub image: String,
    pub seller: String,
}

impl From<&ProductWithSeller> for ProductCardView {
    fn from(listing: &ProductWithSeller) -> Self {
        Self {
            id: listing.product.id.as_i64(),
            title: listing.product.title.clone(),
            price: listing.product.price.to_string(),
            category: listing.product.category.label().to_string(),
            condition: listing.product.condition.label().to_string(),
            image: listing.product.primary_image().to_string(),
            seller: listing.seller.username.clone(),
        }
    }
}

/// A listing row on the seller's own listings page.
pub struct ListingRowView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub category: String,
    pub status: String,
    pub image: String,
    pub views: i64,
    pub listed_on: String,
}

impl From<&Product> for ListingRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            price: product.price.to_string(),
            category: product.category.label().to_string(),
            status: product.status.to_string(),
            image: product.primary_image().to_string(),
            views: product.views,
            listed_on: short_date(&product.created_at),
        }
    }
}

/// A listing's full detail view.
pub struct ProductDetailView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub status: String,
    pub price: String,
    pub views: i64,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub listed_on: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.label().to_string(),
            condition: product.condition.label().to_string(),
            status: product.status.to_string(),
            price: product.price.to_string(),
            views: product.views,
            images: product.images.clone(),
            tags: product.tags.clone(),
            listed_on: short_date(&product.created_at),
        }
    }
}

/// Seller contact details on the detail page.
pub struct SellerView {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<SellerContact> for SellerView {
    fn from(seller: SellerContact) -> Self {
        Self {
            username: seller.username,
            email: seller.email,
            phone: seller.phone,
        }
    }
}

/// Current values for the edit form.
pub struct EditFormView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub condition: String,
    pub tags: String,
    pub images: Vec<String>,
}

impl From<Product> for EditFormView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title,
            description: product.description,
            category: product.category.label().to_string(),
            price: product.price.to_string(),
            condition: product.condition.label().to_string(),
            tags: product.tags.join(", "),
            images: product.images,
        }
    }
}

fn category_labels() -> Vec<String> {
    Category::ALL.iter().map(|c| c.label().to_string()).collect()
}

fn condition_labels() -> Vec<String> {
    Condition::ALL.iter().map(|c| c.label().to_string()).collect()
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub current_category: String,
    pub current_search: String,
    pub current_sort: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct NewListingTemplate {
    pub categories: Vec<String>,
    pub conditions: Vec<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/my_listings.html")]
pub struct MyListingsTemplate {
    pub listings: Vec<ListingRowView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/detail.html")]
pub struct ProductDetailTemplate {
    pub product: ProductDetailView,
    pub seller: SellerView,
    pub is_owner: bool,
    pub is_in_cart: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct EditListingTemplate {
    pub listing: EditFormView,
    pub categories: Vec<String>,
    pub conditions: Vec<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// ============================================================================
// Forms
// ============================================================================

/// Browse filters from the query string.
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl BrowseParams {
    /// Turn the raw query string into a browse query. Blank searches,
    /// unknown categories, and unknown sort tokens fall back to the
    /// unfiltered defaults rather than erroring.
    fn to_query(&self) -> BrowseQuery {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        let category = self
            .category
            .as_deref()
            .filter(|c| *c != "all")
            .and_then(|c| c.parse().ok());
        let sort = self
            .sort
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        BrowseQuery {
            search,
            category,
            sort,
        }
    }
}

/// One rejected listing field with its user-facing message.
#[derive(Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Raw text fields of a listing submission, before validation.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub condition: String,
    pub tags: String,
}

impl ListingForm {
    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<NewListing, Vec<Violation>> {
        let mut violations = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            violations.push(Violation {
                field: "title",
                message: "Title is required",
            });
        }

        let description = self.description.trim();
        if description.is_empty() {
            violations.push(Violation {
                field: "description",
                message: "Description is required",
            });
        }

        let category = match self.category.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                violations.push(Violation {
                    field: "category",
                    message: if self.category.trim().is_empty() {
                        "Category is required"
                    } else {
                        "Please choose a valid category"
                    },
                });
                None
            }
        };

        let price = match Price::parse(&self.price) {
            Ok(price) => Some(price),
            Err(PriceError::Negative) => {
                violations.push(Violation {
                    field: "price",
                    message: "Price cannot be negative",
                });
                None
            }
            Err(PriceError::NotANumber) => {
                violations.push(Violation {
                    field: "price",
                    message: if self.price.trim().is_empty() {
                        "Price is required"
                    } else {
                        "Price must be a number"
                    },
                });
                None
            }
        };

        // An omitted condition falls back to the default rather than failing
        let condition = if self.condition.trim().is_empty() {
            Some(Condition::default())
        } else {
            match self.condition.parse::<Condition>() {
                Ok(condition) => Some(condition),
                Err(_) => {
                    violations.push(Violation {
                        field: "condition",
                        message: "Please choose a valid condition",
                    });
                    None
                }
            }
        };

        match (category, price, condition) {
            (Some(category), Some(price), Some(condition)) if violations.is_empty() => {
                Ok(NewListing {
                    title: title.to_string(),
                    description: description.to_string(),
                    category,
                    price,
                    condition,
                    images: Vec::new(),
                    tags: parse_tags(&self.tags),
                })
            }
            _ => Err(violations),
        }
    }
}

fn violation_notice(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The text fields and image files lifted out of a listing submission.
struct ListingSubmission {
    form: ListingForm,
    files: Vec<UploadedFile>,
}

async fn read_listing_submission(mut multipart: Multipart) -> Result<ListingSubmission, AppError> {
    let mut form = ListingForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send one empty part when no file was chosen
                if filename.is_empty() || bytes.is_empty() {
                    continue;
                }
                files.push(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "title" => form.title = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "category" => form.category = read_text(field).await?,
            "price" => form.price = read_text(field).await?,
            "condition" => form.condition = read_text(field).await?,
            "tags" => form.tags = read_text(field).await?,
            // The edit form's keep_existing_images checkbox is inert:
            // existing images are kept whenever no new files arrive
            _ => {}
        }
    }

    Ok(ListingSubmission { form, files })
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Listing ids arrive as path strings; anything non-numeric is handled the
/// same way as a listing that doesn't exist.
fn parse_id(raw: &str) -> Option<ProductId> {
    raw.parse::<i64>().ok().map(ProductId::new)
}

// ============================================================================
// Route handlers
// ============================================================================

/// Handle GET /products - browse available listings.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<BrowseParams>,
) -> impl IntoResponse {
    let query = params.to_query();

    let (listings, error) = match CatalogService::new(state.pool()).browse(&query).await {
        Ok(listings) => (listings, params.error),
        Err(e) => {
            tracing::error!("Failed to load listings: {e}");
            (Vec::new(), Some("Error loading products".to_string()))
        }
    };

    ProductsIndexTemplate {
        products: listings.iter().map(ProductCardView::from).collect(),
        categories: category_labels(),
        current_category: params.category.unwrap_or_else(|| "all".to_string()),
        current_search: params.search.unwrap_or_default(),
        current_sort: query.sort.to_string(),
        error,
        success: params.success,
    }
}

/// Handle GET /products/new - the create listing form.
pub async fn new_listing_page(
    RequireAuth(_user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    NewListingTemplate {
        categories: category_labels(),
        conditions: condition_labels(),
        error: query.error,
        success: query.success,
    }
}

/// Handle POST /products - create a listing from a multipart submission.
#[instrument(skip(state, user, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let ListingSubmission { form, files } = read_listing_submission(multipart).await?;

    let mut listing = match form.validate() {
        Ok(listing) => listing,
        Err(violations) => {
            return Ok(
                redirect_error("/products/new", &violation_notice(&violations)).into_response(),
            );
        }
    };

    // Files touch the disk only once the form has passed validation
    listing.images = match state.media().accept(&files).await {
        Ok(refs) => refs,
        Err(e) if e.is_client_error() => {
            return Ok(redirect_error("/products/new", &e.to_string()).into_response());
        }
        Err(e) => {
            tracing::error!("Failed to store listing images: {e}");
            return Ok(redirect_error("/products/new", "Error saving images").into_response());
        }
    };
    let image_refs = listing.images.clone();

    match CatalogService::new(state.pool()).create(user.id, listing).await {
        Ok(product) => {
            add_breadcrumb(
                "listing",
                "Created listing",
                Some(&[("product_id", &product.id.to_string())]),
            );
            Ok(
                redirect_success("/products/my/listings", "Product listed successfully!")
                    .into_response(),
            )
        }
        Err(e) => {
            tracing::error!("Failed to create listing: {e}");
            state.media().discard(&image_refs).await;
            Ok(redirect_error("/products/new", "Error creating product listing").into_response())
        }
    }
}

/// Handle GET /products/my/listings - the seller's own listings.
pub async fn my_listings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (listings, error) = match CatalogService::new(state.pool()).my_listings(user.id).await {
        Ok(listings) => (listings, query.error),
        Err(e) => {
            tracing::error!("Failed to load listings for {}: {e}", user.id);
            (Vec::new(), Some("Error loading products".to_string()))
        }
    };

    MyListingsTemplate {
        listings: listings.iter().map(ListingRowView::from).collect(),
        error,
        success: query.success,
    }
}

/// Handle GET /products/{id} - the listing detail page.
///
/// Every render counts as a view, including the seller's own visits.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_error("/products", "Product not found").into_response();
    };

    let detail = match CatalogService::new(state.pool()).detail(id).await {
        Ok(detail) => detail,
        Err(CatalogError::NotFound) => {
            return redirect_error("/products", "Product not found").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load listing {id}: {e}");
            return redirect_error("/products", "Error loading product details").into_response();
        }
    };

    let is_owner = detail.product.seller_id == user.id;
    // Best effort: a failed lookup just renders the add-to-cart button
    let is_in_cart = CartService::new(state.pool())
        .contains(user.id, id)
        .await
        .unwrap_or(false);

    let product = ProductDetailView::from(&detail.product);
    ProductDetailTemplate {
        product,
        seller: SellerView::from(detail.seller),
        is_owner,
        is_in_cart,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle GET /products/{id}/edit - the edit form, owner only.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_error("/products/my/listings", NOT_YOURS_TO_EDIT).into_response();
    };

    let listing = match CatalogService::new(state.pool())
        .listing_for_edit(id, user.id)
        .await
    {
        Ok(listing) => listing,
        Err(CatalogError::NotFound) => {
            return redirect_error("/products/my/listings", NOT_YOURS_TO_EDIT).into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load listing {id} for edit: {e}");
            return redirect_error("/products/my/listings", "Error loading product")
                .into_response();
        }
    };

    EditListingTemplate {
        listing: EditFormView::from(listing),
        categories: category_labels(),
        conditions: condition_labels(),
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle POST /products/{id} - update a listing, owner only.
///
/// A submission without new files keeps the existing images; one with new
/// files replaces them, and the displaced files are deleted afterwards.
#[instrument(skip(state, user, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(redirect_error("/products/my/listings", NOT_YOURS_TO_EDIT).into_response());
    };

    let ListingSubmission { form, files } = read_listing_submission(multipart).await?;
    let edit_path = format!("/products/{id}/edit");

    let listing = match form.validate() {
        Ok(listing) => listing,
        Err(violations) => {
            return Ok(redirect_error(&edit_path, &violation_notice(&violations)).into_response());
        }
    };

    let new_images = if files.is_empty() {
        None
    } else {
        match state.media().accept(&files).await {
            Ok(refs) => Some(refs),
            Err(e) if e.is_client_error() => {
                return Ok(redirect_error(&edit_path, &e.to_string()).into_response());
            }
            Err(e) => {
                tracing::error!("Failed to store listing images: {e}");
                return Ok(redirect_error(&edit_path, "Error saving images").into_response());
            }
        }
    };

    let update = ListingUpdate {
        title: listing.title,
        description: listing.description,
        category: listing.category,
        price: listing.price,
        condition: listing.condition,
        images: new_images.clone(),
        tags: listing.tags,
    };

    match CatalogService::new(state.pool())
        .update(id, user.id, &update)
        .await
    {
        Ok(updated) => {
            state.media().discard(&updated.replaced_images).await;
            Ok(
                redirect_success("/products/my/listings", "Product updated successfully!")
                    .into_response(),
            )
        }
        Err(CatalogError::NotFound) => {
            if let Some(refs) = new_images {
                state.media().discard(&refs).await;
            }
            Ok(redirect_error("/products/my/listings", NOT_YOURS_TO_EDIT).into_response())
        }
        Err(e) => {
            tracing::error!("Failed to update listing {id}: {e}");
            if let Some(refs) = new_images {
                state.media().discard(&refs).await;
            }
            Ok(redirect_error("/products/my/listings", "Error updating product").into_response())
        }
    }
}

/// Handle POST /products/{id}/delete - delete a listing, owner only.
///
/// The listing's image files are removed after the row, so a failed delete
/// never costs the seller their photos.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_error("/products/my/listings", NOT_YOURS_TO_DELETE).into_response();
    };

    match CatalogService::new(state.pool()).delete(id, user.id).await {
        Ok(product) => {
            state.media().discard(&product.images).await;
            redirect_success("/products/my/listings", "Product deleted successfully!")
                .into_response()
        }
        Err(CatalogError::NotFound) => {
            redirect_error("/products/my/listings", NOT_YOURS_TO_DELETE).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete listing {id}: {e}");
            redirect_error("/products/my/listings", "Error deleting product").into_response()
        }
    }
}

/// Handle POST /products/{id}/cart - add a listing to the cart.
#[instrument(skip(state, user))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return redirect_error("/products", "Product not found").into_response();
    };
    let detail_path = format!("/products/{id}");

    match CartService::new(state.pool()).add(user.id, id, 1).await {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Added listing to cart",
                Some(&[("product_id", &id.to_string())]),
            );
            redirect_success(&detail_path, "Product added to cart!").into_response()
        }
        Err(CartError::ProductNotFound) => {
            redirect_error("/products", "Product not found").into_response()
        }
        Err(CartError::OwnListing) => {
            redirect_error(&detail_path, "You cannot add your own product to cart").into_response()
        }
        Err(CartError::AlreadyInCart) => {
            redirect_error(&detail_path, "Product is already in your cart").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add listing {id} to cart: {e}");
            redirect_error("/products", "Error adding product to cart").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ListingForm {
        ListingForm {
            title: "Vintage radio".to_string(),
            description: "Works, minor scratches".to_string(),
            category: "Electronics".to_string(),
            price: "45.50".to_string(),
            condition: "Good".to_string(),
            tags: "retro, audio".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let listing = valid_form().validate().unwrap();
        assert_eq!(listing.title, "Vintage radio");
        assert_eq!(listing.category, Category::Electronics);
        assert_eq!(listing.price, Price::parse("45.50").unwrap());
        assert_eq!(listing.condition, Condition::Good);
        assert_eq!(listing.tags, vec!["retro", "audio"]);
        assert!(listing.images.is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem_at_once() {
        let form = ListingForm {
            title: "  ".to_string(),
            description: String::new(),
            category: "Weapons".to_string(),
            price: "-5".to_string(),
            condition: "Mint".to_string(),
            tags: String::new(),
        };

        let violations = form.validate().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["title", "description", "category", "price", "condition"]
        );
    }

    #[test]
    fn test_validate_trims_text_fields() {
        let form = ListingForm {
            title: "  Lamp  ".to_string(),
            description: " A lamp ".to_string(),
            ..valid_form()
        };
        let listing = form.validate().unwrap();
        assert_eq!(listing.title, "Lamp");
        assert_eq!(listing.description, "A lamp");
    }

    #[test]
    fn test_validate_defaults_missing_condition() {
        let form = ListingForm {
            condition: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap().condition, Condition::Good);
    }

    #[test]
    fn test_validate_price_messages() {
        let form = ListingForm {
            price: String::new(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().first().unwrap().message,
            "Price is required"
        );

        let form = ListingForm {
            price: "cheap".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().first().unwrap().message,
            "Price must be a number"
        );

        let form = ListingForm {
            price: "-1".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().first().unwrap().message,
            "Price cannot be negative"
        );
    }

    #[test]
    fn test_violation_notice_joins_messages() {
        let violations = vec![
            Violation {
                field: "title",
                message: "Title is required",
            },
            Violation {
                field: "price",
                message: "Price is required",
            },
        ];
        assert_eq!(
            violation_notice(&violations),
            "Title is required; Price is required"
        );
    }

    #[test]
    fn test_browse_params_normalization() {
        let params = BrowseParams {
            search: Some("  lamp  ".to_string()),
            category: Some("Furniture".to_string()),
            sort: Some("price_low".to_string()),
            error: None,
            success: None,
        };
        let query = params.to_query();
        assert_eq!(query.search.as_deref(), Some("lamp"));
        assert_eq!(query.category, Some(Category::Furniture));
        assert_eq!(query.sort, trove_core::SortOrder::PriceLow);

        let params = BrowseParams {
            search: Some("   ".to_string()),
            category: Some("all".to_string()),
            sort: Some("cheapest".to_string()),
            error: None,
            success: None,
        };
        let query = params.to_query();
        assert!(query.search.is_none());
        assert!(query.category.is_none());
        assert_eq!(query.sort, trove_core::SortOrder::Newest);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert_eq!(parse_id("42"), Some(ProductId::new(42)));
        assert!(parse_id("forty-two").is_none());
        assert!(parse_id("").is_none());
    }
}
