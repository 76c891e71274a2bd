use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Multipart body of `POST /vehicles`.
#[derive(ToSchema)]
pub struct VehicleFormDoc {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub description: Option<String>,
    /// Zero or more file parts, each named `images`.
    pub images: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct CreatedListingDoc {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
}

#[derive(ToSchema)]
pub struct ListingViewDoc {
    pub id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::system::root,
        crate::routes::system::health,
        crate::routes::system::diagnostics,
        crate::routes::vehicles::list,
        crate::routes::vehicles::create,
    ),
    components(
        schemas(
            HealthResponse,
            VehicleFormDoc,
            CreatedListingDoc,
            ListingViewDoc,
        )
    ),
    tags(
        (name = "system"),
        (name = "vehicles")
    )
)]
pub struct ApiDoc;
