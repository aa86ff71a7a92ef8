use crate::api;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::search::search_book_api,
        api::search::search_author_api,
    ),
    tags(
        (name = "library-catalog", description = "Library catalog JSON endpoints")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
