//! Product route handlers.
//!
//! Every handler sleeps for the configured simulated latency before touching
//! the repository.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::instrument;
use vitrine_core::{
    ApiResponse, CreateProductData, Product, ProductCategory, ProductId, ProductQuery,
    ProductQueryParams, ProductsResponse, UpdateProductData,
};

use crate::error::AppError;
use crate::latency::simulate_latency;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// List products matching the query string.
#[instrument(skip(state, params))]
pub async fn index(
    State(state): State<AppState>,
    params: Result<Query<ProductQueryParams>, QueryRejection>,
) -> ApiResult<ProductsResponse> {
    simulate_latency(state.config().latency).await;

    let Query(params) = params?;
    let config = state.config();
    let query = ProductQuery::from_params(&params, config.default_page_size, config.max_page_size)?;

    let response = state.products().list(&query).await;
    tracing::debug!(
        total = response.meta.total_items,
        page = response.meta.current_page,
        "Listed products"
    );
    Ok(Json(ApiResponse::ok(response)))
}

/// List every category name.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<&'static str>> {
    simulate_latency(state.config().latency.third()).await;

    let names = ProductCategory::ALL.iter().map(|c| c.name()).collect();
    Ok(Json(ApiResponse::ok(names)))
}

/// Get a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    simulate_latency(state.config().latency).await;

    let product = state.products().get(&ProductId::new(id)).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// Create a product.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductData>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    simulate_latency(state.config().latency).await;

    let Json(data) = payload?;
    let new_product = data.validate()?;
    let product = state.products().create(new_product).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            product,
            "Product created successfully",
        )),
    ))
}

/// Apply a partial update.
///
/// A missing product is reported before the payload is validated.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductData>, JsonRejection>,
) -> ApiResult<Product> {
    simulate_latency(state.config().latency).await;

    let id = ProductId::new(id);
    state.products().get(&id).await?;

    let Json(data) = payload?;
    let patch = data.validate()?;
    let product = state.products().update(&id, patch).await?;

    Ok(Json(ApiResponse::with_message(
        product,
        "Product updated successfully",
    )))
}

/// Delete a product, returning it.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    simulate_latency(state.config().latency).await;

    let product = state.products().delete(&ProductId::new(id)).await?;
    Ok(Json(ApiResponse::with_message(
        product,
        "Product deleted successfully",
    )))
}
