use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateQuantityRequest, UpdateUnitTypeRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route("/{id}/quantity", patch(update_quantity))
        .route("/{id}/unit-type", patch(update_unit_type))
        .route("/{id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "List cart lines and the recomputed total", body = ApiResponse<CartList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add a product; an existing line with the same unit type has its quantity incremented", body = ApiResponse<CartItem>),
        (status = 400, description = "Bad request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{id}/quantity",
    params(
        ("id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Set the line quantity", body = ApiResponse<CartItem>),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Cart line not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_quantity(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{id}/unit-type",
    params(
        ("id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = UpdateUnitTypeRequest,
    responses(
        (status = 200, description = "Switch the line's unit type and re-resolve its price", body = ApiResponse<CartItem>),
        (status = 400, description = "Unit type not applicable"),
        (status = 404, description = "Cart line not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_unit_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitTypeRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_unit_type(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "OK; removing an already-removed line is still OK", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state, &user, id).await?;
    Ok(Json(resp))
}
