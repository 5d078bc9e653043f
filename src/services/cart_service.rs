use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Cart, CartLine, Category, DomainError, UnitType},
    dto::cart::{AddToCartRequest, CartList, UpdateQuantityRequest, UpdateUnitTypeRequest},
    entity::{
        cart_items::{
            ActiveModel as CartActive, Column as CartCol, Entity as CartItems, Model as CartModel,
        },
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let lines = rows
        .iter()
        .map(line_from_entity)
        .collect::<AppResult<Vec<_>>>()?;
    let cart = Cart::from_lines(user.user_id, lines);
    let total_amount = cart.total();

    let items = rows
        .into_iter()
        .map(cart_item_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            total_amount,
        },
        Some(Meta::empty()),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;
    let product = product_from_entity(product)?;

    let mut cart = load_cart(state, user.user_id).await?;
    let line = cart
        .add(&product.snapshot(), payload.quantity, payload.unit_type)?
        .clone();

    let active = CartActive {
        id: Set(line.id),
        user_id: Set(user.user_id),
        product_id: Set(line.product_id),
        name: Set(line.name.clone()),
        image: Set(line.image.clone()),
        category: Set(line.category.as_str().to_string()),
        unit_type: Set(line.unit_type.map(|u| u.as_str().to_string())),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        created_at: NotSet,
    };
    let saved = CartItems::insert(active)
        .on_conflict(
            OnConflict::column(CartCol::Id)
                .update_columns([CartCol::Quantity, CartCol::UnitPrice])
                .to_owned(),
        )
        .exec_with_returning(&state.orm)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "quantity": payload.quantity,
            "unit_type": line.unit_type,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item_from_entity(saved)?, None))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let mut cart = load_cart(state, user.user_id).await?;
    let line = cart.update_quantity(id, payload.quantity)?.clone();

    let row = CartItems::find_by_id(id)
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: CartActive = row.into();
    active.quantity = Set(line.quantity);
    let saved = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update_quantity",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item_from_entity(saved)?, None))
}

pub async fn update_unit_type(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUnitTypeRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let mut cart = load_cart(state, user.user_id).await?;
    let product_id = cart
        .line(id)
        .ok_or(DomainError::LineNotFound)?
        .product_id;
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let product = product_from_entity(product)?;

    let line = cart
        .update_unit_type(id, payload.unit_type, &product.pricing())?
        .clone();

    let row = CartItems::find_by_id(id)
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: CartActive = row.into();
    active.unit_type = Set(line.unit_type.map(|u| u.as_str().to_string()));
    active.unit_price = Set(line.unit_price);
    let saved = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update_unit_type",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": id, "unit_type": line.unit_type })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item_from_entity(saved)?, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(CartCol::Id.eq(id))
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    // Removing an id that is already gone is still success; delete is idempotent.
    if result.rows_affected > 0 {
        if let Err(err) = log_audit(
            &state.pool,
            Some(user.user_id),
            "cart_remove",
            Some("cart_items"),
            Some(serde_json::json!({ "cart_item_id": id })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn load_cart(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user_id))
        .order_by_asc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let lines = rows
        .iter()
        .map(line_from_entity)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Cart::from_lines(user_id, lines))
}

fn line_from_entity(model: &CartModel) -> AppResult<CartLine> {
    let category = Category::parse(&model.category).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "unknown category {} on cart line",
            model.category
        ))
    })?;
    let unit_type = model
        .unit_type
        .as_deref()
        .map(|s| {
            UnitType::parse(s)
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown unit type {s}")))
        })
        .transpose()?;
    Ok(CartLine {
        id: model.id,
        product_id: model.product_id,
        name: model.name.clone(),
        image: model.image.clone(),
        category,
        unit_type,
        quantity: model.quantity,
        unit_price: model.unit_price,
    })
}

fn cart_item_from_entity(model: CartModel) -> AppResult<CartItem> {
    let line = line_from_entity(&model)?;
    Ok(CartItem {
        id: line.id,
        user_id: model.user_id,
        product_id: line.product_id,
        name: line.name,
        image: line.image,
        category: line.category,
        unit_type: line.unit_type,
        quantity: line.quantity,
        unit_price: line.unit_price,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn product_from_entity(model: ProductModel) -> AppResult<Product> {
    let category = Category::parse(&model.category).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown category {}", model.category))
    })?;
    let images = serde_json::from_value(model.images).unwrap_or_default();
    Ok(Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category,
        price: model.price,
        market_price: model.market_price,
        price_to_sell: model.price_to_sell,
        price_per_piece: model.price_per_piece,
        price_per_packet: model.price_per_packet,
        images,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
