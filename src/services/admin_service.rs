use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{OrderStatus, PaymentStatus, UnitType},
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::admin::{UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let data = OrderWithItems {
        order: order_from_entity(order)?,
        items,
    };
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Staff override: any target status is accepted, unlike the customer
/// cancellation path. Every change lands in the audit log.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Payment is its own axis; the cart and checkout paths never touch it.
pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.payment_status = Set(payload.payment_status.as_str().to_string());
    active.paid_at = Set(match payload.payment_status {
        PaymentStatus::Paid => Some(Utc::now().into()),
        PaymentStatus::Pending => None,
    });
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_payment_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "payment_status": order.payment_status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment status updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = OrderStatus::parse(&model.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown order status {}", model.status))
    })?;
    let payment_status = PaymentStatus::parse(&model.payment_status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "unknown payment status {}",
            model.payment_status
        ))
    })?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        total_amount: model.total_amount,
        status,
        payment_status,
        invoice_number: model.invoice_number,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn order_item_from_entity(model: OrderItemModel) -> AppResult<OrderItem> {
    let unit_type = model
        .unit_type
        .as_deref()
        .map(|s| {
            UnitType::parse(s)
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown unit type {s}")))
        })
        .transpose()?;
    Ok(OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        name: model.name,
        image: model.image,
        unit_type,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
