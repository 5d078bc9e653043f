use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Cart, CartLine, Category, DomainError, OrderStatus, PaymentStatus, UnitType},
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems, Model as CartModel},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
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
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Converts the caller's cart into an immutable order. Every write happens in
/// one transaction, so a failure anywhere leaves both the cart and the orders
/// table exactly as they were.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let lines = rows
        .iter()
        .map(line_from_entity)
        .collect::<AppResult<Vec<_>>>()?;
    let cart = Cart::from_lines(user.user_id, lines);
    if cart.is_empty() {
        return Err(DomainError::EmptyCart.into());
    }

    let total_amount = cart.total();
    let order_id = Uuid::new_v4();
    let invoice_number = build_invoice_number(order_id);

    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Processing.as_str().to_string()),
        payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
        invoice_number: Set(invoice_number),
        paid_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // Snapshot the cart lines as-is; the catalog is not consulted here, so
    // later product edits never reach this order.
    let mut order_items: Vec<OrderItem> = Vec::with_capacity(cart.len());
    for line in cart.lines() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            name: Set(line.name.clone()),
            image: Set(line.image.clone()),
            unit_type: Set(line.unit_type.map(|u| u.as_str().to_string())),
            quantity: Set(line.quantity),
            price: Set(line.unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        order_items.push(order_item_from_entity(item)?);
    }

    // Drain the cart inside the same transaction.
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(cart.owner()))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_amount": total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: order_from_entity(order)?,
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

/// Customer cancellation, allowed only while the order is still processing.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let status = OrderStatus::parse(&order.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("unknown order status {}", order.status))
    })?;
    let next = status.user_cancel()?;

    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_cancelled",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order cancelled",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
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

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
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

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("INV-{}-{}", date, short)
}
