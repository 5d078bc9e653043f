use axum_bookshop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    domain::{OrderStatus, PaymentStatus, UnitType},
    dto::cart::{AddToCartRequest, UpdateQuantityRequest},
    entity::{products::ActiveModel as ProductActive, users::ActiveModel as UserActive},
    middleware::auth::AuthUser,
    routes::admin::{UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
    services::{admin_service, cart_service, order_service},
    state::AppState,
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Statement};
use uuid::Uuid;

// Integration flow: user builds a cart with category-dependent prices ->
// checkout -> cancel; admin moves a second order through its lifecycle.
#[tokio::test]
async fn cart_checkout_cancel_and_admin_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    // Seed users
    let user_id = create_user(&state, "user", "user@example.com").await?;
    let admin_id = create_user(&state, "admin", "admin@example.com").await?;

    // A book priced by the selling-price chain and a stationery item priced
    // both per piece and per packet.
    let book = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("A Wizard of Earthsea".into()),
        description: Set(Some("Paperback".into())),
        category: Set("book".into()),
        price: Set(700),
        market_price: Set(Some(600)),
        price_to_sell: Set(Some(450)),
        price_per_piece: Set(None),
        price_per_packet: Set(None),
        images: Set(serde_json::json!(["earthsea.jpg"])),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let pen = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Ballpoint Pen (Blue)".into()),
        description: Set(None),
        category: Set("stationery".into()),
        price: Set(20),
        market_price: Set(None),
        price_to_sell: Set(None),
        price_per_piece: Set(Some(15)),
        price_per_packet: Set(Some(120)),
        images: Set(serde_json::json!([])),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // Book line: unit type is ignored, selling price wins.
    let book_line = cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: book.id,
            quantity: 1,
            unit_type: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(book_line.unit_price, 450);
    assert_eq!(book_line.unit_type, None);

    // Both unit prices exist, so adding without a choice is rejected.
    let missing_choice = cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: pen.id,
            quantity: 1,
            unit_type: None,
        },
    )
    .await;
    assert!(missing_choice.is_err());

    // Packet line, added twice: quantities merge onto one line.
    let pen_line = cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: pen.id,
            quantity: 1,
            unit_type: Some(UnitType::Packet),
        },
    )
    .await?
    .data
    .unwrap();
    let merged = cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: pen.id,
            quantity: 2,
            unit_type: Some(UnitType::Packet),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(merged.id, pen_line.id);
    assert_eq!(merged.quantity, 3);
    assert_eq!(merged.unit_price, 120);

    // Quantity floor: zero is rejected and the line is unchanged.
    let floor = cart_service::update_quantity(
        &state,
        &auth_user,
        pen_line.id,
        UpdateQuantityRequest { quantity: 0 },
    )
    .await;
    assert!(floor.is_err());

    let cart = cart_service::list_cart(&state, &auth_user).await?.data.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total_amount, 810);

    // Checkout: order total equals the cart total, cart is drained.
    let checkout = order_service::checkout(&state, &auth_user).await?.data.unwrap();
    assert_eq!(checkout.order.total_amount, 810);
    assert_eq!(checkout.order.status, OrderStatus::Processing);
    assert_eq!(checkout.order.payment_status, PaymentStatus::Pending);
    assert_eq!(checkout.items.len(), 2);

    let drained = cart_service::list_cart(&state, &auth_user).await?.data.unwrap();
    assert!(drained.items.is_empty());
    assert_eq!(drained.total_amount, 0);

    // An empty cart cannot be checked out, and no order appears.
    assert!(order_service::checkout(&state, &auth_user).await.is_err());

    // Cancel while processing succeeds; a second cancel hits the guard and
    // leaves the status untouched.
    let cancelled = order_service::cancel_order(&state, &auth_user, checkout.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    assert!(
        order_service::cancel_order(&state, &auth_user, checkout.order.id)
            .await
            .is_err()
    );
    let unchanged = order_service::get_order(&state, &auth_user, checkout.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(unchanged.order.status, OrderStatus::Cancelled);

    // Second order for the admin-side lifecycle.
    cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: pen.id,
            quantity: 2,
            unit_type: Some(UnitType::Piece),
        },
    )
    .await?;
    let second = order_service::checkout(&state, &auth_user).await?.data.unwrap();
    assert_eq!(second.order.total_amount, 30);

    // Staff may move the order forward; after that the customer can no
    // longer cancel it.
    let ready = admin_service::update_order_status(
        &state,
        &auth_admin,
        second.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::ReadyForPickup,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(ready.status, OrderStatus::ReadyForPickup);

    assert!(
        order_service::cancel_order(&state, &auth_user, second.order.id)
            .await
            .is_err()
    );

    // Payment is a separate axis, flipped only from the admin side.
    let paid = admin_service::update_payment_status(
        &state,
        &auth_admin,
        second.order.id,
        UpdatePaymentStatusRequest {
            payment_status: PaymentStatus::Paid,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert!(paid.paid_at.is_some());
    assert_eq!(paid.status, OrderStatus::ReadyForPickup);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, audit_logs, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
