use axum_bookshop_api::domain::{
    Cart, Category, DomainError, OrderStatus, Pricing, ProductSnapshot, UnitType, line_id,
};
use uuid::Uuid;

fn book_product() -> ProductSnapshot {
    ProductSnapshot {
        product_id: Uuid::new_v4(),
        name: "A Wizard of Earthsea".into(),
        image: Some("earthsea.jpg".into()),
        category: Category::Book,
        pricing: Pricing::Book {
            price_to_sell: Some(450),
            market_price: Some(600),
            price: 700,
        },
    }
}

fn pen_product() -> ProductSnapshot {
    ProductSnapshot {
        product_id: Uuid::new_v4(),
        name: "Ballpoint Pen (Blue)".into(),
        image: None,
        category: Category::Stationery,
        pricing: Pricing::Unit {
            per_piece: Some(15),
            per_packet: Some(120),
            price: 20,
        },
    }
}

// The storefront example: one book at its selling price plus three packets
// of pens. Line prices, cart total and the assembled order total must agree.
#[test]
fn storefront_example_prices_and_total() {
    let mut cart = Cart::new(Uuid::new_v4());

    let book_line = cart.add(&book_product(), 1, None).unwrap().clone();
    assert_eq!(book_line.unit_price, 450);

    let pen_line = cart
        .add(&pen_product(), 3, Some(UnitType::Packet))
        .unwrap()
        .clone();
    assert_eq!(pen_line.unit_price, 120);

    assert_eq!(cart.total(), 810);

    // Checkout snapshots (price, quantity) per line; the order total is the
    // sum over those copies and must equal the cart total exactly.
    let order_total: i64 = cart
        .lines()
        .iter()
        .map(|line| line.unit_price * i64::from(line.quantity))
        .sum();
    assert_eq!(order_total, cart.total());

    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total(), 0);
}

#[test]
fn derived_line_identity_is_deterministic() {
    let owner = Uuid::new_v4();
    let product = Uuid::new_v4();

    assert_eq!(
        line_id(owner, product, Some(UnitType::Piece)),
        line_id(owner, product, Some(UnitType::Piece))
    );
    assert_ne!(
        line_id(owner, product, Some(UnitType::Piece)),
        line_id(owner, product, Some(UnitType::Packet))
    );
    assert_ne!(
        line_id(owner, product, None),
        line_id(owner, product, Some(UnitType::Piece))
    );
    // Different owners never share line ids even for the same product.
    assert_ne!(
        line_id(Uuid::new_v4(), product, None),
        line_id(owner, product, None)
    );
}

#[test]
fn quantity_floor_holds_for_any_low_value() {
    let mut cart = Cart::new(Uuid::new_v4());
    let id = cart.add(&pen_product(), 4, Some(UnitType::Piece)).unwrap().id;

    for quantity in [0, -1, -42, i32::MIN] {
        assert_eq!(
            cart.update_quantity(id, quantity),
            Err(DomainError::InvalidQuantity(quantity))
        );
        assert_eq!(cart.line(id).map(|l| l.quantity), Some(4));
    }

    cart.update_quantity(id, 1).unwrap();
    assert_eq!(cart.line(id).map(|l| l.quantity), Some(1));
}

#[test]
fn adding_without_unit_choice_is_rejected_when_both_prices_exist() {
    let mut cart = Cart::new(Uuid::new_v4());
    assert_eq!(
        cart.add(&pen_product(), 1, None).unwrap_err(),
        DomainError::UnitChoiceRequired
    );
    assert!(cart.is_empty());
}

#[test]
fn cancellation_guard_over_the_full_lifecycle() {
    // First cancel succeeds, the second finds a cancelled order and fails.
    let cancelled = OrderStatus::Processing.user_cancel().unwrap();
    assert_eq!(cancelled, OrderStatus::Cancelled);
    assert_eq!(
        cancelled.user_cancel(),
        Err(DomainError::CannotCancel(OrderStatus::Cancelled))
    );

    // Staff moving the order forward blocks customer cancellation too.
    assert_eq!(
        OrderStatus::ReadyForPickup.user_cancel(),
        Err(DomainError::CannotCancel(OrderStatus::ReadyForPickup))
    );
    assert_eq!(
        OrderStatus::Delivered.user_cancel(),
        Err(DomainError::CannotCancel(OrderStatus::Delivered))
    );
}

#[test]
fn unit_type_switch_keeps_quantity_and_total_consistent() {
    let mut cart = Cart::new(Uuid::new_v4());
    let pen = pen_product();
    let id = cart.add(&pen, 5, Some(UnitType::Piece)).unwrap().id;
    assert_eq!(cart.total(), 75);

    cart.update_unit_type(id, UnitType::Packet, &pen.pricing)
        .unwrap();
    assert_eq!(cart.total(), 600);

    // Back again; the snapshot follows the latest resolution.
    cart.update_unit_type(id, UnitType::Piece, &pen.pricing)
        .unwrap();
    assert_eq!(cart.total(), 75);
}
