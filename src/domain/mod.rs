//! Storefront domain core: pricing rules, the cart aggregate and the order
//! status machine. Everything in here is pure and synchronous; the service
//! layer owns all I/O.

use thiserror::Error;

pub mod cart;
pub mod lifecycle;
pub mod pricing;

pub use cart::{Cart, CartLine, ProductSnapshot, line_id};
pub use lifecycle::{OrderStatus, PaymentStatus};
pub use pricing::{Category, Pricing, UnitType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("product is sold per piece and per packet, a unit type must be chosen")]
    UnitChoiceRequired,

    #[error("unit type does not apply to this item")]
    UnitTypeNotApplicable,

    #[error("cart line not found")]
    LineNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("cannot cancel, order is {0}")]
    CannotCancel(OrderStatus),
}
