//! Order status machine. Customers may only cancel while an order is still
//! processing; staff may set any status, which the service layer audit-logs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    ReadyForPickup,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(OrderStatus::Processing),
            "ready_for_pickup" => Some(OrderStatus::ReadyForPickup),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Customer-initiated cancellation. Allowed only from `Processing`; any
    /// other state fails naming the blocking status and changes nothing.
    pub fn user_cancel(self) -> Result<OrderStatus, DomainError> {
        match self {
            OrderStatus::Processing => Ok(OrderStatus::Cancelled),
            blocked => Err(DomainError::CannotCancel(blocked)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::ReadyForPickup => "Ready for Pickup",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Payment is a separate axis from fulfillment; only staff or a payment
/// confirmation ever move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_allowed_only_while_processing() {
        assert_eq!(
            OrderStatus::Processing.user_cancel(),
            Ok(OrderStatus::Cancelled)
        );
        for blocked in [
            OrderStatus::ReadyForPickup,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(
                blocked.user_cancel(),
                Err(DomainError::CannotCancel(blocked))
            );
        }
    }

    #[test]
    fn cancel_error_names_the_blocking_status() {
        let err = OrderStatus::Delivered.user_cancel().unwrap_err();
        assert_eq!(err.to_string(), "cannot cancel, order is Delivered");
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::ReadyForPickup.is_terminal());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::ReadyForPickup,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }
}
