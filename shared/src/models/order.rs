//! Order Model
//!
//! The order entity, its embedded line snapshot, and the status state
//! machine. Lines are a denormalized copy of the menu item taken at
//! creation time; later catalog edits never touch them.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Order status
///
/// Normal progression is `pending → confirmed → preparing → ready →
/// delivery → delivered`; `cancelled` is an alternate terminal reachable
/// from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status token, rejecting anything outside the seven
    /// valid values
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivery" => Ok(Self::Delivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::with_message(
                ErrorCode::InvalidOrderStatus,
                format!("'{}' is not a valid status", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivery => "delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Position in the forward progression; `cancelled` sits outside it
    fn progression_index(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::Ready => Some(3),
            Self::Delivery => Some(4),
            Self::Delivered => Some(5),
            Self::Cancelled => None,
        }
    }

    /// Terminal states lock the order; no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether a transition from `self` to `next` is permitted.
    ///
    /// Forward moves may skip intermediate states (an operator can take
    /// a pending order straight to `preparing`), cancellation is open to
    /// every non-terminal order, and backward moves are rejected.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        match (self.progression_index(), next.progression_index()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }

    /// Counts toward the live queue shown on the dashboard
    pub fn is_pending_workload(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Preparing)
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// Payment method (cash-on-delivery is the only processed method;
/// `online` exists in the type model only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
}

/// One denormalized line within an order
///
/// Name and price are snapshotted from the catalog at creation time;
/// `menu_item` is a reference kept for read-time display joins only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub menu_item: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    /// Current catalog image, attached at read time for display.
    /// Never persisted with the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// User details joined onto an order for display (read projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUser {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user id (the joined [`OrderUser`] projection is attached
    /// by read paths, not stored)
    pub user: String,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,

    /// Read-time projection of the owning user, absent in storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<OrderUser>,
}

impl Order {
    /// Sum of line totals; must always equal `total_amount`
    pub fn computed_total(&self) -> f64 {
        self.items.iter().map(OrderLine::line_total).sum()
    }
}

/// One requested line in an order-creation payload.
///
/// Only the reference and quantity are taken from the client; name and
/// price are re-fetched from the catalog server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub menu_item_id: String,
    pub quantity: u32,
}

/// Order-creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderLineInput>,
    /// Client's idea of the total; when present it must match the
    /// server-computed total
    pub total_amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub room_number: Option<String>,
    pub special_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_allowed_with_skips() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Preparing)); // skip ahead
        assert!(Pending.can_transition_to(Delivered));
        assert!(Confirmed.can_transition_to(Ready));
        assert!(Delivery.can_transition_to(Delivered));
    }

    #[test]
    fn backward_transitions_rejected() {
        use OrderStatus::*;
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Preparing.can_transition_to(Confirmed));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Preparing.can_transition_to(Preparing)); // no self-loop
    }

    #[test]
    fn cancel_allowed_from_any_non_terminal() {
        use OrderStatus::*;
        for s in [Pending, Confirmed, Preparing, Ready, Delivery] {
            assert!(s.can_transition_to(Cancelled), "{:?}", s);
        }
    }

    #[test]
    fn terminal_states_are_locked() {
        use OrderStatus::*;
        for next in [Pending, Confirmed, Preparing, Ready, Delivery, Delivered, Cancelled] {
            assert!(!Delivered.can_transition_to(next), "delivered -> {:?}", next);
            assert!(!Cancelled.can_transition_to(next), "cancelled -> {:?}", next);
        }
    }

    #[test]
    fn status_parse_matches_wire_tokens() {
        assert_eq!(OrderStatus::parse("delivery").unwrap(), OrderStatus::Delivery);
        assert_eq!(
            OrderStatus::parse("bogus").unwrap_err().code,
            ErrorCode::InvalidOrderStatus
        );
        // serde and parse agree
        for s in [
            "pending",
            "confirmed",
            "preparing",
            "ready",
            "delivery",
            "delivered",
            "cancelled",
        ] {
            let parsed = OrderStatus::parse(s).unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), s);
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn computed_total_sums_lines() {
        let order = Order {
            id: None,
            user: "user:u1".into(),
            items: vec![
                OrderLine {
                    menu_item: "menu_item:a".into(),
                    name: "Samosa".into(),
                    price: 10.0,
                    quantity: 3,
                    image: None,
                },
                OrderLine {
                    menu_item: "menu_item:b".into(),
                    name: "Tea".into(),
                    price: 5.0,
                    quantity: 2,
                    image: None,
                },
            ],
            total_amount: 40.0,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Cash,
            room_number: Some("B-204".into()),
            special_instructions: None,
            created_at: 0,
            updated_at: 0,
            user_info: None,
        };
        assert_eq!(order.computed_total(), 40.0);
    }
}
