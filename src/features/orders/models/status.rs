//! Order status state machine.
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered -> refunded
//!    |           |            |            |
//!    +-----------+------------+------------+--> cancelled -> refunded
//! ```
//!
//! `cancelled` is closed to every fulfilment state, but it keeps one exit:
//! `cancelled -> refunded`, so a paid order that was cancelled can still be
//! refunded. A rule of the form "nothing leaves cancelled" therefore does not
//! hold for the refund edge; `delivered` behaves the same way.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Order status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Statuses this one may move to
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Processing, Cancelled],
            Processing => &[Shipped, Cancelled],
            Shipped => &[Delivered, Cancelled],
            Delivered => &[Refunded],
            Cancelled => &[Refunded],
            Refunded => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Fulfilment has ended. Not the same as "no exits": `delivered` and
    /// `cancelled` are terminal yet still allow `refunded`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }

    pub fn check_transition(self, next: OrderStatus) -> Result<(), TransitionError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Validation(err.to_string())
    }
}
