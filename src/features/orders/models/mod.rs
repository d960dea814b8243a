mod order;
mod status;

pub use order::{Order, OrderFilter, OrderItem, PaymentStatus, StatusChange};
pub use status::{OrderStatus, TransitionError};
