mod order_repository;
#[cfg(test)]
pub mod in_memory;

pub use order_repository::{OrderRepository, PgOrderRepository};

#[cfg(test)]
pub use order_repository::MockOrderRepository;
