mod category_repository;
#[cfg(test)]
pub mod in_memory;

pub use category_repository::{CategoryRepository, MoveOutcome, PgCategoryRepository};

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
