mod category;

pub use category::{Category, CategoryChanges, CategoryLink, NewCategory};
