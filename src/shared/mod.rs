pub mod constants;
pub mod export;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod validation;
