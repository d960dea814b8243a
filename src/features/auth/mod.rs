//! Admin authentication: bearer token validation and role guards.

mod validator;

pub mod guards;
pub mod model;

pub use validator::JwtValidator;

#[cfg(test)]
pub(crate) use validator::tests as token_fixtures;
