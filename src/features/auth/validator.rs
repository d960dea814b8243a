use super::model::AuthenticatedAdmin;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Validates HS256 admin tokens issued for the back office
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

/// Claims carried by an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = config.jwt_leeway.as_secs();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedAdmin, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let claims = decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        let admin = AuthenticatedAdmin {
            sub: claims.sub,
            roles: claims.roles,
        };

        if !admin.has_admin_access() {
            return Err(AppError::Forbidden(
                "Token does not grant back-office access".to_string(),
            ));
        }

        Ok(admin)
    }
}
