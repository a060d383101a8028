//! Validation of access tokens issued by the identity provider (Supabase
//! Auth).
//!
//! Tokens are HS256-signed with the project's JWT secret and carry the user
//! id in `sub` and the audience `authenticated`. This server never issues
//! tokens.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mediaforge_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Audience claim Supabase puts on signed-in user tokens.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Claims read from an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var        | Required | Default         |
    /// |----------------|----------|-----------------|
    /// | `JWT_SECRET`   | **yes**  | --              |
    /// | `JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
