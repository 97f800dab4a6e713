use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::access::Role;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;

use crate::shared::config::AuthConfig;

const DEFAULT_ACCESS_TOKEN_HOURS: i64 = 24;

struct JwtSettings {
    secret: String,
    access_token_hours: i64,
}

static SETTINGS: OnceCell<JwtSettings> = OnceCell::new();

/// Fix the signing secret and token lifetime for the rest of the process.
///
/// Without a configured secret a random one is generated, so tokens do not
/// survive a restart. Later calls are ignored.
pub fn configure(auth: &AuthConfig) {
    let configured = auth
        .jwt_secret
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .cloned();
    if configured.is_none() {
        tracing::warn!("auth.jwt_secret is not set, using a generated secret");
    }
    let _ = SETTINGS.set(JwtSettings {
        secret: configured.unwrap_or_else(generate_jwt_secret),
        access_token_hours: auth.access_token_hours,
    });
}

fn settings() -> &'static JwtSettings {
    SETTINGS.get_or_init(|| JwtSettings {
        secret: generate_jwt_secret(),
        access_token_hours: DEFAULT_ACCESS_TOKEN_HOURS,
    })
}

/// Generate JWT access token
pub fn generate_access_token(user_id: &str, username: &str, role: Role) -> Result<String> {
    let settings = settings();
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(settings.access_token_hours)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// Validate JWT token and extract claims
pub fn validate_token(token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(settings().secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    general_purpose::STANDARD.encode(random_bytes)
}
