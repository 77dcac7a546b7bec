use std::sync::Arc;

use anyhow::{Context, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AuthRequest, AuthResponse, User};
use crate::storage::UserStore;

/// JWT claims carried by the bearer tokens handed out at signup/login.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signup/login/token-validation for the dashboard. Failures are encoded
/// in the AuthResponse body (`success: false`), not as HTTP errors; the
/// crawl endpoints do not currently enforce the issued tokens.
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(user_store: Arc<dyn UserStore>, secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            user_store,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    pub async fn signup(&self, request: &AuthRequest) -> Result<AuthResponse> {
        let username = match request.username.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => return Ok(AuthResponse::failure("Username is required")),
        };
        let email = match request.email.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => return Ok(AuthResponse::failure("Email is required")),
        };
        let password = match request.password.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Ok(AuthResponse::failure("Password is required")),
        };
        if password.len() < 6 {
            return Ok(AuthResponse::failure(
                "Password must be at least 6 characters",
            ));
        }

        if self.user_store.find_by_username(&username).await?.is_some() {
            return Ok(AuthResponse::failure("Username already exists"));
        }
        if self.user_store.find_by_email(&email).await?.is_some() {
            return Ok(AuthResponse::failure("Email already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.clone(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        self.user_store.create(user).await?;

        let token = self.issue_token(&username)?;
        tracing::info!("User '{}' signed up", username);
        Ok(AuthResponse::granted(token, username, "Signup successful"))
    }

    pub async fn login(&self, request: &AuthRequest) -> Result<AuthResponse> {
        let username = match request.username.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => return Ok(AuthResponse::failure("Username is required")),
        };
        let password = match request.password.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(AuthResponse::failure("Password is required")),
        };

        let user = self.user_store.find_by_username(&username).await?;
        let valid = match user {
            Some(ref u) => verify_password(password, &u.password_hash),
            None => false,
        };
        if !valid {
            return Ok(AuthResponse::failure("Invalid username or password"));
        }

        let token = self.issue_token(&username)?;
        tracing::info!("User '{}' logged in", username);
        Ok(AuthResponse::granted(token, username, "Login successful"))
    }

    /// Signature + expiry check; any parse failure is simply "invalid".
    pub fn validate_token(&self, token: &str) -> bool {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).is_ok()
    }

    fn issue_token(&self, username: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
