//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    constants::roles,
    db::Store,
    error::{AppError, AppResult},
    models::{Admin, NewAdmin},
    utils::normalize_email,
};

/// JWT claims. The admin id is the only application claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin_id
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new administrator
    pub async fn register(
        store: &dyn Store,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Admin> {
        let email = normalize_email(email);

        if store.find_admin_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let password_hash = Self::hash_password(password)?;

        let admin = store
            .create_admin(NewAdmin {
                email,
                password_hash,
                name: name.trim().to_string(),
                role: roles::ADMIN.to_string(),
            })
            .await?;

        tracing::info!(admin_id = %admin.id, "Administrator registered");
        Ok(admin)
    }

    /// Check credentials and issue a bearer token
    pub async fn login(
        store: &dyn Store,
        jwt: &JwtConfig,
        email: &str,
        password: &str,
    ) -> AppResult<(Admin, String, i64)> {
        let admin = store
            .find_admin_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &admin.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let (token, expires_in) = Self::generate_access_token(&admin.id, jwt)?;

        Ok((admin, token, expires_in))
    }

    /// Verify a bearer token and resolve the admin it names
    pub async fn authenticate(store: &dyn Store, secret: &str, token: &str) -> AppResult<Admin> {
        let claims = Self::verify_token(token, secret)?;
        let admin_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        store
            .find_admin_by_id(&admin_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate an access token; returns the token and its lifetime in seconds
    pub fn generate_access_token(admin_id: &Uuid, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let lifetime = Duration::days(jwt.expiry_days);

        let claims = Claims {
            sub: admin_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, lifetime.num_seconds()))
    }
}
