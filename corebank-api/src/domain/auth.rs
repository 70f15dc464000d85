use crate::domain::error::BankError;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Claims carried in the `jwt` session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified.
    pub sub: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, BankError> {
        self.sub
            .parse()
            .map_err(|_| BankError::auth("Token does not contain a user id"))
    }
}

/// Issues and verifies the HS256 session tokens set as the `jwt` cookie.
#[derive(Debug, Clone)]
pub struct TokenManager {
    secret: String,
    ttl_hours: i64,
}

impl TokenManager {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    /// Generate a random 512-bit secret, hex encoded.
    pub fn generate_secret() -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 64] = rng.random();
        hex::encode(bytes)
    }

    pub fn issue(&self, user_id: i64) -> Result<String, BankError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| BankError::internal(format!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, BankError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                BankError::auth("Token has expired")
            }
            _ => BankError::auth("Token is invalid"),
        })
    }
}

/// Hash a password with Argon2id, producing a PHC string.
pub fn hash_password(password: &str) -> Result<String, BankError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BankError::internal(format!("Failed to hash password: {e}")))
}

/// Constant-time verification against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
