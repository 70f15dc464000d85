use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A registered user. Owns zero or more accounts; deleting the user
/// cascades to its accounts and their transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Argon2 PHC string. Never serialized outward; see [`UserProfile`].
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Outward-facing view of a [`User`] with the credential hash stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Lowercase and trim an email address before storing or comparing it.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
