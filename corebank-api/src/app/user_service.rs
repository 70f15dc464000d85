use crate::domain::auth::{hash_password, verify_password, TokenManager};
use crate::domain::error::BankError;
use crate::domain::user::{normalize_email, User, UserProfile};
use crate::infrastructure::storage::bank_store::{BankStore, NewUser};
use crate::validators::user_validator::{
    validate_email, validate_name, validate_password, validate_phone_number,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial update; absent fields keep their current values.
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    store: Arc<BankStore>,
    tokens: TokenManager,
}

impl UserService {
    pub fn new(store: Arc<BankStore>, tokens: TokenManager) -> Self {
        Self { store, tokens }
    }

    pub fn register(&self, input: &RegisterInput) -> Result<UserProfile, BankError> {
        let first_name = validate_name("first_name", input.first_name.as_deref())?;
        let last_name = validate_name("last_name", input.last_name.as_deref())?;
        let email = normalize_email(&validate_email(input.email.as_deref())?);
        let phone_number = validate_phone_number(input.phone_number.as_deref())?;
        let password = validate_password(input.password.as_deref())?;

        let user = self.store.insert_user(NewUser {
            first_name,
            last_name,
            email,
            phone_number,
            password_hash: hash_password(&password)?,
        })?;

        log::info!("Registered user {}", user.id);
        Ok(user.profile())
    }

    /// Verify credentials and mint a session token for the `jwt` cookie.
    /// The same error covers unknown email and wrong password.
    pub fn login(&self, input: &LoginInput) -> Result<(UserProfile, String), BankError> {
        let email = normalize_email(input.email.as_deref().unwrap_or_default());
        let password = input.password.as_deref().unwrap_or_default();

        let user = self
            .store
            .find_user_by_email(&email)
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or_else(|| BankError::auth("Invalid credentials"))?;

        let token = self.tokens.issue(user.id)?;
        Ok((user.profile(), token))
    }

    pub fn get_user(&self, user_id: i64) -> Result<User, BankError> {
        self.store.get_user(user_id)
    }

    pub fn list_users(&self) -> Vec<UserProfile> {
        self.store
            .list_users()
            .into_iter()
            .map(|u| u.profile())
            .collect()
    }

    pub fn update_user(
        &self,
        user_id: i64,
        input: &UpdateUserInput,
    ) -> Result<UserProfile, BankError> {
        let current = self.store.get_user(user_id)?;

        let email = match input.email.as_deref() {
            Some(raw) => {
                let email = normalize_email(&validate_email(Some(raw))?);
                if email != current.email && self.store.find_user_by_email(&email).is_some() {
                    return Err(BankError::conflict("A user with this email already exists"));
                }
                Some(email)
            }
            None => None,
        };
        let first_name = match input.first_name.as_deref() {
            Some(raw) => Some(validate_name("first_name", Some(raw))?),
            None => None,
        };
        let last_name = match input.last_name.as_deref() {
            Some(raw) => Some(validate_name("last_name", Some(raw))?),
            None => None,
        };
        let password_hash = match input.password.as_deref() {
            Some(raw) => Some(hash_password(&validate_password(Some(raw))?)?),
            None => None,
        };

        let updated = self.store.update_user(user_id, |user| {
            if let Some(first_name) = first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = last_name {
                user.last_name = last_name;
            }
            if let Some(email) = email {
                user.email = email;
            }
            if let Some(password_hash) = password_hash {
                user.password_hash = password_hash;
            }
        })?;

        Ok(updated.profile())
    }

    /// Delete the user and everything they own.
    pub fn delete_user(&self, user_id: i64) -> Result<(), BankError> {
        self.store.delete_user(user_id)?;
        log::info!("Deleted user {user_id} and owned accounts");
        Ok(())
    }
}
