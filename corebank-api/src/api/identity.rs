use crate::domain::auth::TokenManager;
use crate::domain::error::BankError;
use crate::domain::user::User;
use crate::infrastructure::storage::bank_store::BankStore;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use std::sync::Arc;

/// The authenticated principal, resolved from the `jwt` session cookie.
///
/// Extracting this in a handler signature is what makes a route require
/// authentication; resolution failures map to 401 via [`BankError::Auth`].
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = BankError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}

fn resolve(req: &HttpRequest) -> Result<AuthenticatedUser, BankError> {
    let tokens = req
        .app_data::<web::Data<Arc<TokenManager>>>()
        .ok_or_else(|| BankError::internal("Token manager not configured"))?;
    let store = req
        .app_data::<web::Data<Arc<BankStore>>>()
        .ok_or_else(|| BankError::internal("Store not configured"))?;

    let cookie = req
        .cookie("jwt")
        .ok_or_else(|| BankError::auth("Authentication required"))?;
    let claims = tokens.verify(cookie.value())?;
    let user_id = claims.user_id()?;

    // The token may outlive the user it was minted for.
    let user = store
        .get_user(user_id)
        .map_err(|_| BankError::auth("User not found"))?;

    Ok(AuthenticatedUser(user))
}

/// Source IP for the audit trail: first hop of `X-Forwarded-For` when a
/// proxy supplied one, otherwise the peer address.
pub fn client_ip(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_takes_precedence() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("192.0.2.1:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.1:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.1");
    }

    #[test]
    fn unknown_when_nothing_is_available() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), "unknown");
    }
}
