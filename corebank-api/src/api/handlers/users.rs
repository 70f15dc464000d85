use crate::api::identity::AuthenticatedUser;
use crate::app::user_service::{LoginInput, RegisterInput, UpdateUserInput, UserService};
use crate::domain::error::BankError;
use actix_web::cookie::Cookie;
use actix_web::web::{Data, Json};
use actix_web::{delete, get, patch, post, HttpResponse};
use serde_json::json;
use std::sync::Arc;

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build("jwt", token)
        .path("/")
        .http_only(true)
        .secure(true)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new("jwt", "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[post("/users/register")]
pub async fn register_user(
    service: Data<Arc<UserService>>,
    body: Json<RegisterInput>,
) -> Result<HttpResponse, BankError> {
    let profile = service.register(&body)?;
    Ok(HttpResponse::Created().json(profile))
}

#[post("/users/login")]
pub async fn login_user(
    service: Data<Arc<UserService>>,
    body: Json<LoginInput>,
) -> Result<HttpResponse, BankError> {
    let (profile, token) = service.login(&body)?;
    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(json!({
        "message": "Logged in successfully",
        "user": profile,
    })))
}

#[post("/users/logout")]
pub async fn logout_user(_user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({ "message": "Logged out" }))
}

#[get("/users/me")]
pub async fn current_user(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0.profile())
}

#[patch("/users/me")]
pub async fn update_current_user(
    user: AuthenticatedUser,
    service: Data<Arc<UserService>>,
    body: Json<UpdateUserInput>,
) -> Result<HttpResponse, BankError> {
    let profile = service.update_user(user.0.id, &body)?;
    Ok(HttpResponse::Ok().json(profile))
}

#[delete("/users/me")]
pub async fn delete_current_user(
    user: AuthenticatedUser,
    service: Data<Arc<UserService>>,
) -> Result<HttpResponse, BankError> {
    service.delete_user(user.0.id)?;
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({ "message": "Account deleted successfully" })))
}

#[get("/users")]
pub async fn list_users(
    _user: AuthenticatedUser,
    service: Data<Arc<UserService>>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.list_users())
}
