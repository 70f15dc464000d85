use crate::api::identity::AuthenticatedUser;
use crate::app::account_service::{AccountInput, AccountService};
use crate::domain::error::BankError;
use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use std::sync::Arc;

#[post("/accounts")]
pub async fn create_account(
    user: AuthenticatedUser,
    service: Data<Arc<AccountService>>,
    body: Json<AccountInput>,
) -> Result<HttpResponse, BankError> {
    let account = service.create_account(&user.0, &body)?;
    Ok(HttpResponse::Created().json(account))
}

#[get("/accounts")]
pub async fn list_accounts(
    _user: AuthenticatedUser,
    service: Data<Arc<AccountService>>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.list_accounts())
}

#[get("/accounts/{id}")]
pub async fn get_account(
    _user: AuthenticatedUser,
    service: Data<Arc<AccountService>>,
    path: Path<i64>,
) -> Result<HttpResponse, BankError> {
    let account = service.get_account(path.into_inner())?;
    Ok(HttpResponse::Ok().json(account))
}

#[put("/accounts/{id}")]
pub async fn update_account(
    _user: AuthenticatedUser,
    service: Data<Arc<AccountService>>,
    path: Path<i64>,
    body: Json<AccountInput>,
) -> Result<HttpResponse, BankError> {
    let account = service.update_account(path.into_inner(), &body)?;
    Ok(HttpResponse::Ok().json(account))
}

#[delete("/accounts/{id}")]
pub async fn delete_account(
    _user: AuthenticatedUser,
    service: Data<Arc<AccountService>>,
    path: Path<i64>,
) -> Result<HttpResponse, BankError> {
    service.delete_account(path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
