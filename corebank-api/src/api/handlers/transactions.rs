use crate::api::identity::{client_ip, AuthenticatedUser};
use crate::app::transaction_engine::{TransactionEngine, TransactionFilter, TransactionInput};
use crate::domain::error::BankError;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, HttpRequest, HttpResponse};
use std::sync::Arc;

#[post("/accounts/{id}/transactions")]
pub async fn create_transaction(
    req: HttpRequest,
    _user: AuthenticatedUser,
    engine: Data<Arc<TransactionEngine>>,
    path: Path<i64>,
    body: Json<TransactionInput>,
) -> Result<HttpResponse, BankError> {
    let account_id = path.into_inner();
    let ip_address = client_ip(&req);
    let record = engine.apply_transaction(account_id, &body, &ip_address)?;
    log::info!(
        "Posted {} {} to account {}",
        record.kind,
        record.amount,
        account_id
    );
    Ok(HttpResponse::Created().json(record))
}

#[get("/accounts/{id}/transactions")]
pub async fn list_transactions(
    _user: AuthenticatedUser,
    engine: Data<Arc<TransactionEngine>>,
    path: Path<i64>,
    query: Query<TransactionFilter>,
) -> Result<HttpResponse, BankError> {
    let page = engine.list_transactions(path.into_inner(), &query)?;
    Ok(HttpResponse::Ok().json(page))
}
