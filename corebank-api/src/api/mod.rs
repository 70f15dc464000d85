pub mod handlers;
pub mod identity;

use actix_web::{get, web, HttpResponse, Responder};

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Mount all routes. Shared between `main` and the HTTP-level tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            .service(handlers::users::register_user)
            .service(handlers::users::login_user)
            .service(handlers::users::logout_user)
            .service(handlers::users::current_user)
            .service(handlers::users::update_current_user)
            .service(handlers::users::delete_current_user)
            .service(handlers::users::list_users)
            .service(handlers::accounts::create_account)
            .service(handlers::accounts::list_accounts)
            .service(handlers::accounts::get_account)
            .service(handlers::accounts::update_account)
            .service(handlers::accounts::delete_account)
            .service(handlers::transactions::create_transaction)
            .service(handlers::transactions::list_transactions),
    );
}
