use actix_web::{web, App, HttpServer};
use corebank_api::api;
use corebank_api::app::account_service::AccountService;
use corebank_api::app::transaction_engine::TransactionEngine;
use corebank_api::app::user_service::UserService;
use corebank_api::infrastructure::config::Config;
use corebank_api::infrastructure::logger::Logger;
use corebank_api::infrastructure::storage::bank_store::BankStore;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(Error::new(
                ErrorKind::Other,
                format!("Configuration loading failed: {e}"),
            ));
        }
    };

    Logger::init(&config.log_level);
    log::info!("Starting corebank API server...");

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        log::error!(
            "Configuration validation failed: {}",
            validation_errors.join(", ")
        );
        return Err(Error::new(
            ErrorKind::Other,
            format!(
                "Configuration validation failed: {}",
                validation_errors.join(", ")
            ),
        ));
    }
    if std::env::var("JWT_SECRET").is_err() {
        log::warn!("JWT_SECRET not set; using an ephemeral secret, sessions reset on restart");
    }

    let store = match BankStore::new(&config.data_dir) {
        Ok(store) => {
            log::info!("Store initialized from {}", config.data_dir);
            Arc::new(store)
        }
        Err(e) => {
            log::error!("Failed to initialize store: {e}");
            return Err(Error::new(
                ErrorKind::Other,
                format!("Store initialization failed: {e}"),
            ));
        }
    };

    let tokens = Arc::new(config.token_manager());
    let user_service = Arc::new(UserService::new(Arc::clone(&store), (*tokens).clone()));
    let account_service = Arc::new(AccountService::new(Arc::clone(&store)));
    let transaction_engine = Arc::new(TransactionEngine::new(Arc::clone(&store)));

    let port = config.port;
    log::info!("Listening on port {port} ({})", config.environment);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .app_data(web::Data::new(Arc::clone(&store)))
            .app_data(web::Data::new(Arc::clone(&config)))
            .app_data(web::Data::new(Arc::clone(&tokens)))
            .app_data(web::Data::new(Arc::clone(&user_service)))
            .app_data(web::Data::new(Arc::clone(&account_service)))
            .app_data(web::Data::new(Arc::clone(&transaction_engine)))
            .configure(api::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
