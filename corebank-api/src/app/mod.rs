pub mod account_service;
pub mod transaction_engine;
pub mod user_service;
