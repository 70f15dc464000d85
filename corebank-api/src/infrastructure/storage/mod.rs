pub mod bank_store;
