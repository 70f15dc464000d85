pub mod accounts;
pub mod transactions;
pub mod users;
