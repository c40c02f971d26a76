pub mod auth;
pub mod customers;
pub mod orders;
pub mod outlets;
pub mod services;
