pub mod auth;
pub mod buyers;
