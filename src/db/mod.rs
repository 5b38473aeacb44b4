pub mod buyers;
pub mod connection;
pub mod history;
pub mod rate_limit;
pub mod users;

pub use connection::{init_db, Database, UnitOfWork};
