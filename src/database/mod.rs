pub mod aggregates;
pub mod catalog;
pub mod connection;
pub mod groups;
pub mod models;
pub mod rankings;
pub mod setup;
pub mod users;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
