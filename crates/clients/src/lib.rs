//! Concrete collaborator implementations: sqlite through sqlx and http
//! through reqwest.

pub mod http;
pub mod sql;

pub use http::ReqwestHttpClient;
pub use sql::{connect, connect_with_settings, DbPool, SqlxSqlClient};
