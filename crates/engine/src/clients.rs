//! Collaborator seams for the states that reach outside the process.
//!
//! The interpreter only ever talks to these traits; concrete sqlx and
//! reqwest implementations live in a separate crate, and the unconfigured
//! fallbacks let a bot without jdbc or http states run with no backends.

use std::collections::BTreeMap;

use async_trait::async_trait;
use flowbot_core::{HttpHeaders, HttpMethod, SessionValue};

use crate::errors::ClientError;

/// An http request with every placeholder already substituted.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedHttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query_params: Vec<(String, String)>,
    pub body_params: Vec<(String, String)>,
    pub headers: HttpHeaders,
}

#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Runs a select and returns one map of column name to value per row.
    async fn query_for_list(
        &self,
        sql: &str,
    ) -> Result<Vec<BTreeMap<String, SessionValue>>, ClientError>;

    /// Runs an insert or update and returns the number of affected rows.
    async fn update(&self, sql: &str) -> Result<u64, ClientError>;
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes the request and returns the response body as JSON.
    async fn execute(&self, request: &ResolvedHttpRequest)
        -> Result<serde_json::Value, ClientError>;
}

#[async_trait]
impl<T: SqlClient + ?Sized> SqlClient for Box<T> {
    async fn query_for_list(
        &self,
        sql: &str,
    ) -> Result<Vec<BTreeMap<String, SessionValue>>, ClientError> {
        (**self).query_for_list(sql).await
    }

    async fn update(&self, sql: &str) -> Result<u64, ClientError> {
        (**self).update(sql).await
    }
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Box<T> {
    async fn execute(
        &self,
        request: &ResolvedHttpRequest,
    ) -> Result<serde_json::Value, ClientError> {
        (**self).execute(request).await
    }
}

/// Fails every call: used when no database is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredSqlClient;

#[async_trait]
impl SqlClient for UnconfiguredSqlClient {
    async fn query_for_list(
        &self,
        _sql: &str,
    ) -> Result<Vec<BTreeMap<String, SessionValue>>, ClientError> {
        Err(ClientError::NotConfigured("sql"))
    }

    async fn update(&self, _sql: &str) -> Result<u64, ClientError> {
        Err(ClientError::NotConfigured("sql"))
    }
}

/// Fails every call: used when no http backend is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredHttpClient;

#[async_trait]
impl HttpClient for UnconfiguredHttpClient {
    async fn execute(
        &self,
        _request: &ResolvedHttpRequest,
    ) -> Result<serde_json::Value, ClientError> {
        Err(ClientError::NotConfigured("http"))
    }
}
