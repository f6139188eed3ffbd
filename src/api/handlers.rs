//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{Cache, LruCache, MemoryCache, MultiLevelCache};
use crate::config::Config;
use crate::context::Context;
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse};

/// Application state shared across all handlers.
///
/// The server fronts a two-level cache: a bounded LRU store as level 0 and an
/// unbounded memory cache, swept in the background, as level 1.
#[derive(Clone)]
pub struct AppState {
    /// Two-level cache serving every request
    pub cache: Arc<MultiLevelCache<String>>,
    /// Second level, kept so the owner can drive its expiry sweep
    pub memory: Arc<MemoryCache<String>>,
    /// TTL applied when a SET request omits one
    pub default_ttl: Duration,
    /// Deadline given to every cache operation
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState from configuration.
    ///
    /// Fails if the configured first-level capacity is zero.
    pub fn from_config(config: &Config) -> Result<Self> {
        let l1: Arc<LruCache<String>> = Arc::new(LruCache::new(config.l1_capacity)?);
        let memory: Arc<MemoryCache<String>> = Arc::new(MemoryCache::new());
        let cache = MultiLevelCache::new(vec![
            l1 as Arc<dyn Cache<String>>,
            memory.clone() as Arc<dyn Cache<String>>,
        ]);

        Ok(Self {
            cache: Arc::new(cache),
            memory,
            default_ttl: config.default_ttl(),
            request_timeout: config.request_timeout(),
        })
    }

    fn context(&self) -> Context {
        Context::with_timeout(self.request_timeout)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in every cache level with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs).unwrap_or(state.default_ttl);
    state.cache.set(&state.context(), &req.key, req.value, ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the first level that holds it. A miss answers
/// 404 with `found: false`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<GetResponse>)> {
    match state.cache.get(&state.context(), &key)? {
        Some(value) => Ok((StatusCode::OK, Json(GetResponse::hit(key, value)))),
        None => Ok((StatusCode::NOT_FOUND, Json(GetResponse::miss(key)))),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from every cache level. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&state.context(), &key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.levels()))
}
