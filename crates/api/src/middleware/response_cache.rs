use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

const X_CACHE: &str = "x-cache";

#[derive(Clone)]
struct CacheEntry {
    stored_at: Instant,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

/// TTL-bound response cache for the aggregate GET endpoints. Keys are
/// method + URI + authenticated subject, so one tenant's cached dashboard
/// never leaks to another and cardinality stays bounded by users x routes.
#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_env() -> Self {
        let secs = std::env::var("RESPONSE_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self::new(Duration::from_secs(secs))
    }

    async fn lookup(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.clone())
    }

    async fn store(&self, key: String, entry: CacheEntry) {
        let mut entries = self.entries.write().await;
        // Lazy eviction: drop whatever has expired while we hold the lock.
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        entries.insert(key, entry);
    }
}

fn cache_key(request: &Request) -> String {
    let subject = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.as_str())
        .unwrap_or("anonymous");
    format!("{} {} {}", request.method(), request.uri(), subject)
}

/// Serve GETs from the cache within the TTL; pass everything else through.
/// Hits replay the stored status/headers/body with `X-Cache: HIT`; misses
/// are forwarded and stored when the upstream answers 200.
pub async fn response_cache(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::GET {
        return Ok(next.run(request).await);
    }

    let cache = state.response_cache().clone();
    let key = cache_key(&request);

    if let Some(entry) = cache.lookup(&key).await {
        let mut response = Response::builder()
            .status(entry.status)
            .body(Body::from(entry.body))
            .map_err(|e| AppError::Internal(e.to_string()))?;
        *response.headers_mut() = entry.headers;
        response
            .headers_mut()
            .insert(X_CACHE, HeaderValue::from_static("HIT"));
        return Ok(response);
    }

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if parts.status == StatusCode::OK {
        cache
            .store(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    status: parts.status,
                    headers: parts.headers.clone(),
                    body: bytes.clone(),
                },
            )
            .await;
    }

    parts
        .headers
        .insert(X_CACHE, HeaderValue::from_static("MISS"));
    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(body: &'static str) -> CacheEntry {
        CacheEntry {
            stored_at: Instant::now(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn serves_within_ttl_only() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.store("GET /x u1".into(), entry("cached")).await;

        assert!(cache.lookup("GET /x u1").await.is_some());
        assert!(cache.lookup("GET /x u2").await.is_none());

        let expired = ResponseCache::new(Duration::ZERO);
        expired.store("GET /x u1".into(), entry("cached")).await;
        assert!(expired.lookup("GET /x u1").await.is_none());
    }
}
