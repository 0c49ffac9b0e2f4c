use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService};
use crate::middleware::ResponseCache;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    jwt_service: JwtService,
    response_cache: ResponseCache,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        Ok(Self::with_auth(db, auth_config))
    }

    pub fn with_auth(db: PgPool, auth_config: AuthConfig) -> Self {
        let jwt_service = JwtService::new(&auth_config);
        let response_cache = ResponseCache::from_env();

        Self {
            db,
            jwt_service,
            response_cache,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn response_cache(&self) -> &ResponseCache {
        &self.response_cache
    }
}
