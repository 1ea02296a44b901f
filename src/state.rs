use crate::config::AppConfig;
use crate::db::{DbPool, OrmConn};

/// Shared handles opened at startup and dropped with the process.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
}
