use std::time::Duration;

use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub favorites_timeout: Duration,
}

impl AppState {
    pub fn new(pool: DbPool, favorites_timeout: Duration) -> Self {
        let orm = crate::db::orm_from_pool(pool.clone());
        Self {
            pool,
            orm,
            favorites_timeout,
        }
    }
}
