use sqlx::PgPool;

mod activities;
mod attendance;
mod audit_logs;
mod gallery;
mod iuran;
mod meetings;
mod transactions;
mod users;

/// Store di atas pool Postgres bersama.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}
