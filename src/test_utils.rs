use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use crate::database::Database;
use crate::ports::clock::{Clock, MockClock};

/// Fresh in-memory store with the real migrations applied.
pub async fn test_db() -> Arc<Database> {
    // A single pooled connection keeps the in-memory database alive for the whole test
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();
    Arc::new(Database::prepare(conn).await.unwrap())
}

/// A clock pinned to `now` for every call.
pub fn fixed_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_now().return_const(now);
    Arc::new(clock)
}
