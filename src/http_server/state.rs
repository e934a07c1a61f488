use std::sync::Arc;

use crate::database::Database;
use crate::ports::clock::Clock;

pub struct AppState {
    pub db: Arc<Database>,
    pub clock: Arc<dyn Clock>,
    pub questions_per_page: u64,
}
