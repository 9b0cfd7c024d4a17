// Extraction Dispatcher: resolves the active credential pools a platform needs and
// hands one detached scrape job per request to the task pool.

pub mod credentials;
pub mod dispatcher;
pub mod handlers;
pub mod pool;
pub mod runner;
