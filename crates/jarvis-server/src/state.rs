use jarvis_core::command::CommandRegistry;
use jarvis_core::config::Config;
use jarvis_core::table::TableStorage;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn TableStorage>,
    pub registry: Arc<CommandRegistry>,
    pub config: Arc<Config>,
    /// Held for the duration of every command so commands run one at a time.
    pub exec_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Arc<dyn TableStorage>, registry: CommandRegistry, config: Config) -> Self {
        Self {
            storage,
            registry: Arc::new(registry),
            config: Arc::new(config),
            exec_lock: Arc::new(Mutex::new(())),
        }
    }
}
