//! Application state wiring the relay together.
//!
//! The core services are generic over the transcript store; AppState pins
//! them to the SQLite implementation and owns the single registry and
//! directory instances created at process start.

use std::sync::Arc;

use palaver_core::directory::RoomDirectory;
use palaver_core::history::HistoryService;
use palaver_core::registry::ConnectionRegistry;
use palaver_core::router::MessageRouter;
use palaver_infra::sqlite::pool::DatabasePool;
use palaver_infra::sqlite::transcript::SqliteTranscriptStore;

/// Concrete type aliases pinning the service generics to the SQLite store.
pub type ConcreteRouter = MessageRouter<SqliteTranscriptStore>;
pub type ConcreteHistory = HistoryService<SqliteTranscriptStore>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConcreteRouter>,
    pub history: Arc<ConcreteHistory>,
    pub registry: Arc<ConnectionRegistry>,
    pub store: Arc<SqliteTranscriptStore>,
}

impl AppState {
    /// Connect to the database, run migrations, and wire up the services.
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(database_url).await?;
        let store = Arc::new(SqliteTranscriptStore::new(pool));

        let directory = Arc::new(RoomDirectory::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let router = Arc::new(MessageRouter::new(
            store.clone(),
            directory,
            registry.clone(),
        ));
        let history = Arc::new(HistoryService::new(store.clone()));

        Ok(Self {
            router,
            history,
            registry,
            store,
        })
    }
}
