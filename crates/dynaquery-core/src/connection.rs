//! Entry point tying configuration to a store client.

use std::sync::Arc;

use crate::builder::RequestBuilder;
use crate::client::StoreClient;
use crate::config::QueryConfig;

/// A configured handle to one store.
///
/// Cheap to clone; every [`Connection::table`] call starts an independent
/// request with its own placeholder table.
#[derive(Clone)]
pub struct Connection {
    config: Arc<QueryConfig>,
    client: Arc<dyn StoreClient>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// A connection with default configuration.
    pub fn new(client: impl StoreClient) -> Self {
        Self {
            config: Arc::new(QueryConfig::default()),
            client: Arc::new(client),
        }
    }

    /// A connection configured from `DYNAQUERY_*` environment variables.
    pub fn from_env(client: impl StoreClient) -> Self {
        Self::new(client).with_config(QueryConfig::from_env())
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Start a request against `table`.
    pub fn table(&self, table: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Arc::clone(&self.client), &self.config, table)
    }

    /// The store client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }
}
