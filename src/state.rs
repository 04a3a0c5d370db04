use std::sync::Arc;

use super::{
    config::Config,
    database::{PostgresSlangStore, SlangStore, init_postgres},
    email::EmailRelay,
    gemini::GeminiProvider,
    resolver::{DefinitionProvider, Resolver},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SlangStore>,
    pub resolver: Resolver,
    pub relay: EmailRelay,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let pool = init_postgres(&config.database_url).await;
        let store: Arc<dyn SlangStore> = Arc::new(PostgresSlangStore::new(pool));
        let provider = Arc::new(GeminiProvider::new(&config));

        Self::assemble(config, store, provider)
    }

    /// Wires the resolver and relay around the given collaborators. Tests
    /// assemble a state over in-memory fakes through this.
    pub fn assemble(
        config: Config,
        store: Arc<dyn SlangStore>,
        provider: Arc<dyn DefinitionProvider>,
    ) -> Arc<Self> {
        let resolver = Resolver::new(store.clone(), provider);
        let relay = EmailRelay::new(config.emailjs_access_token.clone());

        Arc::new(Self {
            config,
            store,
            resolver,
            relay,
        })
    }
}
