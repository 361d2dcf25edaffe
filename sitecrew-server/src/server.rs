//! Server assembly: wires config into the store, crew and router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use sitecrew_agents::{LlmClient, LlmCrew, SiteGenerator};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::artifact::ArtifactDir;
use crate::config::ServerConfig;
use crate::service::SiteService;
use crate::store::{JsonFileStore, MetadataStore};

pub struct Server {
    config: ServerConfig,
    store: Arc<dyn MetadataStore>,
    generator: Arc<dyn SiteGenerator>,
}

impl Server {
    /// Production wiring: JSON file store and the Claude-backed crew.
    pub fn new(config: ServerConfig) -> Self {
        let llm = LlmClient::new(config.api_key.clone())
            .with_model(&config.model)
            .with_base_url(&config.api_base_url)
            .with_max_tokens(config.max_tokens);
        let store = Arc::new(JsonFileStore::new(config.metadata_path.clone()));
        Self {
            store,
            generator: Arc::new(LlmCrew::new(llm)),
            config,
        }
    }

    /// Create a server with a custom store and generator (for testing).
    pub fn with_components(
        config: ServerConfig,
        store: Arc<dyn MetadataStore>,
        generator: Arc<dyn SiteGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            generator,
        }
    }

    async fn build_service(&self) -> Result<Arc<SiteService>> {
        let service = SiteService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.generator),
            ArtifactDir::new(self.config.preview_dir.clone()),
        )
        .with_fence_policy(self.config.fence_policy())
        .with_generation_timeout(self.config.generation_timeout());
        service
            .initialize()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {e}"))?;
        let sites = service
            .list_sites()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load metadata: {e}"))?
            .sites
            .len();
        tracing::info!(
            metadata = %self.config.metadata_path.display(),
            previews = %self.config.preview_dir.display(),
            sites,
            "Storage ready"
        );
        Ok(Arc::new(service))
    }

    /// Run the server, blocking forever.
    pub async fn run(self) -> Result<()> {
        let service = self.build_service().await?;
        let router = crate::web::router(service, self.config.static_dir.as_deref());
        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        tracing::info!("HTTP listener on {}", self.config.listen_addr);
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server and return the bound address + task handle (for testing).
    pub async fn start(self) -> Result<(SocketAddr, JoinHandle<Result<()>>)> {
        let service = self.build_service().await?;
        let router = crate::web::router(service, self.config.static_dir.as_deref());
        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await?;
            Ok(())
        });
        Ok((addr, handle))
    }
}
