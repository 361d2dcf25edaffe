//! Site operations: generate, extract, allocate, write, persist.
//!
//! Generation runs without any lock held. Allocation through save runs under
//! `write_gate`, so concurrent requests in one process never share an id or
//! version number and never overwrite each other's records.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sitecrew_agents::{SiteBrief, SiteGenerator};
use tokio::sync::Mutex;

use crate::allocator;
use crate::artifact::{self, ArtifactDir, FencePolicy};
use crate::error::SiteError;
use crate::model::{Document, Site, Version};
use crate::store::MetadataStore;

/// URL prefix under which the preview directory is served.
pub const PREVIEW_MOUNT: &str = "/previews";

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub site_id: u64,
    pub version: u32,
    pub preview_url: String,
}

pub struct SiteService {
    store: Arc<dyn MetadataStore>,
    generator: Arc<dyn SiteGenerator>,
    artifacts: ArtifactDir,
    fence_policy: FencePolicy,
    generation_timeout: Option<Duration>,
    write_gate: Mutex<()>,
}

impl SiteService {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        generator: Arc<dyn SiteGenerator>,
        artifacts: ArtifactDir,
    ) -> Self {
        Self {
            store,
            generator,
            artifacts,
            fence_policy: FencePolicy::default(),
            generation_timeout: None,
            write_gate: Mutex::new(()),
        }
    }

    pub fn with_fence_policy(mut self, policy: FencePolicy) -> Self {
        self.fence_policy = policy;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn artifacts(&self) -> &ArtifactDir {
        &self.artifacts
    }

    /// Prepare backing storage. Called once at startup.
    pub async fn initialize(&self) -> Result<(), SiteError> {
        self.store.initialize().await?;
        self.artifacts.ensure().await
    }

    /// Generate a new site; records it with version 1.
    pub async fn create_site(&self, brief: SiteBrief) -> Result<Created, SiteError> {
        let html = self.generate_html(&brief).await?;

        let _gate = self.write_gate.lock().await;
        let mut doc = self.store.load().await?;
        let site_id = allocator::next_site_id(&doc);
        let now = Utc::now();
        let mut site = Site::new(site_id, &brief, now);
        let version = allocator::next_version(&site)?;
        let file_name = artifact::site_file_name(site_id);

        self.artifacts.write(&file_name, &html).await?;
        site.versions.push(Version {
            version,
            file_path: file_name.clone(),
            created_at: now,
            parameters: brief,
        });
        doc.sites.push(site);
        self.store.save(&doc).await?;

        tracing::info!(site_id, version, file = %file_name, "Site created");
        Ok(Created {
            site_id,
            version,
            preview_url: preview_url(&file_name),
        })
    }

    /// Generate a new version of an existing site from a fresh brief.
    pub async fn create_version(&self, site_id: u64, brief: SiteBrief) -> Result<Created, SiteError> {
        // Fail fast before paying for generation.
        self.get_site(site_id).await?;
        let html = self.generate_html(&brief).await?;

        let _gate = self.write_gate.lock().await;
        let mut doc = self.store.load().await?;
        let site = doc
            .site_mut(site_id)
            .ok_or_else(|| SiteError::site_not_found(site_id))?;
        let version = allocator::next_version(site)?;
        let file_name = artifact::version_file_name(site_id, version);

        self.artifacts.write(&file_name, &html).await?;
        site.versions.push(Version {
            version,
            file_path: file_name.clone(),
            created_at: Utc::now(),
            parameters: brief,
        });
        self.store.save(&doc).await?;

        tracing::info!(site_id, version, file = %file_name, "Version created");
        Ok(Created {
            site_id,
            version,
            preview_url: preview_url(&file_name),
        })
    }

    pub async fn list_sites(&self) -> Result<Document, SiteError> {
        self.store.load().await
    }

    pub async fn get_site(&self, site_id: u64) -> Result<Site, SiteError> {
        let doc = self.store.load().await?;
        doc.site(site_id)
            .cloned()
            .ok_or_else(|| SiteError::site_not_found(site_id))
    }

    /// Raw artifact bytes for a `/preview/{name}` segment.
    pub async fn preview(&self, name: &str) -> Result<Vec<u8>, SiteError> {
        let file_name = artifact::preview_file_name(name)?;
        self.artifacts.read(&file_name).await
    }

    async fn generate_html(&self, brief: &SiteBrief) -> Result<String, SiteError> {
        tracing::info!(
            business_type = %brief.business_type,
            style = %brief.style_preference,
            "Running generation pipeline"
        );
        let run = self.generator.run(brief);
        let output = match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                SiteError::Orchestrator(format!("timed out after {limit:?}"))
            })?,
            None => run.await,
        }
        .map_err(|e| SiteError::Orchestrator(format!("{e:#}")))?;
        artifact::extract_html(&output, self.fence_policy)
    }
}

fn preview_url(file_name: &str) -> String {
    format!("{PREVIEW_MOUNT}/{file_name}")
}
