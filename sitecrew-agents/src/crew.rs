//! Sequential two-stage crew: content writer, then web designer.
//!
//! The designer's task embeds the writer's output, so the stages are
//! ordered by data dependency rather than by call order alone.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::agent::{self, Agent};
use crate::brief::{Content, SiteBrief};
use crate::llm::LlmClient;

/// A two-stage site generator.
#[async_trait]
pub trait SiteGenerator: Send + Sync {
    /// Stage 1: write the website copy.
    async fn generate_content(&self, brief: &SiteBrief) -> Result<Content>;

    /// Stage 2: produce the page. Returns the raw model output, which is
    /// expected (but not guaranteed) to hold a fenced HTML block.
    async fn generate_design(&self, brief: &SiteBrief, content: &Content) -> Result<String>;

    /// Run both stages in order.
    async fn run(&self, brief: &SiteBrief) -> Result<String> {
        let content = self
            .generate_content(brief)
            .await
            .context("Content stage failed")?;
        tracing::info!(
            business_type = %brief.business_type,
            sections = content.sections.len(),
            "Content stage complete"
        );
        let output = self
            .generate_design(brief, &content)
            .await
            .context("Design stage failed")?;
        tracing::info!(
            business_type = %brief.business_type,
            bytes = output.len(),
            "Design stage complete"
        );
        Ok(output)
    }
}

/// The production crew backed by Claude.
pub struct LlmCrew {
    llm: LlmClient,
    writer: Agent,
    designer: Agent,
}

impl LlmCrew {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            writer: agent::content_writer(),
            designer: agent::web_designer(),
        }
    }
}

#[async_trait]
impl SiteGenerator for LlmCrew {
    async fn generate_content(&self, brief: &SiteBrief) -> Result<Content> {
        tracing::debug!(role = %self.writer.role, model = %self.llm.model(), "Starting task");
        let raw = self
            .llm
            .complete(&self.writer.system_prompt(), &agent::content_task(brief))
            .await?;
        Ok(Content::parse(&raw))
    }

    async fn generate_design(&self, brief: &SiteBrief, content: &Content) -> Result<String> {
        tracing::debug!(role = %self.designer.role, model = %self.llm.model(), "Starting task");
        self.llm
            .complete(
                &self.designer.system_prompt(),
                &agent::design_task(brief, content),
            )
            .await
    }
}
