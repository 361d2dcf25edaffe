//! sitecrew-agents: the generation side of sitecrew.
//!
//! Two LLM-backed agents work a business brief in sequence:
//! - Content Writer: headlines, value propositions, feature copy
//! - Web Designer: a single-file HTML page with embedded CSS, built from that copy

pub mod agent;
pub mod brief;
pub mod crew;
pub mod llm;

pub use brief::{Content, SiteBrief};
pub use crew::{LlmCrew, SiteGenerator};
pub use llm::LlmClient;
