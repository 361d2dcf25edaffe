//! Persisted site and version records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitecrew_agents::SiteBrief;

/// The whole metadata document: `{ "sites": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub sites: Vec<Site>,
}

impl Document {
    pub fn site(&self, id: u64) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn site_mut(&mut self, id: u64) -> Option<&mut Site> {
        self.sites.iter_mut().find(|s| s.id == id)
    }
}

/// A generated site and its version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u64,
    pub business_type: String,
    pub key_features: String,
    pub style_preference: String,
    pub created_at: DateTime<Utc>,
    /// Append-only.
    pub versions: Vec<Version>,
}

impl Site {
    pub fn new(id: u64, brief: &SiteBrief, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            business_type: brief.business_type.clone(),
            key_features: brief.key_features.clone(),
            style_preference: brief.style_preference.clone(),
            created_at,
            versions: Vec::new(),
        }
    }

    /// The brief the site was created from.
    pub fn brief(&self) -> SiteBrief {
        SiteBrief::new(
            self.business_type.clone(),
            self.key_features.clone(),
            self.style_preference.clone(),
        )
    }

    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }
}

/// One rendered artifact of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version: u32,
    /// Artifact file name, relative to the preview directory.
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    /// Inputs used for this version; may differ from the site's own fields.
    pub parameters: SiteBrief,
}
