//! HTML artifact extraction, naming and storage.

use std::path::{Path, PathBuf};

use crate::error::SiteError;

const OPEN_FENCE: &str = "```html";
const CLOSE_FENCE: &str = "```";

/// What to do when the generator output has no ```` ```html ```` fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePolicy {
    /// Use the whole trimmed output as the artifact.
    #[default]
    Permissive,
    /// Fail with `SiteError::Extraction`.
    Strict,
}

/// Pull the HTML payload out of raw generator output.
///
/// Takes the text after the last opening fence, up to the first closing
/// fence after it, trimmed.
pub fn extract_html(raw: &str, policy: FencePolicy) -> Result<String, SiteError> {
    let Some(start) = raw.rfind(OPEN_FENCE) else {
        return match policy {
            FencePolicy::Permissive => {
                tracing::warn!(bytes = raw.len(), "No ```html fence in output, using it verbatim");
                Ok(raw.trim().to_string())
            }
            FencePolicy::Strict => Err(SiteError::Extraction(
                "no ```html block in generator output".to_string(),
            )),
        };
    };
    let body = &raw[start + OPEN_FENCE.len()..];
    let body = body.split(CLOSE_FENCE).next().unwrap_or(body).trim();
    if body.is_empty() && policy == FencePolicy::Strict {
        return Err(SiteError::Extraction("```html block is empty".to_string()));
    }
    Ok(body.to_string())
}

/// `site_{id}.html`
pub fn site_file_name(site_id: u64) -> String {
    format!("site_{site_id}.html")
}

/// `site_{id}_v{version}.html`
pub fn version_file_name(site_id: u64, version: u32) -> String {
    format!("site_{site_id}_v{version}.html")
}

/// Map a `/preview/{name}` segment to its artifact file: `1` → `site_1.html`,
/// `1_v2` → `site_1_v2.html`.
pub fn preview_file_name(name: &str) -> Result<String, SiteError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(SiteError::InvalidRequest(format!(
            "invalid preview name: {name:?}"
        )));
    }
    Ok(format!("site_{name}.html"))
}

/// Directory holding rendered artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if missing.
    pub async fn ensure(&self) -> Result<(), SiteError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SiteError::storage("Failed to create preview directory", e))
    }

    fn path(&self, name: &str) -> Result<PathBuf, SiteError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !plain {
            return Err(SiteError::InvalidRequest(format!(
                "invalid artifact name: {name:?}"
            )));
        }
        Ok(self.root.join(name))
    }

    pub async fn write(&self, name: &str, html: &str) -> Result<(), SiteError> {
        let path = self.path(name)?;
        tokio::fs::write(&path, html)
            .await
            .map_err(|e| SiteError::storage(&format!("Failed to write {}", path.display()), e))?;
        tracing::info!(file = %name, bytes = html.len(), "Artifact written");
        Ok(())
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, SiteError> {
        let path = self.path(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SiteError::NotFound(format!("Artifact {name}")))
            }
            Err(e) => Err(SiteError::storage(
                &format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }
}
