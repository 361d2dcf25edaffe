//! Id and version allocation, derived from current collection length.
//!
//! No external counter: callers must hold the write gate between
//! allocating and saving, or two writers can receive the same number.

use crate::error::SiteError;
use crate::model::{Document, Site};

pub fn next_site_id(doc: &Document) -> u64 {
    doc.sites.len() as u64 + 1
}

pub fn next_version(site: &Site) -> Result<u32, SiteError> {
    version_after(site.versions.len()).ok_or_else(|| {
        SiteError::InvalidRequest(format!("Site {} has no version numbers left", site.id))
    })
}

fn version_after(count: usize) -> Option<u32> {
    u32::try_from(count).ok()?.checked_add(1)
}
