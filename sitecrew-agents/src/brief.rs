//! Pipeline inputs and intermediate artifacts.

use serde::{Deserialize, Serialize};

/// The three free-text inputs describing the site to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBrief {
    pub business_type: String,
    pub key_features: String,
    pub style_preference: String,
}

impl SiteBrief {
    pub fn new(
        business_type: impl Into<String>,
        key_features: impl Into<String>,
        style_preference: impl Into<String>,
    ) -> Self {
        Self {
            business_type: business_type.into(),
            key_features: key_features.into(),
            style_preference: style_preference.into(),
        }
    }
}

/// Website copy produced by the content writer.
///
/// The writer is asked for `KEY: value` sections (`HERO_TITLE`,
/// `FEATURE1_DESCRIPTION`, ...). `raw` is kept verbatim for the designer;
/// `sections` holds whatever could be recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub raw: String,
    pub sections: Vec<(String, String)>,
}

impl Content {
    pub fn parse(raw: &str) -> Self {
        let mut sections: Vec<(String, String)> = Vec::new();
        for line in raw.lines() {
            let trimmed = line.trim();
            if let Some((key, value)) = split_section(trimmed) {
                sections.push((key.to_string(), value.trim().to_string()));
            } else if let Some((_, value)) = sections.last_mut()
                && !trimmed.is_empty()
            {
                // Continuation of a multi-line section.
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(trimmed);
            }
        }
        Self {
            raw: raw.trim().to_string(),
            sections,
        }
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Recognize `UPPER_SNAKE: rest`, tolerating markdown bold around the key.
fn split_section(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim().trim_matches('*').trim();
    let is_key = !key.is_empty()
        && key.starts_with(|c: char| c.is_ascii_uppercase())
        && key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    is_key.then_some((key, rest))
}
