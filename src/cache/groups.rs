use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::source::DocumentSource;

use super::load_once::LoadOnce;

/// A slackline community group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub created_date_time: String,
    #[serde(default)]
    pub updated_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage: Option<String>,
}

/// A contact link of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupLink {
    pub label: &'static str,
    pub url: String,
}

impl GroupInfo {
    /// Last modification timestamp, falling back to creation.
    pub fn last_updated(&self) -> &str {
        self.updated_date_time.as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.created_date_time)
    }

    /// Contact links that are present, in display order.
    pub fn links(&self) -> Vec<GroupLink> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.trim().is_empty())
        }

        let mut links = Vec::new();
        if let Some(email) = present(&self.email) {
            links.push(GroupLink { label: "Email", url: format!("mailto:{email}") });
        }
        let pages = [
            ("Facebook Page", &self.facebook),
            ("Telegram Group", &self.telegram),
            ("Instagram Page", &self.instagram),
            ("WhatsApp Group", &self.whatsapp),
            ("Web Page", &self.webpage),
        ];
        for (label, value) in pages {
            if let Some(url) = present(value) {
                links.push(GroupLink { label, url: url.to_string() });
            }
        }
        links
    }
}

/// Fetch-once directory of community groups.
#[derive(Debug, Default)]
pub struct GroupDirectory {
    groups: LoadOnce<Vec<GroupInfo>>,
}

impl GroupDirectory {
    pub fn new() -> Self { Self::default() }

    /// Fetch the group list from `url` unless already loaded.
    pub fn ensure_loaded(&self, source: &dyn DocumentSource, url: &str) -> Result<()> {
        self.groups.get_or_load(
            || {
                let bytes = source.fetch(url)?;
                serde_json::from_slice::<Vec<GroupInfo>>(&bytes)
                    .with_context(|| format!("parse group list {url}"))
            },
            |groups| !groups.is_empty(),
        )?;
        Ok(())
    }

    /// Load the list if needed, then look up a group by id.
    pub fn find(&self, source: &dyn DocumentSource, url: &str, id: &str) -> Result<Option<GroupInfo>> {
        self.ensure_loaded(source, url)?;
        Ok(self.get(id))
    }

    /// Look up a group among what is already loaded.
    pub fn get(&self, id: &str) -> Option<GroupInfo> {
        self.groups.get()?.iter().find(|group| group.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.groups.get().map_or(0, |groups| groups.len())
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn invalidate(&self) {
        self.groups.invalidate();
    }
}
