//! Data model
//!
//! Raw records as the registry and marketplace send them, and the
//! normalized `PluginUsage` the ranking stages work on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for plugins the marketplace returns without a name
pub const UNKNOWN_PLUGIN_NAME: &str = "Unknown";

/// One entry of the extension point registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Fully qualified extension point name (e.g. `com.intellij.completion.contributor`)
    #[serde(default, rename = "implementationName")]
    pub implementation_name: Option<String>,
}

impl IndexRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            implementation_name: Some(name.into()),
        }
    }
}

/// Publishing organization of a marketplace plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub verified: Option<bool>,
}

/// Plugin record from the marketplace search API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginRecord {
    /// Marketplace id; numeric upstream, kept as raw JSON
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub downloads: Option<u64>,
    #[serde(default, rename = "sourceCodeUrl")]
    pub source_code_url: Option<String>,
    #[serde(default, rename = "lastUpdateDate")]
    pub last_update_date: Option<i64>,
    #[serde(default)]
    pub organization: Option<Organization>,
}

impl PluginRecord {
    /// Marketplace id as a string key, if present
    pub fn id_key(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A marketplace plugin that declares an extension point and ships source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginUsage {
    pub id: String,
    pub name: String,
    pub downloads: u64,
    pub source_code_url: String,
    pub verified: bool,
    pub last_update_date: i64,
}

impl PluginUsage {
    /// Normalize a raw record.
    ///
    /// Returns `None` when the record has no id or no source code URL.
    pub fn from_record(record: &PluginRecord) -> Option<Self> {
        let id = record.id_key()?;

        let source_code_url = record.source_code_url.as_deref().unwrap_or("").trim();
        if source_code_url.is_empty() {
            return None;
        }

        let verified = record
            .organization
            .as_ref()
            .and_then(|org| org.verified)
            .unwrap_or(false);

        Some(Self {
            id,
            name: record
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLUGIN_NAME.to_string()),
            downloads: record.downloads.unwrap_or(0),
            source_code_url: source_code_url.to_string(),
            verified,
            last_update_date: record.last_update_date.unwrap_or(0),
        })
    }
}

/// Sort order of a marketplace usage query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    /// Most downloaded first
    Downloads,
    /// Most recently updated first
    UpdateDate,
}

impl SortKey {
    /// Enum literal used by the marketplace query language
    pub fn as_query_literal(&self) -> &'static str {
        match self {
            Self::Downloads => "DOWNLOADS",
            Self::UpdateDate => "UPDATE_DATE",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_literal())
    }
}
