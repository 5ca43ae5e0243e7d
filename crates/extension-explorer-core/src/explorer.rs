//! Explorer facade
//!
//! The three text operations exposed to tool callers. Every outcome,
//! including bad input and unreachable endpoints, is rendered as text.

use std::fmt::Write as _;

use crate::aggregator;
use crate::config::Config;
use crate::index;
use crate::link;
use crate::selector;
use crate::source::{ExtensionSource, HttpSource};
use crate::types::PluginUsage;

/// Tool name pointed at when an extension point is unknown
pub const SEARCH_TOOL_NAME: &str = "intellij_extension_search";

pub const EMPTY_QUERY_MESSAGE: &str =
    "error: search query must not be empty. Provide a keyword such as 'completion' or 'contributor'.";

pub const NO_IMPLEMENTATIONS_MESSAGE: &str =
    "No public implementations found with source code available.";

/// Stateless explorer over an injected source; every call fetches fresh data
pub struct Explorer<S> {
    source: S,
    config: Config,
}

impl Explorer<HttpSource> {
    /// Explorer backed by the marketplace endpoints in `config`
    pub fn from_config(config: Config) -> Self {
        let source = HttpSource::new(config.registry.clone());
        Self { source, config }
    }
}

impl<S: ExtensionSource> Explorer<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All extension point names, one per line
    pub fn list(&self) -> String {
        join_lines(index::fetch_all(&self.source))
    }

    /// Extension point names containing `query`, one per line
    pub fn search(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return EMPTY_QUERY_MESSAGE.to_string();
        }

        let matches = index::search(&self.source, query);
        if matches.is_empty() {
            return format!("No extension points found matching '{}'.", query);
        }

        join_lines(matches)
    }

    /// Diversified real-world implementations of `extension_point`
    pub fn detail(&self, extension_point: &str) -> String {
        let names = index::fetch_all(&self.source);

        let Some(name) = index::find(&names, extension_point.trim()) else {
            return not_found_message(extension_point);
        };

        let usages = self.implementations(name);
        self.render_detail(name, &usages)
    }

    /// Aggregate and diversify usages of a known extension point
    pub fn implementations(&self, extension_point: &str) -> Vec<PluginUsage> {
        let pool = aggregator::collect(&self.source, extension_point);
        selector::diversify(&pool, &self.config.selection)
    }

    fn render_detail(&self, name: &str, usages: &[PluginUsage]) -> String {
        let mut content = String::new();

        let _ = writeln!(content, "# {}\n", name);
        let _ = writeln!(content, "## Plugin Implementations:");

        if usages.is_empty() {
            let _ = writeln!(content, "{}", NO_IMPLEMENTATIONS_MESSAGE);
            return content;
        }

        for usage in usages {
            let search = link::build_search_url(&usage.source_code_url, name, &self.config.links)
                .map(|url| format!(" Search: {}", url))
                .unwrap_or_default();

            let _ = writeln!(
                content,
                " - \"{}\" Source: {}{}",
                usage.name, usage.source_code_url, search
            );
        }

        content
    }
}

fn not_found_message(extension_point: &str) -> String {
    format!(
        "Extension point '{}' not found. Use '{}' to find available extension points.",
        extension_point, SEARCH_TOOL_NAME
    )
}

fn join_lines(names: impl IntoIterator<Item = String>) -> String {
    names.into_iter().collect::<Vec<_>>().join("\n")
}
