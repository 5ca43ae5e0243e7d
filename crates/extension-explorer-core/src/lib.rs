pub mod aggregator;
pub mod config;
pub mod error;
pub mod explorer;
pub mod index;
pub mod link;
pub mod selector;
pub mod source;
pub mod types;

pub use config::{Config, LinkConfig, RegistryConfig};
pub use error::{ExplorerError, Result};
pub use explorer::{Explorer, EMPTY_QUERY_MESSAGE, NO_IMPLEMENTATIONS_MESSAGE, SEARCH_TOOL_NAME};
pub use link::build_search_url;
pub use selector::{diversify, SelectionPolicy};
pub use source::{ExtensionSource, HttpSource};
pub use types::{IndexRecord, Organization, PluginRecord, PluginUsage, SortKey};
