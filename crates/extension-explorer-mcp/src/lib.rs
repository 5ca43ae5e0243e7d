//! MCP server exposing the extension point explorer as tools
//!
//! Tools:
//! - `intellij_extension_list`
//! - `intellij_extension_search`
//! - `intellij_extension_detail`

mod server;

pub use server::{DetailRequest, ExplorerServer, SearchRequest};
