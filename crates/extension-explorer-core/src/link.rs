//! Source link builder
//!
//! Turns a plugin's repository URL into a code search link scoped to that
//! repository and the extension point being looked at.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LinkConfig;

/// `github.com/<owner>/<repo>` with optional scheme, `www.` and anything after the repo
static GITHUB_REPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([^/?#\s]+)/([^/?#\s]+)(?:[/?#].*)?$")
        .expect("static regex")
});

/// Separator between namespace and short name in extension point ids
const NAME_SEPARATOR: char = '.';

/// Extract `owner/repo` from a GitHub repository URL
pub fn owner_repo(source_url: &str) -> Option<String> {
    let caps = GITHUB_REPO.captures(source_url.trim())?;
    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if repo.is_empty() {
        return None;
    }

    Some(format!("{}/{}", owner, repo))
}

/// Last segment of a dotted extension point name
pub fn short_name(extension_point: &str) -> &str {
    extension_point
        .rsplit_once(NAME_SEPARATOR)
        .map(|(_, short)| short)
        .unwrap_or(extension_point)
}

/// Build the raw (unencoded) code search query
pub fn search_query(owner_repo: &str, extension_point: &str, path_globs: &[String]) -> String {
    let mut query = format!(
        "repo:{repo} {full} OR repo:{repo} {short}",
        repo = owner_repo,
        full = extension_point,
        short = short_name(extension_point),
    );

    if !path_globs.is_empty() {
        let paths: Vec<String> = path_globs.iter().map(|g| format!("path:{}", g)).collect();
        query.push_str(&format!(" AND ({})", paths.join(" OR ")));
    }

    query
}

/// Build a code search URL for `extension_point` inside the plugin's repository.
///
/// Returns `None` for source URLs not hosted on GitHub.
pub fn build_search_url(source_url: &str, extension_point: &str, config: &LinkConfig) -> Option<String> {
    let repo = owner_repo(source_url)?;
    let query = search_query(&repo, extension_point, &config.path_globs);

    // `:` and `/` are legal in a query component; keep `repo:owner/name` readable
    let encoded = urlencoding::encode(&query)
        .replace("%3A", ":")
        .replace("%2F", "/");

    Some(format!(
        "{}?q={}&type=code",
        config.search_base_url.trim_end_matches('/'),
        encoded
    ))
}
