//! Desired forward zones from Unbound config files.
//!
//! Only `name:` and `forward-addr:` lines are significant. Each `name:` is
//! assumed to be followed by exactly one `forward-addr:`:
//!
//! ```text
//! forward-zone:
//!    name: "domain.com"
//!    forward-addr: 192.0.2.1
//! ```
//!
//! Values are paired positionally, so a zone with several `forward-addr:`
//! lines will misalign every zone after it in the same file.

use crate::error::{ForwardError, Result};
use crate::zone::{Zone, ZoneSet};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(name:|forward-addr:)").expect("selector regex is valid"));

/// Reads every source and merges the zones they declare.
///
/// # Errors
///
/// Returns [`ForwardError::ConfigParse`] for the first source that cannot be
/// read. Nothing is returned for the sources read before it.
pub fn read_sources<P: AsRef<Path>>(sources: &[P]) -> Result<ZoneSet> {
    let mut zones = Vec::new();
    for source in sources {
        let path = source.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ForwardError::ConfigParse {
            path: PathBuf::from(path),
            source: e,
        })?;
        let parsed = parse_config(&text);
        tracing::debug!(path = %path.display(), zones = parsed.len(), "Read config source");
        zones.extend(parsed);
    }
    Ok(zones.into_iter().collect())
}

/// Parses the text of one config file.
#[must_use]
pub fn parse_config(text: &str) -> ZoneSet {
    let values: Vec<String> = text.lines().filter_map(select_value).collect();

    let mut pairs = values.chunks_exact(2);
    let zones = pairs
        .by_ref()
        .map(|p| Zone::new(p[0].as_str(), p[1].as_str()))
        .collect();

    if let [dangling] = pairs.remainder() {
        tracing::warn!(value = %dangling, "Dropping unpaired forward-zone value");
    }
    zones
}

/// Returns the value of a `name:` or `forward-addr:` line.
fn select_value(line: &str) -> Option<String> {
    let line = line.trim().replace('"', "");
    if !SELECTOR.is_match(&line) {
        return None;
    }

    let value = line.split_whitespace().nth(1).map(str::to_owned);
    if value.is_none() {
        tracing::warn!(line = %line, "Skipping forward-zone line without a value");
    }
    value
}
