//! Run configuration.

use std::path::PathBuf;

/// Config file scanned when no sources are given.
pub const DEFAULT_SOURCE: &str = "/etc/unbound/conf.d/malwarezones.conf";

/// Control executable used when none is given.
pub const DEFAULT_CONTROL: &str = "/usr/sbin/unbound-control";

/// Where to find the desired zones and how to reach the live resolver.
///
/// # Example
///
/// ```
/// use unbound_forwards::ForwardsConfig;
///
/// let config = ForwardsConfig::default()
///     .with_sources(["/etc/unbound/forwards.conf"])
///     .with_control("/usr/local/sbin/unbound-control");
///
/// assert_eq!(config.sources.len(), 1);
/// assert_eq!(config.control.to_str(), Some("/usr/local/sbin/unbound-control"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardsConfig {
    /// Config files holding `forward-zone:` stanzas.
    pub sources: Vec<PathBuf>,

    /// Path to `unbound-control`.
    pub control: PathBuf,
}

impl ForwardsConfig {
    /// Replaces the source list.
    #[must_use]
    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the control executable.
    #[must_use]
    pub fn with_control(mut self, control: impl Into<PathBuf>) -> Self {
        self.control = control.into();
        self
    }
}

impl Default for ForwardsConfig {
    fn default() -> Self {
        Self {
            sources: vec![PathBuf::from(DEFAULT_SOURCE)],
            control: PathBuf::from(DEFAULT_CONTROL),
        }
    }
}
