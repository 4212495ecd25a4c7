//! Plan, apply and verify one reconciliation pass.

use crate::control::{Control, live_zones};
use crate::error::{ForwardError, Result};
use crate::file_zones::read_sources;
use crate::zone::{Delta, Zone, ZoneSet, diff};
use std::path::PathBuf;

/// Outcome of [`Reconciler::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Zones passed to `forward_add`, in the order they were sent.
    pub added: Vec<Zone>,

    /// Zones passed to `forward_remove`, in the order they were sent.
    pub removed: Vec<Zone>,

    /// Delta left after the apply pass. Empty when converged.
    pub residual: Delta,

    /// `true` when the live set matched the config on re-read.
    pub converged: bool,
}

impl ReconciliationResult {
    /// Turns drift into [`ForwardError::Drift`].
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Drift`] if the run did not converge.
    pub fn ensure_converged(&self) -> Result<()> {
        if self.converged {
            return Ok(());
        }
        Err(ForwardError::Drift {
            missing: self.residual.to_add.len(),
            unexpected: self.residual.to_remove.len(),
        })
    }
}

/// Brings the resolver's forward zones in line with the config files.
///
/// Runs are stateless: every call re-reads both sides.
///
/// # Example
///
/// ```rust,ignore
/// use unbound_forwards::{Reconciler, UnboundControl};
///
/// let control = UnboundControl::new("/usr/sbin/unbound-control");
/// let result = Reconciler::new(control, ["/etc/unbound/conf.d/forwards.conf"]).reconcile()?;
/// assert!(result.converged);
/// ```
pub struct Reconciler<C> {
    control: C,
    sources: Vec<PathBuf>,
}

impl<C: Control> Reconciler<C> {
    pub fn new<I, P>(control: C, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            control,
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the control client.
    pub const fn control(&self) -> &C {
        &self.control
    }

    /// Reads the config files.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::ConfigParse`] if a source cannot be read.
    pub fn desired(&self) -> Result<ZoneSet> {
        read_sources(self.sources.as_slice())
    }

    /// Computes the delta without touching the resolver.
    ///
    /// # Errors
    ///
    /// Fails if the config or the live state cannot be read.
    pub fn plan(&self) -> Result<Delta> {
        let desired = self.desired()?;
        let actual = live_zones(&self.control)?;
        Ok(diff(&desired, &actual))
    }

    /// Applies the delta once and checks that the resolver converged.
    ///
    /// Individual `forward_add`/`forward_remove` outcomes are not checked;
    /// a rejected change shows up as a non-empty residual delta instead.
    /// There is no retry.
    ///
    /// # Errors
    ///
    /// - [`ForwardError::ConfigParse`] before anything is changed.
    /// - [`ForwardError::ControlUnavailable`] if `unbound-control` cannot be
    ///   started at any point.
    /// - [`ForwardError::ControlReported`] if either `list_forwards` call
    ///   writes to stderr. Changes already applied are kept.
    pub fn reconcile(&self) -> Result<ReconciliationResult> {
        let desired = self.desired()?;
        let actual = live_zones(&self.control)?;
        let delta = diff(&desired, &actual);
        tracing::debug!(
            desired = desired.len(),
            live = actual.len(),
            to_add = delta.to_add.len(),
            to_remove = delta.to_remove.len(),
            "Planned forward-zone changes"
        );

        // Removals go first: `forward_remove` works by name, so removing after
        // an address-change add would drop the zone just added.
        let mut removed = Vec::with_capacity(delta.to_remove.len());
        for zone in delta.to_remove {
            self.control.forward_remove(&zone.name)?;
            tracing::info!(zone = %zone.name, address = %zone.address, "Removed forward zone");
            removed.push(zone);
        }

        let mut added = Vec::with_capacity(delta.to_add.len());
        for zone in delta.to_add {
            self.control.forward_add(&zone)?;
            tracing::info!(zone = %zone.name, address = %zone.address, "Added forward zone");
            added.push(zone);
        }

        let residual = diff(&desired, &live_zones(&self.control)?);
        let converged = residual.is_empty();
        if !converged {
            tracing::error!(
                missing = residual.to_add.len(),
                unexpected = residual.to_remove.len(),
                "Live forward zones differ from config after apply"
            );
        }

        Ok(ReconciliationResult {
            added,
            removed,
            residual,
            converged,
        })
    }
}
