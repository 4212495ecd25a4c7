//! # unbound-forwards
//!
//! Synchronize Unbound forward zones with their config files without
//! reloading Unbound.
//!
//! Reloading Unbound drops its cache. This crate instead compares the
//! `forward-zone:` stanzas in one or more config files with the live table
//! reported by `unbound-control list_forwards`, and applies only the
//! difference through `forward_remove` and `forward_add`.
//!
//! It assumes every zone looks like this and has a single IPv4 target:
//!
//! ```text
//! forward-zone:
//!    name: "domain.com"
//!    forward-addr: 192.0.2.1
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use unbound_forwards::{Reconciler, UnboundControl};
//!
//! let reconciler = Reconciler::new(
//!     UnboundControl::new("/usr/sbin/unbound-control"),
//!     ["/etc/unbound/conf.d/malwarezones.conf"],
//! );
//!
//! let result = reconciler.reconcile()?;
//! if !result.converged {
//!     // unbound-control accepted a change but did not apply it.
//! }
//! ```
//!
//! ## Verification
//!
//! Every run re-reads the live table after applying changes. A difference
//! that survives the apply pass is reported as drift rather than retried,
//! so a misbehaving control interface cannot make a run loop.
//!
//! ## Permissions
//!
//! `unbound-control` needs access to the control socket and its keys,
//! which usually means running as root or the `unbound` user.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod control;
pub mod error;
pub mod file_zones;
pub mod reconciler;
pub mod report;
pub mod syslog;
pub mod zone;

pub use config::ForwardsConfig;
pub use control::{Control, ControlOutput, UnboundControl, live_zones, parse_live};
pub use error::{ForwardError, Result};
pub use file_zones::{parse_config, read_sources};
pub use reconciler::{ReconciliationResult, Reconciler};
pub use report::{ConsoleReporter, DRIFT_MESSAGE, Reporter, write_plan};
pub use syslog::{AlertSink, SyslogAlert};
pub use zone::{Delta, Zone, ZoneSet, diff};
