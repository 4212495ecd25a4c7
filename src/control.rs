//! Access to the live resolver through `unbound-control`.
//!
//! [`Control`] is the seam between the reconciler and the resolver process.
//! [`UnboundControl`] shells out to the real executable; tests substitute an
//! in-memory implementation.

use crate::error::{ForwardError, Result};
use crate::zone::{Zone, ZoneSet};
use regex::Regex;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// Matches `list_forwards` lines that describe a forward zone, root included.
static VALIDATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S*\. IN forward ").expect("validator regex is valid"));

/// Captured output of a control command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Commands the reconciler needs from the resolver.
pub trait Control {
    /// Runs `list_forwards` and returns its raw output.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::ControlUnavailable`] if the command cannot be
    /// started. A non-empty `stderr` is not an error at this level.
    fn list_forwards(&self) -> Result<ControlOutput>;

    /// Runs `forward_add <name> <address>`.
    ///
    /// The command's own success is not reported.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::ControlUnavailable`] if the command cannot be
    /// started.
    fn forward_add(&self, zone: &Zone) -> Result<()>;

    /// Runs `forward_remove <name>`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::ControlUnavailable`] if the command cannot be
    /// started.
    fn forward_remove(&self, name: &str) -> Result<()>;
}

/// [`Control`] backed by the `unbound-control` executable.
#[derive(Debug, Clone)]
pub struct UnboundControl {
    program: PathBuf,
}

impl UnboundControl {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn unavailable(&self, source: std::io::Error) -> ForwardError {
        ForwardError::ControlUnavailable {
            program: self.program.clone(),
            source,
        }
    }

    /// Runs a mutating command, discarding its output.
    fn run_quiet(&self, args: &[&str]) -> Result<()> {
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.unavailable(e))?;
        tracing::debug!(command = ?args, %status, "Control command finished");
        Ok(())
    }
}

impl Control for UnboundControl {
    fn list_forwards(&self) -> Result<ControlOutput> {
        let output = Command::new(&self.program)
            .arg("list_forwards")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.unavailable(e))?;
        Ok(ControlOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn forward_add(&self, zone: &Zone) -> Result<()> {
        self.run_quiet(&["forward_add", &zone.name, &zone.address])
    }

    fn forward_remove(&self, name: &str) -> Result<()> {
        self.run_quiet(&["forward_remove", name])
    }
}

/// Reads the resolver's current forward zones.
///
/// All or nothing: any output on the error stream fails the whole read.
///
/// # Errors
///
/// Returns [`ForwardError::ControlUnavailable`] if `list_forwards` cannot be
/// run, or [`ForwardError::ControlReported`] if it wrote to stderr.
pub fn live_zones(control: &impl Control) -> Result<ZoneSet> {
    let output = control.list_forwards()?;
    if !output.stderr.is_empty() {
        for line in output.stderr.lines() {
            tracing::error!(line = %line, "unbound-control list_forwards");
        }
        return Err(ForwardError::ControlReported {
            command: "list_forwards".to_string(),
            stderr: output.stderr.trim_end().to_string(),
        });
    }
    Ok(parse_live(&output.stdout))
}

/// Parses `list_forwards` output, ignoring lines that are not zone records.
#[must_use]
pub fn parse_live(stdout: &str) -> ZoneSet {
    stdout.lines().filter_map(parse_live_line).collect()
}

/// Parses `example.com. IN forward [extra] 192.0.2.1 ...`.
fn parse_live_line(line: &str) -> Option<Zone> {
    if !VALIDATOR.is_match(line) {
        return None;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let name = fields.first()?;
    let address = fields
        .iter()
        .skip(3)
        .find(|f| f.parse::<Ipv4Addr>().is_ok());

    match address {
        Some(address) => Some(Zone::new(*name, *address)),
        None => {
            tracing::debug!(line = %line, "Forward record has no IPv4 target, ignoring");
            None
        }
    }
}
