//! Human-readable output and alerting for a finished run.

use crate::reconciler::ReconciliationResult;
use crate::syslog::AlertSink;
use crate::zone::{Delta, Zone};
use std::io::{self, Write};

/// Printed and sent to the alert sink when a run does not converge.
pub const DRIFT_MESSAGE: &str =
    "unbound-forwards: There is a difference between file and live config! This should not happen!";

/// Consumes the result of a run.
///
/// Reporting never fails: output errors are logged and dropped so they
/// cannot hide or change the reconciliation outcome.
pub trait Reporter {
    fn report(&mut self, result: &ReconciliationResult);
}

/// Writes a summary to a console and raises drift as a critical alert.
pub struct ConsoleReporter<W, A> {
    out: W,
    alert: A,
    interactive: bool,
}

impl<W: Write, A: AlertSink> ConsoleReporter<W, A> {
    /// `interactive` enables the added/removed listing; drift is always
    /// reported.
    pub const fn new(out: W, alert: A, interactive: bool) -> Self {
        Self {
            out,
            alert,
            interactive,
        }
    }

    /// Consumes the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_result(&mut self, result: &ReconciliationResult) -> io::Result<()> {
        if !result.converged {
            writeln!(self.out, "{DRIFT_MESSAGE}")?;
        }
        if !self.interactive {
            return Ok(());
        }

        if !result.added.is_empty() {
            write_zones(&mut self.out, "Added:", &result.added)?;
        }
        if !result.removed.is_empty() {
            writeln!(self.out)?;
            write_zones(&mut self.out, "Removed:", &result.removed)?;
        }
        Ok(())
    }
}

impl<W: Write, A: AlertSink> Reporter for ConsoleReporter<W, A> {
    fn report(&mut self, result: &ReconciliationResult) {
        if !result.converged {
            self.alert.critical(DRIFT_MESSAGE);
        }
        if let Err(e) = self.write_result(result).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write reconciliation summary");
        }
    }
}

fn write_zones(out: &mut impl Write, heading: &str, zones: &[Zone]) -> io::Result<()> {
    writeln!(out, "{heading}")?;
    for zone in zones {
        writeln!(out, "  {zone}")?;
    }
    Ok(())
}

/// Writes a dry-run plan as `+ name address` / `- name address` lines.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_plan(out: &mut impl Write, delta: &Delta) -> io::Result<()> {
    for zone in &delta.to_remove {
        writeln!(out, "- {zone}")?;
    }
    for zone in &delta.to_add {
        writeln!(out, "+ {zone}")?;
    }
    Ok(())
}
