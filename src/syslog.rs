//! Critical alerts through the system log.

use std::ffi::CString;

/// Facility for alerts; the default for user processes.
const FACILITY: libc::c_int = libc::LOG_USER;

/// Destination for critical alerts.
pub trait AlertSink {
    /// Records `message` at critical severity. Must not fail the caller.
    fn critical(&self, message: &str);
}

/// [`AlertSink`] that writes to `syslog(3)` under the `LOG_USER` facility.
#[derive(Debug, Clone)]
pub struct SyslogAlert {
    ident: CString,
}

impl SyslogAlert {
    /// Creates a sink tagging messages with `ident`.
    ///
    /// Interior NUL bytes are dropped from `ident`.
    #[must_use]
    pub fn new(ident: &str) -> Self {
        Self {
            ident: to_cstring(ident),
        }
    }
}

impl AlertSink for SyslogAlert {
    fn critical(&self, message: &str) {
        let message = to_cstring(message);
        // SAFETY: `ident` outlives the openlog/closelog pair, and the format
        // string is a literal `%s` with one matching C-string argument.
        unsafe {
            libc::openlog(self.ident.as_ptr(), libc::LOG_PID, FACILITY);
            libc::syslog(libc::LOG_CRIT, c"%s".as_ptr(), message.as_ptr());
            libc::closelog();
        }
    }
}

fn to_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}
