//! Clock port: the only source of "now" for scan runs.

use chrono::{DateTime, Utc};

/// `strftime` layout of the audit-log prefix, e.g. `20230908_1001AM`.
pub const AUDIT_STAMP_FORMAT: &str = "%Y%m%d_%I%M%p";

/// Tells the time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Current time rendered with [`AUDIT_STAMP_FORMAT`], naming a run's
    /// audit log. Reads the clock once.
    fn audit_stamp(&self) -> String {
        self.now().format(AUDIT_STAMP_FORMAT).to_string()
    }
}
