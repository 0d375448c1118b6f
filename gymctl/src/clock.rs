//! Injectable time source.
//!
//! Every piece of date math in the enrollment lifecycle and the check-in
//! eligibility engine reads the current instant through [`Clock`], never
//! through `Utc::now()` directly. Production wires in [`SystemClock`]; tests
//! inject a fixed clock so window and quota decisions are deterministic.

use chrono::{DateTime, Utc};

/// Source of the current instant for all temporal decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
