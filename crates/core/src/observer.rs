//! Injected logging capability for the extraction pass.
//!
//! The engine never talks to a global logger directly; callers hand it a
//! `ParseObserver`. Parse warnings are diagnostics only and never abort a
//! load.

use tracing::{info, warn};

pub trait ParseObserver {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Default observer forwarding to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warning(&self, message: &str) {
        warn!("{message}");
    }
}
