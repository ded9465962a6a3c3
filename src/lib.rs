#![doc(test(attr(deny(warnings))))]

//! Period Core slices a family's continuous financial timeline into discrete
//! accounting windows, reconciles mid-stream configuration changes, and carries
//! recurring budget data forward from one window to the next.

pub mod domain;
pub mod engine;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Period Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
