//! Multi-step chores composed from the catalog and the work item client.
//!
//! Every remote call is awaited before the next one is issued, so batch
//! operations hit the server strictly in catalog or child-list order.

pub mod cleanup;
pub mod removal;
pub mod tasks;

use tracing::debug;

use crate::error::ChoresError;

#[derive(Debug)]
pub struct Failure {
    pub item: String,
    pub error: ChoresError,
}

/// Outcome of a batch where each item succeeds or fails on its own.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<u64>,
    pub failed: Vec<Failure>,
}

impl BatchReport {
    pub fn record_success(&mut self, id: u64) {
        self.succeeded.push(id);
    }

    pub fn record_failure(&mut self, item: impl Into<String>, error: ChoresError) {
        let item = item.into();
        debug!("{item}: {error}");
        self.failed.push(Failure { item, error });
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
