//! In-memory history of completed runs.
//!
//! The download and preview endpoints are separate requests from the one that
//! ran the conversion, so finished outputs are kept here by run id. Capacity
//! is bounded; the oldest run is evicted first.

use crate::output::ConversionOutput;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct RunStore {
    capacity: usize,
    runs: Mutex<VecDeque<Arc<ConversionOutput>>>,
}

impl RunStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            runs: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Remember `output`, evicting the oldest run when full.
    pub fn insert(&self, output: Arc<ConversionOutput>) {
        let mut runs = match self.runs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while runs.len() >= self.capacity {
            if let Some(evicted) = runs.pop_front() {
                debug!("Evicting run {} from history", evicted.run_id);
            }
        }
        runs.push_back(output);
    }

    pub fn get(&self, run_id: &str) -> Option<Arc<ConversionOutput>> {
        let runs = match self.runs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        runs.iter().find(|r| r.run_id == run_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.runs.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
