//! Pipeline stages for one conversion run.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable and the orchestrator in [`crate::convert`] stays a short list of
//! calls.
//!
//! ## Data Flow
//!
//! ```text
//! file_key ──▶ workspace ──▶ invoke ──▶ collect ──▶ stats
//!  (URL)       (run dir)    (child)    (read back)  (<div count)
//!                                                      │
//!                                     preview ◀────────┘ (web layer)
//! ```
//!
//! 1. [`file_key`]: pull the file key out of the pasted URL
//! 2. [`workspace`]: allocate the run's output directory
//! 3. [`invoke`]: run the external converter with timeout and kill-on-drop;
//!    the only stage that spawns processes
//! 4. [`collect`]: read the markup and stylesheet, list the directory
//! 5. [`stats`]: display-only element count
//! 6. [`preview`]: inline the stylesheet for the live preview

pub mod collect;
pub mod file_key;
pub mod invoke;
pub mod preview;
pub mod stats;
pub mod workspace;
