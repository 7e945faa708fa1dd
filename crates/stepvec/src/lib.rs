#![warn(missing_docs)]

//! Ordered collection with reversible mutation history
//!
//! `StepVec<T>` records every structural mutation (append, remove, replace)
//! as a reversible step and exposes linear undo/redo navigation over the
//! history of those steps, including atomic grouping of several mutations
//! into one undoable transaction.
//!
//! ```
//! use stepvec::StepVec;
//!
//! let mut sv = StepVec::new();
//! sv.push_back("a");
//! sv.push_back("b");
//! sv.erase(0).unwrap();
//! assert_eq!(sv.iter().copied().collect::<Vec<_>>(), vec!["b"]);
//!
//! sv.undo();
//! assert_eq!(sv.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
//! sv.redo();
//! assert_eq!(sv.iter().copied().collect::<Vec<_>>(), vec!["b"]);
//! ```

pub mod collection;
pub mod error;
pub mod group;
pub mod history;
pub mod step;
pub mod transaction;

// Re-export public API
pub use collection::StepVec;
pub use error::StepVecError;
pub use group::StepGroup;
pub use history::{History, HistoryEntry};
pub use step::{Step, StepKind};
pub use transaction::Transaction;
