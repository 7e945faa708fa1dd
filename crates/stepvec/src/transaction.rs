//! Scoped transaction guard

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::collection::StepVec;
use crate::error::StepVecError;

/// A scoped transaction over a [`StepVec`]
///
/// Created by [`StepVec::transaction`]. Mutations issued through the guard
/// batch into one atomic undo unit. Dropping the guard commits on every exit
/// path, including early returns and panics, so a transaction is never left
/// open. The guard borrows the collection mutably, which also makes nested
/// transactions impossible to express.
///
/// ```
/// use stepvec::StepVec;
///
/// let mut sv = StepVec::new();
/// {
///     let mut tx = sv.transaction().unwrap();
///     tx.push_back(1);
///     tx.push_back(2);
/// }
/// assert_eq!(sv.len(), 2);
/// assert!(sv.undo());
/// assert!(sv.is_empty());
/// ```
#[derive(Debug)]
pub struct Transaction<'a, T> {
    vec: &'a mut StepVec<T>,
    committed: bool,
}

impl<'a, T> Transaction<'a, T> {
    pub(crate) fn new(vec: &'a mut StepVec<T>) -> Self {
        Transaction {
            vec,
            committed: false,
        }
    }

    /// Commit the transaction explicitly, surfacing any error
    ///
    /// Equivalent to dropping the guard, except the result of
    /// `end_transaction` is returned instead of discarded.
    pub fn commit(mut self) -> Result<(), StepVecError> {
        self.committed = true;
        self.vec.end_transaction()
    }
}

impl<T> Deref for Transaction<'_, T> {
    type Target = StepVec<T>;

    fn deref(&self) -> &StepVec<T> {
        self.vec
    }
}

impl<T> DerefMut for Transaction<'_, T> {
    fn deref_mut(&mut self) -> &mut StepVec<T> {
        self.vec
    }
}

impl<T> Drop for Transaction<'_, T> {
    fn drop(&mut self) {
        if !self.committed {
            // The transaction is known to be open; the only way this fails
            // is a caller closing it through the guard, which the borrow
            // prevents.
            if self.vec.end_transaction().is_err() {
                debug!("transaction already closed at guard drop");
            }
        }
    }
}
