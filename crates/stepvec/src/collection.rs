//! The public container: sequence reads, recorded mutations, and undo/redo
//! navigation

use std::ops::Index;
use std::slice;

use tracing::{debug, info};

use crate::error::StepVecError;
use crate::group::StepGroup;
use crate::history::{History, Record};
use crate::step::Step;
use crate::transaction::Transaction;

/// An ordered collection that records every structural mutation as a
/// reversible step
///
/// Reads always reflect the current, post-undo/redo state. Every mutating
/// call creates exactly one step; steps issued between
/// [`begin_transaction`](StepVec::begin_transaction) and
/// [`end_transaction`](StepVec::end_transaction) are grouped into one atomic
/// undo unit.
///
/// The collection owns its storage slots and its history, never the
/// resources element handles may refer to. Elements that fall out of reach
/// permanently (branch truncation, teardown) are surfaced through
/// [`drain_discarded`](StepVec::drain_discarded) and
/// [`into_elements`](StepVec::into_elements) so the caller can release them.
#[derive(Debug)]
pub struct StepVec<T> {
    data: Vec<T>,
    history: History<T>,
    open_group: Option<StepGroup<T>>,
}

impl<T> StepVec<T> {
    /// Create a new, empty collection
    pub fn new() -> Self {
        StepVec {
            data: Vec::new(),
            history: History::new(),
            open_group: None,
        }
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the collection holds no live elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the element at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Iterate over the live elements in sequence order
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Append `element` and record an undoable Add step
    pub fn push_back(&mut self, element: T) {
        let step = Step::apply_add(&mut self.data, element);
        debug!(index = step.index(), "push_back");
        self.commit(step);
    }

    /// Remove the element at `index` and record an undoable Remove step
    ///
    /// Fails with `OutOfRange` before any mutation if `index` is not a live
    /// position.
    pub fn erase(&mut self, index: usize) -> Result<(), StepVecError> {
        let step = Step::apply_remove(&mut self.data, index)?;
        debug!(index, "erase");
        self.commit(step);
        Ok(())
    }

    /// Replace the element at `index` with `element` and record an undoable
    /// Update step
    ///
    /// Fails with `OutOfRange` before any mutation if `index` is not a live
    /// position.
    pub fn update(&mut self, index: usize, element: T) -> Result<(), StepVecError> {
        let step = Step::apply_update(&mut self.data, index, element)?;
        debug!(index, "update");
        self.commit(step);
        Ok(())
    }

    /// Erase every element as one composite undoable action
    ///
    /// Elements are erased last-to-first so each child step records a stable
    /// index. An empty collection records nothing. Fails with
    /// `InvalidTransactionState` inside an open transaction.
    pub fn clear(&mut self) -> Result<(), StepVecError> {
        if self.open_group.is_some() {
            return Err(StepVecError::invalid_transaction(
                "clear cannot run inside an open transaction",
            ));
        }
        if self.data.is_empty() {
            return Ok(());
        }
        let mut group = StepGroup::new();
        while !self.data.is_empty() {
            let index = self.data.len() - 1;
            let step = Step::apply_remove(&mut self.data, index)?;
            group.push(step);
        }
        info!(steps = group.len(), "collection cleared");
        self.history.record(Record::Group(group));
        Ok(())
    }

    /// Undo the most recent top-level step; false when nothing is undoable
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.data)
    }

    /// Redo the most recently undone step; false when nothing is redoable
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.data)
    }

    /// Whether an undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Read access to the history log for inspection
    pub fn history(&self) -> &History<T> {
        &self.history
    }

    /// Open a transaction: subsequent mutations batch into one atomic undo
    /// unit until [`end_transaction`](StepVec::end_transaction)
    ///
    /// Fails with `InvalidTransactionState` if a transaction is already
    /// open; transactions do not nest.
    pub fn begin_transaction(&mut self) -> Result<(), StepVecError> {
        if self.open_group.is_some() {
            return Err(StepVecError::invalid_transaction(
                "a transaction is already open",
            ));
        }
        debug!("transaction opened");
        self.open_group = Some(StepGroup::new());
        Ok(())
    }

    /// Close the open transaction, recording it as one step
    ///
    /// A transaction that recorded no steps is discarded and never enters
    /// history. Fails with `InvalidTransactionState` if no transaction is
    /// open.
    pub fn end_transaction(&mut self) -> Result<(), StepVecError> {
        let group = self.open_group.take().ok_or_else(|| {
            StepVecError::invalid_transaction("no transaction is open")
        })?;
        if group.is_empty() {
            debug!("empty transaction discarded");
        } else {
            debug!(steps = group.len(), "transaction committed");
            self.history.record(Record::Group(group));
        }
        Ok(())
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.open_group.is_some()
    }

    /// Open a transaction through a scoped guard that commits on every exit
    /// path
    pub fn transaction(&mut self) -> Result<Transaction<'_, T>, StepVecError> {
        self.begin_transaction()?;
        Ok(Transaction::new(self))
    }

    /// Drain every element orphaned by branch truncation
    ///
    /// Callers that store non-owning handles poll this after mutations to
    /// release resources whose handles survived only inside discarded steps.
    pub fn drain_discarded(&mut self) -> Vec<T> {
        self.history.drain_orphaned()
    }

    /// Consume the collection and return every element it still references:
    /// the live sequence, values held inside history steps, any open
    /// transaction, and the orphan bin
    pub fn into_elements(mut self) -> Vec<T> {
        let mut elements = self.data;
        if let Some(group) = self.open_group.take() {
            elements.extend(group.into_elements());
        }
        elements.extend(self.history.into_elements());
        elements
    }

    // Routing rule: an open transaction captures the step, otherwise it is
    // recorded directly as a standalone history entry.
    fn commit(&mut self, step: Step<T>) {
        match self.open_group.as_mut() {
            Some(group) => group.push(step),
            None => self.history.record(Record::Single(step)),
        }
    }
}

impl<T> Default for StepVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for StepVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<'a, T> IntoIterator for &'a StepVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<'a>(sv: &StepVec<&'a str>) -> Vec<&'a str> {
        sv.iter().copied().collect()
    }

    #[test]
    fn test_push_back_and_reads() {
        let mut sv = StepVec::new();
        assert!(sv.is_empty());
        sv.push_back("a");
        sv.push_back("b");
        assert_eq!(sv.len(), 2);
        assert_eq!(sv[0], "a");
        assert_eq!(sv.get(1), Some(&"b"));
        assert_eq!(sv.get(2), None);
        assert_eq!(collect(&sv), vec!["a", "b"]);
    }

    #[test]
    fn test_erase_and_undo() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.push_back("b");
        sv.erase(0).unwrap();
        assert_eq!(collect(&sv), vec!["b"]);
        assert!(sv.undo());
        assert_eq!(collect(&sv), vec!["a", "b"]);
    }

    #[test]
    fn test_update_and_undo() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.update(0, "x").unwrap();
        assert_eq!(collect(&sv), vec!["x"]);
        assert!(sv.undo());
        assert_eq!(collect(&sv), vec!["a"]);
        assert!(sv.redo());
        assert_eq!(collect(&sv), vec!["x"]);
    }

    #[test]
    fn test_erase_out_of_range_leaves_state_unchanged() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        let err = sv.erase(5).unwrap_err();
        assert_eq!(err, StepVecError::out_of_range(5, 1));
        assert_eq!(collect(&sv), vec!["a"]);
        assert_eq!(sv.history().len(), 1);
    }

    #[test]
    fn test_update_out_of_range_leaves_state_unchanged() {
        let mut sv: StepVec<&str> = StepVec::new();
        let err = sv.update(0, "x").unwrap_err();
        assert_eq!(err, StepVecError::out_of_range(0, 0));
        assert!(sv.is_empty());
        assert!(!sv.can_undo());
    }

    #[test]
    fn test_undo_redo_exhaustion_is_boolean() {
        let mut sv: StepVec<&str> = StepVec::new();
        assert!(!sv.undo());
        assert!(!sv.redo());
        sv.push_back("a");
        assert!(sv.undo());
        assert!(!sv.undo());
        assert!(sv.redo());
        assert!(!sv.redo());
    }

    #[test]
    fn test_transaction_batches_mutations_into_one_step() {
        let mut sv = StepVec::new();
        sv.push_back("a");

        sv.begin_transaction().unwrap();
        sv.push_back("b");
        sv.push_back("c");
        sv.erase(0).unwrap();
        sv.end_transaction().unwrap();

        assert_eq!(collect(&sv), vec!["b", "c"]);
        assert_eq!(sv.history().len(), 2);

        assert!(sv.undo());
        assert_eq!(collect(&sv), vec!["a"]);
        assert!(sv.redo());
        assert_eq!(collect(&sv), vec!["b", "c"]);
    }

    #[test]
    fn test_nested_transaction_rejected() {
        let mut sv: StepVec<&str> = StepVec::new();
        sv.begin_transaction().unwrap();
        assert!(matches!(
            sv.begin_transaction(),
            Err(StepVecError::InvalidTransactionState(_))
        ));
        assert!(sv.in_transaction());
        sv.end_transaction().unwrap();
        assert!(!sv.in_transaction());
    }

    #[test]
    fn test_unmatched_end_transaction_rejected() {
        let mut sv: StepVec<&str> = StepVec::new();
        assert!(matches!(
            sv.end_transaction(),
            Err(StepVecError::InvalidTransactionState(_))
        ));
    }

    #[test]
    fn test_empty_transaction_is_discarded() {
        let mut sv: StepVec<&str> = StepVec::new();
        sv.push_back("a");
        sv.begin_transaction().unwrap();
        sv.end_transaction().unwrap();
        assert_eq!(sv.history().len(), 1);
        assert!(sv.can_undo());
        assert!(!sv.can_redo());
    }

    #[test]
    fn test_clear_is_one_undo_step() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.push_back("b");
        sv.push_back("c");
        sv.clear().unwrap();
        assert!(sv.is_empty());
        assert_eq!(sv.history().len(), 4);

        assert!(sv.undo());
        assert_eq!(collect(&sv), vec!["a", "b", "c"]);
        assert!(sv.redo());
        assert!(sv.is_empty());
    }

    #[test]
    fn test_clear_on_empty_collection_records_nothing() {
        let mut sv: StepVec<&str> = StepVec::new();
        sv.clear().unwrap();
        assert!(sv.history().is_empty());
        assert!(!sv.can_undo());
    }

    #[test]
    fn test_clear_inside_transaction_rejected() {
        let mut sv: StepVec<&str> = StepVec::new();
        sv.push_back("a");
        sv.begin_transaction().unwrap();
        assert!(matches!(
            sv.clear(),
            Err(StepVecError::InvalidTransactionState(_))
        ));
        sv.end_transaction().unwrap();
        assert_eq!(collect(&sv), vec!["a"]);
    }

    #[test]
    fn test_new_mutation_after_undo_discards_future() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.push_back("b");
        sv.undo();
        assert!(sv.can_redo());

        sv.push_back("c");
        assert!(!sv.can_redo());
        assert_eq!(collect(&sv), vec!["a", "c"]);
        assert!(!sv.redo());
        assert_eq!(collect(&sv), vec!["a", "c"]);
    }

    #[test]
    fn test_drain_discarded_surfaces_orphans() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.push_back("b");
        sv.undo();
        sv.push_back("c");

        assert_eq!(sv.drain_discarded(), vec!["b"]);
        assert!(sv.drain_discarded().is_empty());
    }

    #[test]
    fn test_into_elements_returns_live_and_history_held() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.push_back("b");
        sv.erase(0).unwrap();
        sv.update(0, "x").unwrap();
        // live: ["x"]; history holds "a" (Remove) and "b" (Update previous)

        let mut elements = sv.into_elements();
        elements.sort();
        assert_eq!(elements, vec!["a", "b", "x"]);
    }

    #[test]
    fn test_into_elements_includes_open_transaction() {
        let mut sv = StepVec::new();
        sv.push_back("a");
        sv.begin_transaction().unwrap();
        sv.erase(0).unwrap();

        let elements = sv.into_elements();
        assert_eq!(elements, vec!["a"]);
    }
}
