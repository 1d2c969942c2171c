//! Path handles passed to rewrite rules.
//!
//! A rule receives a cursor over the statement it is visiting. Statements
//! either live in an ordered list (a block body, where siblings can be
//! read, consumed and inserted) or in a single slot (an `if` branch, a
//! loop body). Sibling edits on a single slot are rule-invariant
//! violations and panic.

use crate::analysis::Analysis;
use crate::ast::Stmt;

/// What a rule did to the node under its cursor.
///
/// Rules report edits back to the walker instead of re-entering it; the
/// walker applies the consequences (re-visit, cursor adjustment) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// No change.
    Clean,
    /// Narrow in-place edit; the subtree keeps its shape.
    Changed,
    /// The slot now holds a different node; re-visit it from the enter
    /// phase.
    Revisit,
    /// The current node was removed from its list; the cursor index now
    /// names its successor.
    Removed,
}

enum Slot<'t> {
    List {
        list: &'t mut Vec<Stmt>,
        index: &'t mut usize,
    },
    Single(&'t mut Stmt),
}

pub(crate) struct StmtPath<'t> {
    slot: Slot<'t>,
    /// The enclosing list is the direct body list of a function.
    pub in_function_list: bool,
    /// The statement sits in completion-tail position of the program body.
    pub completion_tail: bool,
}

impl<'t> StmtPath<'t> {
    pub(crate) fn list_slot(
        list: &'t mut Vec<Stmt>,
        index: &'t mut usize,
        in_function_list: bool,
        completion_tail: bool,
    ) -> Self {
        debug_assert!(*index < list.len());
        StmtPath {
            slot: Slot::List { list, index },
            in_function_list,
            completion_tail,
        }
    }

    pub(crate) fn single(slot: &'t mut Stmt, completion_tail: bool) -> Self {
        StmtPath {
            slot: Slot::Single(slot),
            in_function_list: false,
            completion_tail,
        }
    }

    pub(crate) fn current(&self) -> &Stmt {
        match &self.slot {
            Slot::List { list, index } => &list[**index],
            Slot::Single(stmt) => stmt,
        }
    }

    pub(crate) fn current_mut(&mut self) -> &mut Stmt {
        match &mut self.slot {
            Slot::List { list, index } => &mut list[**index],
            Slot::Single(stmt) => stmt,
        }
    }

    pub(crate) fn in_list(&self) -> bool {
        matches!(self.slot, Slot::List { .. })
    }

    /// Sibling at a relative offset; `None` is the out-of-range sentinel
    /// (and the only answer in a single slot).
    pub(crate) fn sibling(&self, offset: isize) -> Option<&Stmt> {
        let Slot::List { list, index } = &self.slot else {
            return None;
        };
        let target = (**index as isize).checked_add(offset)?;
        usize::try_from(target).ok().and_then(|i| list.get(i))
    }

    pub(crate) fn has_next(&self) -> bool {
        self.sibling(1).is_some()
    }

    /// The statement is the last of its list (trivially true in a single
    /// slot).
    pub(crate) fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Remove and return the next sibling.
    pub(crate) fn take_next(&mut self) -> Option<Stmt> {
        let Slot::List { list, index } = &mut self.slot else {
            return None;
        };
        if **index + 1 < list.len() {
            Some(list.remove(**index + 1))
        } else {
            None
        }
    }

    /// Remove and return the previous sibling; the cursor shifts down with
    /// the current node.
    pub(crate) fn take_prev(&mut self) -> Option<Stmt> {
        let Slot::List { list, index } = &mut self.slot else {
            return None;
        };
        if **index == 0 {
            return None;
        }
        **index -= 1;
        Some(list.remove(**index))
    }

    /// Remove and return all following siblings.
    pub(crate) fn split_off_rest(&mut self) -> Vec<Stmt> {
        let Slot::List { list, index } = &mut self.slot else {
            return Vec::new();
        };
        list.split_off(**index + 1)
    }

    /// Remove the current node from its list. Calling this on a single
    /// slot is a programmer error.
    pub(crate) fn remove(&mut self) -> Stmt {
        let Slot::List { list, index } = &mut self.slot else {
            panic!("cannot remove a statement that is not in a list");
        };
        list.remove(**index)
    }

    /// Insert statements immediately after the current node; the walker
    /// visits them as the traversal advances.
    pub(crate) fn insert_after(&mut self, stmts: Vec<Stmt>) {
        let Slot::List { list, index } = &mut self.slot else {
            panic!("cannot insert siblings around a statement that is not in a list");
        };
        let at = **index + 1;
        list.splice(at..at, stmts);
    }

    /// Whether the value of this statement may be observed by the
    /// enclosing construct. Delegates the top-level policy to the
    /// analyzer; function bodies never observe completions (values flow
    /// through `return`).
    pub(crate) fn is_completion_record(&self, analysis: &dyn Analysis) -> bool {
        self.completion_tail && analysis.observes_program_completion()
    }
}
