//! Sort-order state machine for header clicks.
//!
//! A column's direction advances one step per click and falls off the list
//! at the end of its cycle:
//! - without column pivots: `desc → asc → removed`
//! - with column pivots: `desc → asc → col desc → col asc → removed`
//!
//! This module only computes the next sort list; dispatching it to the view
//! engine is the caller's job.

use crate::types::{SortDir, SortList, SortTerm, ViewConfig};

/// How a header click combines with the existing sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Plain click: the clicked column becomes the only sort term.
    Replace,
    /// Shift-click: update the clicked column in place or append it.
    Append,
}

/// Which direction cycle applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCycle {
    Rows,
    RowsAndColumns,
}

impl SortCycle {
    pub fn for_config(config: &ViewConfig) -> Self {
        if config.has_column_pivots() {
            Self::RowsAndColumns
        } else {
            Self::Rows
        }
    }

    /// Direction after one more click; `None` removes the term.
    pub fn next(self, current: Option<SortDir>) -> Option<SortDir> {
        match (self, current) {
            (_, None) => Some(SortDir::Desc),
            (_, Some(SortDir::Desc)) => Some(SortDir::Asc),
            (Self::RowsAndColumns, Some(SortDir::Asc)) => Some(SortDir::ColDesc),
            (Self::RowsAndColumns, Some(SortDir::ColDesc)) => Some(SortDir::ColAsc),
            (Self::Rows, Some(SortDir::Asc | SortDir::ColDesc | SortDir::ColAsc))
            | (Self::RowsAndColumns, Some(SortDir::ColAsc)) => None,
        }
    }
}

/// Sort list after clicking `column`.
pub fn next_sort(current: &[SortTerm], column: &str, mode: SortMode, cycle: SortCycle) -> SortList {
    match mode {
        SortMode::Replace => replace_sort(current, column, cycle),
        SortMode::Append => append_sort(current, column, cycle),
    }
}

fn replace_sort(current: &[SortTerm], column: &str, cycle: SortCycle) -> SortList {
    let existing = current
        .iter()
        .find(|term| term.column == column)
        .map(|term| term.dir);
    match existing {
        Some(dir) => cycle
            .next(Some(dir))
            .map(|dir| SortTerm::new(column, dir))
            .into_iter()
            .collect(),
        None => vec![SortTerm::new(column, SortDir::Desc)],
    }
}

fn append_sort(current: &[SortTerm], column: &str, cycle: SortCycle) -> SortList {
    let mut found = false;
    let mut sort = Vec::with_capacity(current.len() + 1);
    for term in current {
        if term.column == column {
            found = true;
            if let Some(dir) = cycle.next(Some(term.dir)) {
                sort.push(SortTerm::new(column, dir));
            }
        } else {
            sort.push(term.clone());
        }
    }
    if !found {
        sort.push(SortTerm::new(column, SortDir::Desc));
    }
    sort
}
