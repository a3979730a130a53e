//! Pointer gestures on the grid: tree toggles and header sort clicks.

use crate::engine::ViewEngine;
use crate::error::Result;
use crate::model::GridModel;
use crate::sort::{next_sort, SortCycle, SortMode};
use crate::style::{StyleClass, StyleFlags};
use crate::tree::{TreeCommand, TreeNode};
use crate::types::{CellMeta, SortList};
use crate::TREE_TOGGLE_WIDTH;

/// What a press on a cell asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Advance the sort of `column`.
    Sort { column: String, mode: SortMode },
    /// Expand, collapse or re-depth the row tree.
    Tree(TreeCommand),
}

/// Result of dispatching a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The new sort list; the host applies it to the view.
    Sort(SortList),
    /// The tree changed shape; the grid must redraw.
    Redraw,
}

/// Classify a mouse press.
///
/// `flags` are the style classes currently on the pressed cell, and
/// `offset_x` is the press position relative to the cell's left edge.
pub fn classify(meta: &CellMeta, flags: &StyleFlags, offset_x: f64, shift: bool) -> Option<Gesture> {
    if flags.has(StyleClass::TreeLabel) && offset_x < TREE_TOGGLE_WIDTH {
        let CellMeta::RowHeader { y, row_header, .. } = meta else {
            return None;
        };
        let node = if flags.has(StyleClass::TreeLabelCollapse) {
            TreeNode::Collapse
        } else {
            TreeNode::Expand
        };
        return TreeCommand::for_click(node, row_header, *y, shift).map(Gesture::Tree);
    }

    if flags.has(StyleClass::HeaderLeaf) && !flags.has(StyleClass::HeaderCorner) {
        let CellMeta::LeafHeader { column_header, .. } = meta else {
            return None;
        };
        let mode = if shift {
            SortMode::Append
        } else {
            SortMode::Replace
        };
        return Some(Gesture::Sort {
            column: column_header.last()?.clone(),
            mode,
        });
    }

    None
}

impl GridModel {
    /// Sort list after a header click on `column`, for the current config.
    pub fn next_sort(&self, column: &str, mode: SortMode) -> SortList {
        let config = self.config();
        let sort = next_sort(&config.sort, column, mode, SortCycle::for_config(config));
        log::info!("sort on {column:?} ({mode:?}): {sort:?}");
        sort
    }

    /// Carry out a gesture.
    ///
    /// Tree commands are sent to `view` and the row and column counts are
    /// refreshed. Sort gestures only compute the new list; the view is not
    /// touched.
    pub async fn dispatch<V: ViewEngine + ?Sized>(
        &mut self,
        view: &V,
        gesture: Gesture,
    ) -> Result<GestureOutcome> {
        match gesture {
            Gesture::Sort { column, mode } => Ok(GestureOutcome::Sort(self.next_sort(&column, mode))),
            Gesture::Tree(command) => {
                command.apply(view).await?;
                self.refresh_counts(view).await?;
                Ok(GestureOutcome::Redraw)
            }
        }
    }
}
