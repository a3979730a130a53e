//! Row-header tree navigation: which labels can expand or collapse, and the
//! engine command a click on one of them maps to.

use crate::engine::ViewEngine;
use crate::error::Result;
use crate::types::defined_depth;

/// Tree affordance of one row-header cell, derived every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode {
    /// Blank or placeholder label; no icon.
    Empty,
    /// Label in the deepest header column; no children.
    Leaf,
    /// Collapsed group.
    Expand,
    /// Expanded group: the next row continues this path one level deeper.
    Collapse,
}

impl TreeNode {
    /// Derive the node for a row-header cell.
    ///
    /// `next_row_header` is the row-header path of the row rendered directly
    /// below, if any.
    pub fn derive(
        label: &str,
        row_header_x: usize,
        row_pivot_depth: usize,
        next_row_header: Option<&[Option<String>]>,
    ) -> Self {
        if label.trim().is_empty() {
            return Self::Empty;
        }
        if row_header_x >= row_pivot_depth {
            return Self::Leaf;
        }

        let continues = next_row_header
            .and_then(|next| next.get(row_header_x + 1))
            .is_some_and(Option::is_some);
        if continues {
            Self::Collapse
        } else {
            Self::Expand
        }
    }

    /// Expandable or collapsible.
    pub fn is_label(self) -> bool {
        matches!(self, Self::Expand | Self::Collapse)
    }
}

/// A tree transition to request from the view engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeCommand {
    SetDepth(usize),
    Collapse(usize),
    Expand(usize),
}

impl TreeCommand {
    /// Command for a press on the toggle of a row-header label at data row `y`.
    ///
    /// Shift jumps every row to this label's depth (one level shallower when
    /// collapsing). Leaves and blank cells have no transition.
    pub fn for_click(node: TreeNode, row_header: &[Option<String>], y: usize, shift: bool) -> Option<Self> {
        if !node.is_label() {
            return None;
        }
        let collapse = node == TreeNode::Collapse;
        let depth = defined_depth(row_header);

        let command = match (shift, collapse) {
            (true, true) => Self::SetDepth(depth.saturating_sub(2)),
            (true, false) => Self::SetDepth(depth.saturating_sub(1)),
            (false, true) => Self::Collapse(y),
            (false, false) => Self::Expand(y),
        };
        Some(command)
    }

    pub async fn apply<V: ViewEngine + ?Sized>(self, view: &V) -> Result<()> {
        log::info!("tree transition: {self:?}");
        match self {
            Self::SetDepth(depth) => view.set_depth(depth).await,
            Self::Collapse(row) => view.collapse(row).await,
            Self::Expand(row) => view.expand(row).await,
        }
    }
}
