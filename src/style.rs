//! Cell style decisions.
//!
//! Every draw the grid asks, per visible cell, which presentational classes
//! to toggle. The answer is a pure function of the cell metadata and the
//! current view configuration; applying the classes is the widget's job.

use crate::resolve::TypeResolver;
use crate::tree::TreeNode;
use crate::types::{CellMeta, SortDir, ViewConfig};

/// A presentational class the grid can toggle on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    HeaderBorder,
    HeaderGroup,
    HeaderLeaf,
    HeaderCorner,
    SortAsc,
    SortDesc,
    SortColAsc,
    SortColDesc,
    AlignRight,
    AlignLeft,
    Positive,
    Negative,
    TreeLabel,
    TreeLabelExpand,
    TreeLabelCollapse,
    TreeLeaf,
}

impl StyleClass {
    pub const ALL: [Self; 16] = [
        Self::HeaderBorder,
        Self::HeaderGroup,
        Self::HeaderLeaf,
        Self::HeaderCorner,
        Self::SortAsc,
        Self::SortDesc,
        Self::SortColAsc,
        Self::SortColDesc,
        Self::AlignRight,
        Self::AlignLeft,
        Self::Positive,
        Self::Negative,
        Self::TreeLabel,
        Self::TreeLabelExpand,
        Self::TreeLabelCollapse,
        Self::TreeLeaf,
    ];

    /// CSS class name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeaderBorder => "psp-header-border",
            Self::HeaderGroup => "psp-header-group",
            Self::HeaderLeaf => "psp-header-leaf",
            Self::HeaderCorner => "psp-header-corner",
            Self::SortAsc => "psp-header-sort-asc",
            Self::SortDesc => "psp-header-sort-desc",
            Self::SortColAsc => "psp-header-sort-col-asc",
            Self::SortColDesc => "psp-header-sort-col-desc",
            Self::AlignRight => "psp-align-right",
            Self::AlignLeft => "psp-align-left",
            Self::Positive => "psp-positive",
            Self::Negative => "psp-negative",
            Self::TreeLabel => "psp-tree-label",
            Self::TreeLabelExpand => "psp-tree-label-expand",
            Self::TreeLabelCollapse => "psp-tree-label-collapse",
            Self::TreeLeaf => "psp-tree-leaf",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == name)
    }

    fn sort_indicator(dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => Self::SortAsc,
            SortDir::Desc => Self::SortDesc,
            SortDir::ColAsc => Self::SortColAsc,
            SortDir::ColDesc => Self::SortColDesc,
        }
    }
}

/// Class toggles decided for one cell.
///
/// Classes a cell kind has no opinion about are left out, so the widget keeps
/// whatever it had.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFlags {
    toggles: Vec<(StyleClass, bool)>,
}

impl StyleFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags as currently applied to an element, from its class names.
    pub fn from_class_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::new();
        for name in names {
            if let Some(class) = StyleClass::from_class_name(name.as_ref()) {
                flags.set(class, true);
            }
        }
        flags
    }

    pub fn set(&mut self, class: StyleClass, on: bool) {
        match self.toggles.iter_mut().find(|(c, _)| *c == class) {
            Some(toggle) => toggle.1 = on,
            None => self.toggles.push((class, on)),
        }
    }

    /// Decision for `class`, if one was made.
    pub fn get(&self, class: StyleClass) -> Option<bool> {
        self.toggles
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, on)| *on)
    }

    pub fn has(&self, class: StyleClass) -> bool {
        self.get(class) == Some(true)
    }

    pub fn toggles(&self) -> &[(StyleClass, bool)] {
        &self.toggles
    }

    /// Classes switched on.
    pub fn applied(&self) -> impl Iterator<Item = StyleClass> + '_ {
        self.toggles
            .iter()
            .filter(|(_, on)| *on)
            .map(|(class, _)| *class)
    }
}

/// Model state the style decisions read.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    config: &'a ViewConfig,
    resolver: TypeResolver<'a>,
}

impl<'a> StyleContext<'a> {
    pub fn new(config: &'a ViewConfig, resolver: TypeResolver<'a>) -> Self {
        Self { config, resolver }
    }

    /// Style toggles for one rendered cell.
    ///
    /// `next_row_header` is the row-header path of the row rendered directly
    /// below a row-header cell; it is ignored for other cells.
    pub fn cell_style(&self, meta: &CellMeta, next_row_header: Option<&[Option<String>]>) -> StyleFlags {
        let mut flags = StyleFlags::new();
        match meta {
            CellMeta::LeafHeader {
                x,
                row_header_x,
                column_header,
                ..
            } => {
                self.leaf_header_flags(&mut flags, *x, *row_header_x, column_header);
                self.value_flags(&mut flags, meta);
            }
            CellMeta::GroupHeader { x, row_header_x } => {
                let border = self.is_last_header_depth(*row_header_x) || x.is_some();
                flags.set(StyleClass::HeaderGroup, true);
                flags.set(StyleClass::HeaderLeaf, false);
                flags.set(StyleClass::HeaderBorder, border);
            }
            CellMeta::RowHeader {
                row_header_x,
                value,
                ..
            } => {
                let node = TreeNode::derive(
                    value,
                    *row_header_x,
                    self.config.row_pivots.len(),
                    next_row_header,
                );
                tree_flags(&mut flags, node);
                self.value_flags(&mut flags, meta);
            }
            CellMeta::Body { .. } => self.value_flags(&mut flags, meta),
        }
        flags
    }

    fn leaf_header_flags(
        &self,
        flags: &mut StyleFlags,
        x: Option<usize>,
        row_header_x: Option<usize>,
        column_header: &[String],
    ) {
        let group_width = self.config.columns.len();
        let ends_group = x.is_some_and(|x| (x + 1).checked_rem(group_width) == Some(0));
        let border = self.is_last_header_depth(row_header_x) || ends_group;

        flags.set(StyleClass::HeaderBorder, border);
        flags.set(StyleClass::HeaderGroup, false);
        flags.set(StyleClass::HeaderLeaf, true);
        flags.set(StyleClass::HeaderCorner, x.is_none());

        let sort = column_header
            .last()
            .and_then(|column| self.config.sort_for(column))
            .map(|term| StyleClass::sort_indicator(term.dir));
        for indicator in [
            StyleClass::SortAsc,
            StyleClass::SortDesc,
            StyleClass::SortColAsc,
            StyleClass::SortColDesc,
        ] {
            flags.set(indicator, sort == Some(indicator));
        }
    }

    /// Alignment and sign coloring, re-read from the rendered text.
    fn value_flags(&self, flags: &mut StyleFlags, meta: &CellMeta) {
        let numeric = self.resolver.resolve(meta).is_some_and(|ty| ty.is_numeric());
        let number = if numeric {
            parse_float_prefix(meta.value())
        } else {
            None
        };

        flags.set(StyleClass::AlignRight, numeric);
        flags.set(StyleClass::AlignLeft, !numeric);
        flags.set(StyleClass::Positive, number.is_some_and(|n| n > 0.0));
        flags.set(StyleClass::Negative, number.is_some_and(|n| n < 0.0));
    }

    fn is_last_header_depth(&self, row_header_x: Option<usize>) -> bool {
        let last = self.config.row_pivots.len().checked_sub(1);
        row_header_x.is_some() && row_header_x == last
    }
}

fn tree_flags(flags: &mut StyleFlags, node: TreeNode) {
    flags.set(StyleClass::TreeLabel, node.is_label());
    flags.set(StyleClass::TreeLabelExpand, node == TreeNode::Expand);
    flags.set(StyleClass::TreeLabelCollapse, node == TreeNode::Collapse);
    flags.set(StyleClass::TreeLeaf, node == TreeNode::Leaf);
}

/// Leading-number parse with JavaScript `parseFloat` semantics.
///
/// Reads the longest numeric prefix after leading whitespace, so
/// `"1,234.50"` reads as `1` and `"-5 units"` as `-5`; text without a
/// numeric prefix (including `"-"`) is `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text.get(end..).is_some_and(|rest| rest.starts_with("Infinity")) {
        let infinity = if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(infinity);
    }

    let mut digits = 0;
    while is_digit(end) {
        end += 1;
        digits += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while is_digit(end) {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits_start = exp;
        while is_digit(exp) {
            exp += 1;
        }
        if exp > exp_digits_start {
            end = exp;
        }
    }

    text.get(..end)?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix("1,234.50"), Some(1.0));
        assert_eq!(parse_float_prefix("-1,234"), Some(-1.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("2e3x"), Some(2000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    #[test]
    fn test_class_names_round_trip() {
        for class in StyleClass::ALL {
            assert_eq!(StyleClass::from_class_name(class.as_str()), Some(class));
        }
        assert_eq!(StyleClass::from_class_name("psp-unknown"), None);
    }

    #[test]
    fn test_flags_from_element_classes() {
        let flags = StyleFlags::from_class_names(["psp-tree-label", "other", "psp-tree-label-collapse"]);
        assert!(flags.has(StyleClass::TreeLabel));
        assert!(flags.has(StyleClass::TreeLabelCollapse));
        assert!(!flags.has(StyleClass::TreeLabelExpand));
        assert_eq!(flags.get(StyleClass::HeaderLeaf), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut flags = StyleFlags::new();
        flags.set(StyleClass::Positive, true);
        flags.set(StyleClass::Positive, false);
        assert_eq!(flags.toggles(), &[(StyleClass::Positive, false)]);
        assert_eq!(flags.applied().count(), 0);
    }
}
