//! Declared-type lookup for cells and column paths.

use crate::types::{CellMeta, ScalarType, Schema};
use crate::COLUMN_PATH_SEPARATOR;

/// Resolves cell coordinates to the scalar type declared by the schemas.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    column_paths: &'a [String],
    row_pivots: &'a [String],
    view_schema: &'a Schema,
    table_schema: &'a Schema,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        column_paths: &'a [String],
        row_pivots: &'a [String],
        view_schema: &'a Schema,
        table_schema: &'a Schema,
    ) -> Self {
        Self {
            column_paths,
            row_pivots,
            view_schema,
            table_schema,
        }
    }

    /// Declared type of a rendered cell.
    ///
    /// Data columns resolve through the view schema by the last column-path
    /// segment; row-header columns through the table schema by their row
    /// pivot. `None` means undeclared, which renders like a string.
    pub fn resolve(&self, meta: &CellMeta) -> Option<ScalarType> {
        match meta.x() {
            Some(x) => self.column_type(x),
            None => self.row_header_type(meta.row_header_x()?),
        }
    }

    /// Type of data column `x`.
    pub fn column_type(&self, x: usize) -> Option<ScalarType> {
        let path = self.column_paths.get(x)?;
        let leaf = path.rsplit(COLUMN_PATH_SEPARATOR).next()?;
        self.view_schema.get(leaf)
    }

    /// Type of row-header column `row_header_x`; column 0 is the `TOTAL`
    /// column and has no pivot.
    pub fn row_header_type(&self, row_header_x: usize) -> Option<ScalarType> {
        let pivot = self.row_pivots.get(row_header_x.checked_sub(1)?)?;
        self.table_schema.get(pivot)
    }

    /// Formatting type for a value under column name `title`.
    ///
    /// The table schema wins when `use_table_schema` is set and it knows the
    /// name; otherwise the view schema; otherwise `string`.
    pub fn value_type(&self, title: Option<&str>, use_table_schema: bool) -> ScalarType {
        let Some(title) = title else {
            return ScalarType::String;
        };
        use_table_schema
            .then(|| self.table_schema.get(title))
            .flatten()
            .or_else(|| self.view_schema.get(title))
            .unwrap_or(ScalarType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        column_paths: Vec<String>,
        row_pivots: Vec<String>,
        view_schema: Schema,
        table_schema: Schema,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                column_paths: vec!["2019|Sales".to_string(), "2019|Region".to_string()],
                row_pivots: vec!["Region".to_string(), "Year".to_string()],
                view_schema: [("Sales", ScalarType::Float), ("Region", ScalarType::Integer)]
                    .into_iter()
                    .collect(),
                table_schema: [("Region", ScalarType::String), ("Year", ScalarType::Date)]
                    .into_iter()
                    .collect(),
            }
        }

        fn resolver(&self) -> TypeResolver<'_> {
            TypeResolver::new(
                &self.column_paths,
                &self.row_pivots,
                &self.view_schema,
                &self.table_schema,
            )
        }
    }

    #[test]
    fn test_data_cells_use_last_path_segment() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let body = CellMeta::Body {
            x: 0,
            y: 3,
            value: "1.00".to_string(),
        };
        assert_eq!(resolver.resolve(&body), Some(ScalarType::Float));
        // Aggregated "Region" is a count in the view schema.
        assert_eq!(resolver.column_type(1), Some(ScalarType::Integer));
        assert_eq!(resolver.column_type(9), None);
    }

    #[test]
    fn test_row_header_cells_use_table_schema() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let cell = |row_header_x| CellMeta::RowHeader {
            y: 0,
            y0: 0,
            row_header_x,
            row_header: Vec::new(),
            value: String::new(),
        };
        assert_eq!(resolver.resolve(&cell(0)), None);
        assert_eq!(resolver.resolve(&cell(1)), Some(ScalarType::String));
        assert_eq!(resolver.resolve(&cell(2)), Some(ScalarType::Date));
        assert_eq!(resolver.resolve(&cell(3)), None);
    }

    #[test]
    fn test_corner_header_without_coordinates() {
        let fixture = Fixture::new();
        let corner = CellMeta::GroupHeader {
            x: None,
            row_header_x: None,
        };
        assert_eq!(fixture.resolver().resolve(&corner), None);
    }

    #[test]
    fn test_value_type_preference() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        assert_eq!(resolver.value_type(Some("Region"), true), ScalarType::String);
        assert_eq!(resolver.value_type(Some("Region"), false), ScalarType::Integer);
        assert_eq!(resolver.value_type(Some("Sales"), true), ScalarType::Float);
        assert_eq!(resolver.value_type(Some("Nope"), false), ScalarType::String);
        assert_eq!(resolver.value_type(None, true), ScalarType::String);
    }
}
