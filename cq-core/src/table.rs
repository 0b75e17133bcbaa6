use crate::{Column, Row};

/// CSV framing options threaded explicitly through evaluation (the grammar:
/// "Global mutable CSV config ... replace with an explicit configuration
/// value"). Must be fixed before a query starts evaluating and is never
/// mutated mid-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvConfig {
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
        }
    }
}

/// A table: an origin identifier (a file path, or a synthesized name such
/// as `"query_result"`/`"joined_result"`), an ordered schema, an ordered
/// row vector, and the CSV framing it was read with/will be written with.
#[derive(Debug, Clone)]
pub struct Table {
    pub origin: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub csv: CsvConfig,
}

impl Table {
    pub fn new(origin: impl Into<String>, columns: Vec<Column>, csv: CsvConfig) -> Self {
        Self {
            origin: origin.into(),
            columns,
            rows: Vec::new(),
            csv,
        }
    }

    pub fn empty(origin: impl Into<String>) -> Self {
        Self::new(origin, Vec::new(), CsvConfig::default())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Finds a column by case-insensitive name, returning its index.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnType;

    #[test]
    fn row_length_matches_column_count_invariant() {
        let cols = vec![
            Column::new("a", ColumnType::Integer),
            Column::new("b", ColumnType::String),
        ];
        let mut t = Table::new("t", cols, CsvConfig::default());
        t.rows.push(Row::nulls(t.column_count()));
        assert_eq!(t.rows[0].len(), t.column_count());
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let cols = vec![Column::new("Name", ColumnType::String)];
        let t = Table::new("t", cols, CsvConfig::default());
        assert_eq!(t.column_index("name"), Some(0));
        assert_eq!(t.column_index("NAME"), Some(0));
        assert_eq!(t.column_index("other"), None);
    }
}
