//! Per-column value extraction
//!
//! One sequential pass over the rows splits every retained field into its
//! column's value sequence, expanding domain names when requested. Blank
//! values are kept here and dropped when the distinct value set is formed.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::config::ColumnFilter;
use super::domain_name::{expand, is_domain};
use crate::error::SourceError;

/// A row of text fields, 1-indexed positionally
pub type Row = Vec<String>;

/// Values observed per 1-indexed column
///
/// Columns are first seen in ascending order (a row reveals columns
/// `1..=len`), so an ordered map keeps first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnValues {
    columns: BTreeMap<usize, Vec<String>>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, column: usize, value: String) {
        self.columns.entry(column).or_default().push(value);
    }

    /// Values of one column in row order, duplicates and blanks included
    pub fn get(&self, column: usize) -> Option<&[String]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Column numbers in first-seen order
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.columns.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Distinct non-empty values of one column
    pub fn distinct_values(&self, column: usize) -> HashSet<&str> {
        self.get(column).map(distinct_non_empty).unwrap_or_default()
    }

    pub fn into_inner(self) -> BTreeMap<usize, Vec<String>> {
        self.columns
    }
}

/// Unique values of a sequence, empty strings excluded
pub fn distinct_non_empty(values: &[String]) -> HashSet<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Split rows into per-column value sequences
///
/// The first `skip_lines` rows are consumed and discarded. Rows may be of
/// different lengths. A row source error aborts extraction.
pub fn extract_columns<I>(
    rows: I,
    skip_lines: usize,
    fields: &ColumnFilter,
    expand_domains: bool,
) -> Result<ColumnValues, SourceError>
where
    I: IntoIterator<Item = Result<Row, SourceError>>,
{
    let mut rows = rows.into_iter();
    for header in rows.by_ref().take(skip_lines) {
        debug!("Skipping {:?}", header?);
    }

    let mut values = ColumnValues::new();
    for row in rows {
        for (index, field) in row?.into_iter().enumerate() {
            let column = index + 1;
            if !fields.retains(column) {
                continue;
            }

            if expand_domains && is_domain(&field) {
                for suffix in expand(&field) {
                    values.push(column, suffix.to_string());
                }
            } else {
                values.push(column, field);
            }
        }
    }

    Ok(values)
}
