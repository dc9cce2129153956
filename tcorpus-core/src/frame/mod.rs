//! Column-oriented tables with row index labels
//!
//! A [`Frame`] is the tabular container passed into and returned from the
//! corpus operations. Besides its named columns it carries a row index:
//! labels survive filtering and exploding, so output rows can always be
//! traced back to the input row they came from. [`Frame::reset_index`]
//! materialises those labels as an ordinary column (`text_id`,
//! `sentence_id`, ...).

mod value;

pub use value::Value;

use crate::error::{Error, Result};
use std::collections::HashMap;

/// A named column
#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Value>,
}

/// An ordered set of equally long named columns plus a row index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    index: Vec<usize>,
    columns: Vec<Column>,
}

/// A JSON object used as a row record
pub type Record = serde_json::Map<String, serde_json::Value>;

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame from `(name, values)` pairs with index `0..n`
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let columns: Vec<(String, Vec<Value>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();
        let rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        Self::from_parts((0..rows).collect(), columns)
    }

    /// Create a frame from an explicit index and columns
    pub fn from_parts(index: Vec<usize>, columns: Vec<(String, Vec<Value>)>) -> Result<Self> {
        let mut frame = Self {
            index,
            columns: Vec::with_capacity(columns.len()),
        };
        for (name, values) in columns {
            frame.push_column(name, values)?;
        }
        Ok(frame)
    }

    /// Build a frame from JSON object records
    ///
    /// The column set is the union of all keys in first-seen order; keys
    /// missing from a record become `Null` cells.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut cells: Vec<Vec<Value>> = Vec::new();
        let mut rows = 0;

        for record in records {
            for (key, value) in record {
                let pos = *positions.entry(key.clone()).or_insert_with(|| {
                    names.push(key.clone());
                    cells.push(vec![Value::Null; rows]);
                    names.len() - 1
                });
                cells[pos].push(Value::from(value.clone()));
            }
            rows += 1;
            for column in cells.iter_mut() {
                if column.len() < rows {
                    column.push(Value::Null);
                }
            }
        }

        Self {
            index: (0..rows).collect(),
            columns: names
                .into_iter()
                .zip(cells)
                .map(|(name, values)| Column { name, values })
                .collect(),
        }
    }

    /// Convert every row into a JSON object record
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.len())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.name.clone(), c.values[row].to_json()))
                    .collect()
            })
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row index labels
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Cells of a column
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|pos| self.columns[pos].values.as_slice())
    }

    /// Cells of one row, in column order
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(move |c| &c.values[row])
    }

    /// Names from `names` that are not columns of this frame
    pub fn missing_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Fail with [`Error::MissingColumns`] unless every name is a column
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S], frame: &'static str) -> Result<()> {
        let missing = self.missing_columns(names);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns { frame, missing })
        }
    }

    /// Append a column
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let len = self.len();
        self.insert_column(self.width(), name, values, len)
    }

    fn insert_column(
        &mut self,
        at: usize,
        name: impl Into<String>,
        values: Vec<Value>,
        expected: usize,
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if values.len() != expected {
            return Err(Error::LengthMismatch {
                column: name,
                expected,
                actual: values.len(),
            });
        }
        self.columns.insert(at, Column { name, values });
        Ok(())
    }

    /// Rename a column in place
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let pos = self.require(from)?;
        if from != to && self.contains(to) {
            return Err(Error::DuplicateColumn(to.to_string()));
        }
        self.columns[pos].name = to.to_string();
        Ok(())
    }

    /// A frame with only the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame> {
        let mut out = Frame {
            index: self.index.clone(),
            columns: Vec::with_capacity(names.len()),
        };
        for name in names {
            let pos = self.require(name.as_ref())?;
            out.push_column(name.as_ref(), self.columns[pos].values.clone())?;
        }
        Ok(out)
    }

    /// Rows where `mask` is true; index labels are kept
    pub fn filter(&self, mask: &[bool]) -> Result<Frame> {
        if mask.len() != self.len() {
            return Err(Error::LengthMismatch {
                column: "<mask>".to_string(),
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(row, &keep)| keep.then_some(row))
            .collect();
        Ok(self.take(&rows))
    }

    /// Rows whose cell in `column` is not `Null`
    pub fn drop_nulls(&self, column: &str) -> Result<Frame> {
        let pos = self.require(column)?;
        let mask: Vec<bool> = self.columns[pos]
            .values
            .iter()
            .map(|v| !v.is_null())
            .collect();
        self.filter(&mask)
    }

    /// One row per element of each list cell in `column`
    ///
    /// Empty lists and `Null` cells produce a single `Null` row; scalar cells
    /// are left as they are. All other cells, and the index label, are
    /// repeated for every produced row.
    pub fn explode(&self, column: &str) -> Result<Frame> {
        let pos = self.require(column)?;
        let mut rows = Vec::with_capacity(self.len());
        let mut exploded = Vec::with_capacity(self.len());

        for (row, cell) in self.columns[pos].values.iter().enumerate() {
            match cell {
                Value::List(items) if !items.is_empty() => {
                    for item in items {
                        rows.push(row);
                        exploded.push(item.clone());
                    }
                }
                Value::List(_) | Value::Null => {
                    rows.push(row);
                    exploded.push(Value::Null);
                }
                scalar => {
                    rows.push(row);
                    exploded.push(scalar.clone());
                }
            }
        }

        let mut out = Frame {
            index: rows.iter().map(|&row| self.index[row]).collect(),
            columns: Vec::with_capacity(self.width()),
        };
        for (i, c) in self.columns.iter().enumerate() {
            let values = if i == pos {
                std::mem::take(&mut exploded)
            } else {
                rows.iter().map(|&row| c.values[row].clone()).collect()
            };
            out.columns.push(Column {
                name: c.name.clone(),
                values,
            });
        }
        Ok(out)
    }

    /// Left join the named columns of `other` on index label
    ///
    /// Rows without a matching label in `other` receive `Null`. When `other`
    /// repeats a label, its first row is used.
    pub fn join<S: AsRef<str>>(&self, other: &Frame, names: &[S]) -> Result<Frame> {
        let mut lookup: HashMap<usize, usize> = HashMap::with_capacity(other.len());
        for (row, &label) in other.index.iter().enumerate() {
            lookup.entry(label).or_insert(row);
        }

        let mut out = self.clone();
        for name in names {
            let name = name.as_ref();
            let source = other.column(name).ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
            let values = self
                .index
                .iter()
                .map(|label| {
                    lookup
                        .get(label)
                        .map(|&row| source[row].clone())
                        .unwrap_or(Value::Null)
                })
                .collect();
            out.push_column(name, values)?;
        }
        Ok(out)
    }

    /// Move the index labels into a new first column and renumber rows
    pub fn reset_index(&self, name: &str) -> Result<Frame> {
        let labels: Vec<Value> = self.index.iter().map(|&label| Value::from(label)).collect();
        let mut out = Frame {
            index: (0..self.len()).collect(),
            columns: self.columns.clone(),
        };
        out.insert_column(0, name, labels, self.len())?;
        Ok(out)
    }

    fn take(&self, rows: &[usize]) -> Frame {
        Frame {
            index: rows.iter().map(|&row| self.index[row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&row| c.values[row].clone()).collect(),
                })
                .collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}
