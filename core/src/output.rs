//! Handler result payloads.
//!
//! Handlers return an [`Output`]; how it is drawn is up to the renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which payload an [`Output`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Plain text.
    String,
    /// Rows and columns.
    Table,
    /// Key/value pairs.
    Dict,
    /// One or more progress lines.
    Progress,
}

/// Index outside a table's declared size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// Column index past the last column.
    #[error("column {col} out of range (table has {cols} columns)")]
    ColumnOutOfRange { col: usize, cols: usize },
    /// Row index past the last row.
    #[error("row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
}

/// Fixed-width table with optional cells.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Table;
///
/// let mut table = Table::with_headers(["name", "size"]);
/// table.push_row(["a.txt", "12"]);
/// assert_eq!(table.cell(0, 1), Some("12"));
/// assert!(table.set_cell(3, 0, "x").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<Option<String>>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates an empty `rows` x `cols` table.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            headers: vec![None; cols],
            rows: vec![vec![None; cols]; rows],
        }
    }

    /// Creates a table with one column per header and no rows.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(|h| Some(h.into())).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.headers.len()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Sets a column header.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::ColumnOutOfRange`] for a bad column.
    pub fn set_header(&mut self, col: usize, name: &str) -> Result<(), OutputError> {
        let cols = self.num_cols();
        let slot = self
            .headers
            .get_mut(col)
            .ok_or(OutputError::ColumnOutOfRange { col, cols })?;
        *slot = Some(name.to_string());
        Ok(())
    }

    /// Sets a cell.
    ///
    /// # Errors
    ///
    /// Returns an [`OutputError`] when `row` or `col` is out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), OutputError> {
        let (rows, cols) = (self.num_rows(), self.num_cols());
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(OutputError::RowOutOfRange { row, rows })?;
        let slot = cells
            .get_mut(col)
            .ok_or(OutputError::ColumnOutOfRange { col, cols })?;
        *slot = Some(value.to_string());
        Ok(())
    }

    /// Header text of `col`, if set.
    pub fn header(&self, col: usize) -> Option<&str> {
        self.headers.get(col)?.as_deref()
    }

    /// Cell text, if in range and set.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Appends a row; missing cells stay unset and extra ones are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .take(self.num_cols())
            .map(|cell| Some(cell.into()))
            .collect();
        row.resize(self.num_cols(), None);
        self.rows.push(row);
    }
}

/// Ordered string dictionary.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Dict;
///
/// let mut dict = Dict::new();
/// dict.put("user", "ada");
/// dict.put("shell", "zsh");
/// dict.put("user", "grace");
/// assert_eq!(dict.get("user"), Some("grace"));
/// assert_eq!(dict.keys().collect::<Vec<_>>(), ["user", "shell"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dict {
    entries: Vec<(String, String)>,
}

impl Dict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, keeping its first position.
    pub fn put(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let at = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(at).1)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One progress line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Label printed at the start of the line.
    pub name: String,
    /// Status text after the label.
    pub message: Option<String>,
    /// Bar width in cells.
    pub length: usize,
    /// Fill for one completed cell.
    pub bar: String,
    /// Opening bracket of the bar.
    pub before: String,
    /// Closing bracket of the bar.
    pub after: String,
    /// Text appended after the message, usually [`Progress::bar_line`].
    pub extra: Option<String>,
    /// Work done so far, in the unit of `total`.
    pub current: f64,
    /// Work at completion; zero or less draws an empty bar.
    pub total: f64,
}

impl Progress {
    /// Creates a progress line at zero.
    pub fn new(name: &str, length: usize, total: f64) -> Self {
        Self {
            name: name.to_string(),
            message: None,
            length,
            bar: "#".to_string(),
            before: "[".to_string(),
            after: "]".to_string(),
            extra: None,
            current: 0.0,
            total,
        }
    }

    /// Number of filled cells, clamped to `length`.
    pub fn filled(&self) -> usize {
        if self.total <= 0.0 || self.current <= 0.0 {
            return 0;
        }
        let complete = (self.current / self.total) * self.length as f64;
        (complete as usize).min(self.length)
    }

    /// Renders `name [####    ]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::Progress;
    ///
    /// let mut progress = Progress::new("copy", 4, 10.0);
    /// progress.current = 5.0;
    /// assert_eq!(progress.bar_line(), "copy [##  ]");
    /// ```
    pub fn bar_line(&self) -> String {
        let filled = self.filled();
        format!(
            "{} {}{}{}{}",
            self.name,
            self.before,
            self.bar.repeat(filled),
            " ".repeat(self.length - filled),
            self.after
        )
    }
}

/// A block of progress lines redrawn in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiProgress {
    /// Lines drawn by the previous render, moved over before redrawing.
    pub old_count: usize,
    pub progress: Vec<Progress>,
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum Output {
    Text(String),
    Table(Table),
    Dict(Dict),
    Progress(MultiProgress),
}

impl Output {
    /// Text output.
    pub fn text(text: impl Into<String>) -> Self {
        Output::Text(text.into())
    }

    /// Payload kind.
    pub fn kind(&self) -> ResultKind {
        match self {
            Output::Text(_) => ResultKind::String,
            Output::Table(_) => ResultKind::Table,
            Output::Dict(_) => ResultKind::Dict,
            Output::Progress(_) => ResultKind::Progress,
        }
    }
}

impl From<Table> for Output {
    fn from(table: Table) -> Self {
        Output::Table(table)
    }
}

impl From<Dict> for Output {
    fn from(dict: Dict) -> Self {
        Output::Dict(dict)
    }
}

impl From<MultiProgress> for Output {
    fn from(progress: MultiProgress) -> Self {
        Output::Progress(progress)
    }
}
