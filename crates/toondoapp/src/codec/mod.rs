//! # Tabular Text Codec
//!
//! Converts between the on-disk task list text and an in-memory [`Document`].
//! The format is a single TOON tabular array: one header line declaring the
//! collection name, a row count and the field names, then one row per record.
//!
//! ```text
//! tasks[2]{id,description,status,created_at}:
//! 3f2a9c1d,buy milk,pending,2025-03-01 09:15:00
//! 8b0e44aa,"eggs, flour",done,2025-03-01 09:16:12
//! ```
//!
//! The codec is stateless and knows nothing about tasks: field names come from
//! the header, never from code.
//!
//! ## Reading
//!
//! - The row count in the header is advisory. Readers count the rows present.
//! - Blank lines are skipped and leading indentation on a row is ignored.
//! - A short row is padded with empty values; a long row is truncated.
//! - [`try_decode`] reports why a text is unreadable; [`decode`] never fails
//!   and falls back to an empty `tasks` document.
//!
//! ## Writing
//!
//! [`encode`] always writes the real row count and ends with a newline. Values
//! that would not survive a bare round trip are quoted, see `escape.rs`.

mod escape;
mod header;

pub use header::Header;

use indexmap::IndexMap;
use thiserror::Error;

/// Separator between values in a row and between names in the header.
pub const DELIMITER: char = ',';

/// Collection name used when there is nothing to read.
pub const DEFAULT_COLLECTION: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no header line found")]
    MissingHeader,

    #[error("line {line}: invalid header: {reason}")]
    InvalidHeader { line: usize, reason: String },

    #[error("line {line}: invalid row: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("expected collection '{expected}', found '{found}'")]
    UnexpectedCollection { expected: String, found: String },

    #[error("field '{0}' is not declared by the document header")]
    UnknownField(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidEncoding { offset: usize },
}

/// One row: field name to value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(IndexMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A decoded file: one named collection of records and its declared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    fields: Vec<String>,
    records: Vec<Record>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            name: DEFAULT_COLLECTION.to_string(),
            fields: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl Document {
    /// An empty document. The name and field names must be ones a header
    /// can carry, so that whatever is encoded can be decoded again.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        header::check_name(&name).map_err(FormatError::InvalidSchema)?;
        header::check_fields(&fields).map_err(FormatError::InvalidSchema)?;
        Ok(Self::from_header(Header {
            name,
            count: 0,
            fields,
        }))
    }

    fn from_header(header: Header) -> Self {
        Self {
            name: header.name,
            fields: header.fields,
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records of the named collection, or `None` if this document holds another one.
    pub fn collection(&self, name: &str) -> Option<&[Record]> {
        (self.name == name).then_some(self.records.as_slice())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record addressed by field name.
    ///
    /// The stored record carries exactly the declared fields, in header
    /// order; declared fields the record lacks are stored as empty strings.
    pub fn push(&mut self, record: Record) -> Result<(), FormatError> {
        if let Some((field, _)) = record.iter().find(|(f, _)| !self.declares(f)) {
            return Err(FormatError::UnknownField(field.to_string()));
        }
        let normalized = self
            .fields
            .iter()
            .map(|f| (f.clone(), record.get(f).unwrap_or_default().to_string()))
            .collect();
        self.records.push(normalized);
        Ok(())
    }

    /// Append a record from positional values, padding or truncating to the
    /// declared field count.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter();
        let record = self
            .fields
            .iter()
            .map(|f| (f.clone(), values.next().map(Into::into).unwrap_or_else(String::new)))
            .collect();
        self.records.push(record);
    }

    /// Remove every record for which `keep` is false; returns how many went.
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }

    fn declares(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Parse only the header line of `text`.
pub fn peek_header(text: &str) -> Result<Header, FormatError> {
    let (idx, line) = text
        .lines()
        .enumerate()
        .find(|(_, l)| !l.trim().is_empty())
        .ok_or(FormatError::MissingHeader)?;
    Header::parse(line).map_err(|reason| FormatError::InvalidHeader {
        line: idx + 1,
        reason,
    })
}

/// Strict decode: reports the first reason `text` is not a valid document.
pub fn try_decode(text: &str) -> Result<Document, FormatError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (header_idx, header_line) = lines.next().ok_or(FormatError::MissingHeader)?;
    let header = Header::parse(header_line).map_err(|reason| FormatError::InvalidHeader {
        line: header_idx + 1,
        reason,
    })?;

    let mut doc = Document::from_header(header);
    for (idx, line) in lines {
        let values = escape::split_row(line.trim_start()).map_err(|reason| {
            FormatError::InvalidRow {
                line: idx + 1,
                reason,
            }
        })?;
        doc.push_row(values);
    }
    Ok(doc)
}

/// Strict decode of raw file content, rejecting invalid UTF-8.
pub fn try_decode_bytes(bytes: &[u8]) -> Result<Document, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(|e| FormatError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    try_decode(text)
}

/// Lenient decode: anything unreadable becomes an empty `tasks` document.
pub fn decode(text: &str) -> Document {
    try_decode(text).unwrap_or_default()
}

pub fn encode(doc: &Document) -> String {
    let header = Header {
        name: doc.name.clone(),
        count: doc.records.len(),
        fields: doc.fields.clone(),
    };
    let sep = DELIMITER.to_string();

    let mut out = header.to_string();
    out.push('\n');
    for record in &doc.records {
        let row = doc
            .fields
            .iter()
            .map(|f| escape::quote(record.get(f).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(&sep);
        // A lone empty value would otherwise become a skipped blank line.
        if row.trim().is_empty() {
            out.push_str("\"\"");
        } else {
            out.push_str(&row);
        }
        out.push('\n');
    }
    out
}
