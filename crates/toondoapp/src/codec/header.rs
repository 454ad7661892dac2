use super::DELIMITER;
use std::collections::HashSet;
use std::fmt;

/// The schema line that opens every document: `name[count]{field,...}:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    /// Row count as written. Advisory only: readers count the rows themselves.
    pub count: usize,
    pub fields: Vec<String>,
}

/// Characters that would end a name early when the header is read back.
const RESERVED: [char; 6] = ['[', ']', '{', '}', ':', DELIMITER];

/// Check a collection name: non-empty, no surrounding whitespace, no
/// reserved or control characters.
pub(super) fn check_name(name: &str) -> Result<(), String> {
    check_identifier(name).map_err(|why| format!("collection name '{}' {}", name, why))
}

/// Check a field list: every name valid, none repeated. An empty list is
/// allowed and renders as `{}`.
pub(super) fn check_fields<S: AsRef<str>>(fields: &[S]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for field in fields.iter().map(AsRef::as_ref) {
        check_identifier(field).map_err(|why| format!("field name '{}' {}", field, why))?;
        if !seen.insert(field) {
            return Err(format!("field '{}' is declared twice", field));
        }
    }
    Ok(())
}

fn check_identifier(s: &str) -> Result<(), &'static str> {
    if s.is_empty() {
        return Err("is empty");
    }
    if s.trim() != s {
        return Err("has surrounding whitespace");
    }
    if s.contains(|c: char| RESERVED.contains(&c) || c.is_control()) {
        return Err("contains a reserved character");
    }
    Ok(())
}

impl Header {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let body = line
            .strip_suffix(':')
            .ok_or_else(|| "missing trailing ':'".to_string())?;

        let open = body
            .find('[')
            .ok_or_else(|| "missing '[' before the row count".to_string())?;
        let name = body[..open].trim();
        if name.is_empty() {
            return Err("missing collection name".to_string());
        }
        check_name(name)?;

        let rest = &body[open + 1..];
        let close = rest
            .find(']')
            .ok_or_else(|| "missing ']' after the row count".to_string())?;
        let count_str = rest[..close].trim();
        if count_str.is_empty() || !count_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("row count '{}' is not a number", count_str));
        }
        let count: usize = count_str
            .parse()
            .map_err(|_| format!("row count '{}' is out of range", count_str))?;

        let fields_part = rest[close + 1..].trim();
        let inner = fields_part
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| "field list must be enclosed in '{...}'".to_string())?;

        let fields: Vec<String> = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner
                .split(DELIMITER)
                .map(|f| f.trim().to_string())
                .collect()
        };
        if fields.iter().any(|f| f.is_empty()) {
            return Err("field list contains an empty name".to_string());
        }
        check_fields(&fields)?;

        Ok(Self {
            name: name.to_string(),
            count,
            fields,
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = DELIMITER.to_string();
        write!(
            f,
            "{}[{}]{{{}}}:",
            self.name,
            self.count,
            self.fields.join(&sep)
        )
    }
}
