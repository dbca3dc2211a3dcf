//! Product upload text format parser
//!
//! # File Format
//! Entries are separated by `;`. Inside an entry every line is a
//! `key: value` pair, keys being `sku`, `name`, `quantity` and `price`:
//!
//! ```text
//! sku: A1
//! name: Widget
//! quantity: 5
//! price: 9.99;
//! sku: B2
//! name: Gadget
//! quantity: 1
//! price: 24.50;
//! ```
//!
//! Parsing never fails. Problems are recorded on the [`RawEntry`] so the
//! validator can reject the batch with the entry's position.

use std::collections::BTreeMap;
use std::fmt;

/// Separator between product entries
pub const ENTRY_DELIMITER: char = ';';

/// Separator between key and value on a line
pub const KEY_VALUE_DELIMITER: char = ':';

/// Keys accepted inside an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Sku,
    Name,
    Quantity,
    Price,
}

impl ProductField {
    pub const ALL: [ProductField; 4] = [
        ProductField::Sku,
        ProductField::Name,
        ProductField::Quantity,
        ProductField::Price,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Sku => "sku",
            ProductField::Name => "name",
            ProductField::Quantity => "quantity",
            ProductField::Price => "price",
        }
    }

    /// Keys are matched exactly; `SKU` is not `sku`
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an entry cannot become a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryIssue {
    /// Line `line` (1-based within the entry) used a key outside the known set
    UnknownKey { line: usize, key: String },
    /// Line `line` lacks a non-empty key or value
    MalformedLine { line: usize },
}

/// One non-empty, `;`-delimited chunk of the upload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEntry {
    /// 1-based position among non-empty entries
    pub index: usize,
    /// Last value seen for each recognized key
    pub fields: BTreeMap<ProductField, String>,
    pub issues: Vec<EntryIssue>,
}

impl RawEntry {
    pub fn get(&self, field: ProductField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// True when some line was malformed or used an unknown key
    pub fn is_invalid(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Split upload text into raw entries
///
/// Whitespace-only chunks between separators are dropped without taking a
/// position, so the first real entry is always index 1.
pub fn parse(text: &str) -> Vec<RawEntry> {
    text.split(ENTRY_DELIMITER)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(i, chunk)| parse_entry(i + 1, chunk))
        .collect()
}

fn parse_entry(index: usize, chunk: &str) -> RawEntry {
    let mut entry = RawEntry {
        index,
        ..RawEntry::default()
    };

    for (i, line) in chunk.split('\n').enumerate() {
        let line_no = i + 1;
        let Some((key, value)) = split_line(line) else {
            entry.issues.push(EntryIssue::MalformedLine { line: line_no });
            continue;
        };

        match ProductField::from_key(key) {
            Some(field) => {
                entry.fields.insert(field, value.to_string());
            },
            None => entry.issues.push(EntryIssue::UnknownKey {
                line: line_no,
                key: key.to_string(),
            }),
        }
    }

    entry
}

/// `key: value` with both sides trimmed and non-empty
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(KEY_VALUE_DELIMITER)?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
