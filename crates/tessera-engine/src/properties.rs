//! Property bags and the `.properties` file loader.
//!
//! # Design
//! - A bag is built once per filter file and never mutated afterwards.
//! - Layers are applied lowest first: defaults, then file entries, then the
//!   synthetic keys, so later layers shadow earlier ones.
//! - Filter files follow the Java `.properties` syntax; bytes that are not
//!   valid UTF-8 are read as ISO-8859-1.

use std::collections::BTreeMap;
use std::fs;
use std::iter::Peekable;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::Chars;

use crate::error::{EngineError, EngineResult};

/// Name of the filter file, e.g. `en.properties`.
pub const FILTER: &str = "filter";
/// Filter file name without its last extension.
pub const FILTER_BASE_NAME: &str = "filterBaseName";
/// Last extension of the filter file name.
pub const FILTER_EXTENSION: &str = "filterExtension";
/// Name of the source template, e.g. `greet.tmpl`.
pub const SOURCE: &str = "source";
/// Source template name without its last extension.
pub const SOURCE_BASE_NAME: &str = "sourceBaseName";
/// Last extension of the source template name.
pub const SOURCE_EXTENSION: &str = "sourceExtension";

/// Immutable, key-ordered string mapping used to resolve placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    values: BTreeMap<String, String>,
}

impl PropertyBag {
    /// Start building a bag.
    #[must_use]
    pub fn builder() -> PropertyBagBuilder {
        PropertyBagBuilder::default()
    }

    /// Value for `key`, if any layer supplied one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::builder().layer(iter).build()
    }
}

/// Accumulates property layers; each layer shadows the ones before it.
#[derive(Debug, Clone, Default)]
pub struct PropertyBagBuilder {
    values: BTreeMap<String, String>,
}

impl PropertyBagBuilder {
    /// Apply a layer on top of the current entries.
    #[must_use]
    pub fn layer<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.values.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Apply the six file-name derived keys and finish the bag.
    ///
    /// Applied last, so filter file entries cannot override them.
    #[must_use]
    pub fn with_synthetic_keys(self, filter: &Path, source: &Path) -> PropertyBag {
        self.layer(synthetic_keys(filter, source)).build()
    }

    /// Finish the bag.
    #[must_use]
    pub fn build(self) -> PropertyBag {
        PropertyBag {
            values: self.values,
        }
    }
}

/// The six derived keys for a filter/source pair.
#[must_use]
pub fn synthetic_keys(filter: &Path, source: &Path) -> [(&'static str, String); 6] {
    let filter_name = file_name(filter);
    let source_name = file_name(source);
    [
        (FILTER_BASE_NAME, base_name(&filter_name).to_string()),
        (FILTER_EXTENSION, extension(&filter_name).to_string()),
        (SOURCE_BASE_NAME, base_name(&source_name).to_string()),
        (SOURCE_EXTENSION, extension(&source_name).to_string()),
        (FILTER, filter_name),
        (SOURCE, source_name),
    ]
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name without its last extension; a leading dot does not start an extension.
#[must_use]
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

/// Text after the last dot; empty when there is none or it is the first character.
#[must_use]
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[index + 1..],
        _ => "",
    }
}

/// Read a filter file into ordered entries; later duplicates win when layered.
///
/// # Errors
///
/// Returns [`EngineError::ReadFilter`] when the file cannot be read.
pub fn load_properties(path: &Path) -> EngineResult<Vec<(String, String)>> {
    let bytes = fs::read(path).map_err(|source| EngineError::ReadFilter {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = String::from_utf8(bytes)
        .unwrap_or_else(|err| err.into_bytes().into_iter().map(char::from).collect());
    Ok(parse_properties(&raw))
}

/// Parse `.properties` text.
///
/// Malformed `\u` escapes keep the `u` and the text after it; UTF-16
/// surrogate pairs written as two escapes decode to one character.
#[must_use]
pub fn parse_properties(raw: &str) -> Vec<(String, String)> {
    logical_lines(raw)
        .into_iter()
        .map(|line| split_entry(&line))
        .collect()
}

const BLANKS: [char; 3] = [' ', '\t', '\u{c}'];
const HIGH_SURROGATES: RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: RangeInclusive<u16> = 0xDC00..=0xDFFF;

fn logical_lines(raw: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for natural in natural_lines(raw) {
        let trimmed = natural.trim_start_matches(BLANKS);
        let continuing = pending.take();
        if continuing.is_none() && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
            continue;
        }

        let mut line = continuing.unwrap_or_default();
        if ends_with_continuation(trimmed) {
            line.push_str(&trimmed[..trimmed.len() - 1]);
            pending = Some(line);
        } else {
            line.push_str(trimmed);
            lines.push(line);
        }
    }
    if let Some(line) = pending {
        lines.push(line);
    }
    lines
}

/// Lines terminated by `\r\n`, `\r` or `\n`.
fn natural_lines(raw: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = raw.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch != '\r' && ch != '\n' {
            continue;
        }
        lines.push(&raw[start..index]);
        if ch == '\r' {
            let _crlf = chars.next_if(|(_, next)| *next == '\n');
        }
        start = chars.peek().map_or(raw.len(), |(next, _)| *next);
    }
    if start < raw.len() {
        lines.push(&raw[start..]);
    }
    lines
}

/// An odd run of trailing backslashes joins the next line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escaped(&mut key, escaped, &mut chars);
                }
            }
            '=' | ':' => break,
            ' ' | '\t' | '\u{c}' => {
                skip_blanks(&mut chars);
                let _separator = chars.next_if(|next| matches!(next, '=' | ':'));
                break;
            }
            other => key.push(other),
        }
    }

    skip_blanks(&mut chars);
    let mut value = String::new();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                push_escaped(&mut value, escaped, &mut chars);
            }
        } else {
            value.push(ch);
        }
    }
    (key, value)
}

fn skip_blanks(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| BLANKS.contains(ch)).is_some() {}
}

fn push_escaped(out: &mut String, escaped: char, rest: &mut Peekable<Chars<'_>>) {
    match escaped {
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        'f' => out.push('\u{c}'),
        'u' => match read_code_unit(rest) {
            Some(unit) => push_code_unit(out, unit, rest),
            None => out.push('u'),
        },
        other => out.push(other),
    }
}

/// Four hex digits of a `\u` escape, consumed only when well formed.
fn read_code_unit(rest: &mut Peekable<Chars<'_>>) -> Option<u16> {
    let digits: String = rest.clone().take(4).collect();
    if digits.chars().count() != 4 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u16::from_str_radix(&digits, 16).ok()?;
    for _ in 0..4 {
        rest.next();
    }
    Some(unit)
}

/// A high surrogate pairs with an immediately following `\uXXXX` low
/// surrogate; unpaired surrogates become U+FFFD.
fn push_code_unit(out: &mut String, unit: u16, rest: &mut Peekable<Chars<'_>>) {
    let decoded = if HIGH_SURROGATES.contains(&unit) {
        take_low_surrogate(rest).and_then(|low| char::decode_utf16([unit, low]).next()?.ok())
    } else {
        char::from_u32(u32::from(unit))
    };
    out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
}

fn take_low_surrogate(rest: &mut Peekable<Chars<'_>>) -> Option<u16> {
    let mut lookahead = rest.clone();
    if lookahead.next()? != '\\' || lookahead.next()? != 'u' {
        return None;
    }
    let low = read_code_unit(&mut lookahead).filter(|low| LOW_SURROGATES.contains(low))?;
    *rest = lookahead;
    Some(low)
}
