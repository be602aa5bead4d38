// crates/rollcall-core/src/tokenizer.rs - Argument tokenizer
//
// Splits a command's argument string into a preamble (untagged leading text)
// and an ordered multi-map from prefix markers (e.g. "n=") to the literal
// values that followed them. Single-valued reads are last-wins; callers that
// need a marker to be single-valued verify that explicitly.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// A prefix marker identifying which field a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Name,
    Phone,
    Email,
    Class,
    Tag,
    Assignment,
    Label,
}

impl Marker {
    /// The literal token as it appears in command text.
    pub const fn token(self) -> &'static str {
        match self {
            Marker::Name => "n=",
            Marker::Phone => "p=",
            Marker::Email => "e=",
            Marker::Class => "c=",
            Marker::Tag => "t=",
            Marker::Assignment => "a=",
            Marker::Label => "l=",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Errors raised by explicit tokenizer verification passes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("duplicate prefixes supplied: {}", .0.iter().map(|m| m.token()).collect::<Vec<_>>().join(" "))]
    DuplicatePrefixes(Vec<Marker>),
}

/// The result of tokenizing one argument string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    preamble: String,
    values: IndexMap<Marker, Vec<String>>,
}

impl TokenMap {
    /// The untagged text before the first recognized marker, trimmed.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last-wins read of a single-valued marker.
    pub fn value(&self, marker: Marker) -> Option<&str> {
        self.values
            .get(&marker)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// All values supplied for a marker, in input order.
    pub fn all_values(&self, marker: Marker) -> &[String] {
        self.values.get(&marker).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, marker: Marker) -> bool {
        self.values.contains_key(&marker)
    }

    /// Fail loudly when any of the listed markers occurred more than once,
    /// naming every offending marker in one error. Distinct from the
    /// last-wins behavior of `value`; callers invoke this for markers that
    /// must be single-valued.
    pub fn verify_no_duplicates(&self, markers: &[Marker]) -> Result<(), TokenizeError> {
        let duplicated: Vec<Marker> = markers
            .iter()
            .copied()
            .filter(|marker| self.all_values(*marker).len() > 1)
            .collect();
        if duplicated.is_empty() {
            Ok(())
        } else {
            Err(TokenizeError::DuplicatePrefixes(duplicated))
        }
    }
}

/// Tokenize `args` against the set of markers relevant to the calling
/// command. A marker is recognized at the start of the string or when
/// preceded by whitespace; each value runs up to the next recognized marker
/// and is trimmed. Unlisted marker tokens are left inside values verbatim.
pub fn tokenize(args: &str, markers: &[Marker]) -> TokenMap {
    let mut hits: Vec<(usize, Marker)> = Vec::new();
    for &marker in markers {
        let token = marker.token();
        let mut from = 0;
        while let Some(found) = args[from..].find(token) {
            let position = from + found;
            let at_boundary = args[..position]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace);
            if at_boundary {
                hits.push((position, marker));
            }
            from = position + token.len();
        }
    }
    hits.sort_by_key(|&(position, _)| position);

    let preamble_end = hits.first().map_or(args.len(), |&(position, _)| position);
    let preamble = args[..preamble_end].trim().to_string();

    let mut values: IndexMap<Marker, Vec<String>> = IndexMap::new();
    for (index, &(position, marker)) in hits.iter().enumerate() {
        let value_start = position + marker.token().len();
        let value_end = hits
            .get(index + 1)
            .map_or(args.len(), |&(next, _)| next);
        let value = args[value_start..value_end].trim().to_string();
        values.entry(marker).or_default().push(value);
    }

    TokenMap { preamble, values }
}
