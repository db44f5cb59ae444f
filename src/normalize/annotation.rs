//! Trailing annotations on a task line.
//!
//! Recognised forms, read right to left from the end of the line:
//! `[key: value]`, `[tag]`, `#tag`, `[depends: a, b]` and `(depends on a, b)`.
//! Anything else ends the scan and stays part of the title.

use std::sync::LazyLock;

use regex::Regex;

use crate::task::{Metadata, MetadataValue};

static KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid key regex"));
static HASH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z][A-Za-z0-9_-]*)$").expect("valid tag regex"));

const DEPENDENCY_KEYS: &[&str] = &["depends", "depends_on", "depends-on", "after", "requires"];
const DEPENDENCY_PHRASE: &str = "depends on";
const LABEL_KEYS: &[&str] = &["labels", "label", "tags", "tag"];

/// Key under which labels accumulate.
pub const LABELS: &str = "labels";

/// Annotations split off a task line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Captured key/value pairs and labels.
    pub metadata: Metadata,
    /// Raw dependency references (ids or titles), in order of appearance.
    pub depends: Vec<String>,
}

enum Trailing {
    Pair(String, String),
    Label(String),
    Depends(Vec<String>),
}

/// Splits trailing annotations off `text`, returning the remaining title.
#[must_use]
pub fn split_trailing(text: &str) -> (String, Annotations) {
    let mut rest = text.trim();
    let mut found = Vec::new();

    loop {
        if let Some((head, inner)) = strip_enclosed(rest, '[', ']') {
            found.push(classify_bracket(inner));
            rest = head;
        } else if let Some((head, refs)) =
            strip_enclosed(rest, '(', ')').and_then(|(head, inner)| {
                dependency_clause(inner).map(|refs| (head, refs))
            })
        {
            found.push(Trailing::Depends(refs));
            rest = head;
        } else if let Some(caps) = HASH_TAG.captures(rest) {
            let whole = caps.get(0).map_or(0, |m| m.start());
            found.push(Trailing::Label(caps[1].to_string()));
            rest = rest[..whole].trim_end();
        } else {
            break;
        }
    }

    found.reverse();
    let mut annotations = Annotations::default();
    for item in found {
        annotations.absorb(item);
    }
    (rest.to_string(), annotations)
}

impl Annotations {
    fn absorb(&mut self, item: Trailing) {
        match item {
            Trailing::Depends(refs) => {
                for r in refs {
                    if !self.depends.contains(&r) {
                        self.depends.push(r);
                    }
                }
            }
            Trailing::Label(label) => self.add_labels(std::iter::once(label)),
            Trailing::Pair(key, value) if LABEL_KEYS.contains(&key.as_str()) => {
                self.add_labels(split_list(&value));
            }
            Trailing::Pair(key, value) => {
                if value.is_empty() || self.metadata.contains_key(&key) {
                    tracing::debug!(%key, "ignoring empty or repeated annotation");
                    return;
                }
                self.metadata.insert(key, MetadataValue::infer(&value));
            }
        }
    }

    /// Appends labels, skipping ones already present.
    pub fn add_labels(&mut self, labels: impl IntoIterator<Item = String>) {
        let entry =
            self.metadata.entry(LABELS.to_string()).or_insert_with(|| MetadataValue::List(Vec::new()));
        if !matches!(entry, MetadataValue::List(_)) {
            let previous = entry.display();
            *entry = MetadataValue::List(vec![previous]);
        }
        let MetadataValue::List(existing) = entry else {
            return;
        };
        for label in labels {
            if !label.is_empty() && !existing.contains(&label) {
                existing.push(label);
            }
        }
        if existing.is_empty() {
            self.metadata.remove(LABELS);
        }
    }
}

/// Strips a trailing `open…close` group that starts the text or follows whitespace.
fn strip_enclosed(text: &str, open: char, close: char) -> Option<(&str, &str)> {
    let body = text.strip_suffix(close)?;
    let start = body.rfind(open)?;
    let before = &body[..start];
    if !(before.is_empty() || before.ends_with(char::is_whitespace)) {
        return None;
    }
    let inner = body[start + open.len_utf8()..].trim();
    if inner.is_empty() {
        return None;
    }
    Some((before.trim_end(), inner))
}

fn classify_bracket(inner: &str) -> Trailing {
    if let Some((key, value)) = inner.split_once(':') {
        let key = key.trim();
        if KEY.is_match(key) {
            let key = key.to_ascii_lowercase();
            if DEPENDENCY_KEYS.contains(&key.as_str()) {
                return Trailing::Depends(split_refs(value));
            }
            return Trailing::Pair(key, value.trim().to_string());
        }
    }
    Trailing::Label(inner.to_string())
}

/// Reads `depends on a, b` inside parentheses. Other remarks such as
/// `(after lunch)` are not dependency clauses.
fn dependency_clause(inner: &str) -> Option<Vec<String>> {
    let lower = inner.to_ascii_lowercase();
    let rest = lower.strip_prefix(DEPENDENCY_PHRASE)?;
    if !(rest.starts_with(':') || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    // Same byte offsets: ASCII lowercasing keeps lengths.
    let refs = inner[DEPENDENCY_PHRASE.len()..].trim_start_matches(':');
    let refs = split_refs(refs);
    (!refs.is_empty()).then_some(refs)
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Splits a comma-separated reference list into cleaned references.
#[must_use]
pub fn split_refs(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|r| r.trim().trim_matches(|c| c == '`' || c == '"' || c == '\''))
        .map(|r| match r.strip_prefix('#') {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => r,
        })
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}
