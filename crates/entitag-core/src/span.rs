//! # BIO-to-Span Conversion
//!
//! Reduces parallel token/label sequences into half-open character-offset
//! entity spans, and defines the record types persisted in the exported
//! training JSON files.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{char_slice, Token};

/// A half-open character-offset span with an entity type label.
///
/// Serialized as the 3-element JSON array `[start, end, "TYPE"]` used by
/// the training data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Serialize for EntitySpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.start, self.end, &self.label).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EntitySpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (start, end, label) = <(usize, usize, String)>::deserialize(deserializer)?;
        Ok(EntitySpan { start, end, label })
    }
}

/// One exported training example: reconstructed text plus its entity spans.
///
/// Records with no entities are filtered out before export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub text: String,
    pub entities: Vec<EntitySpan>,
}

/// An entity recognized in free text, with the covered text included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Reconstruct text by joining tokens with single spaces.
pub fn join_tokens<T: AsRef<str>>(tokens: &[T]) -> String {
    let mut text = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(token.as_ref());
    }
    text
}

/// Convert parallel token and BIO label sequences into entity spans.
///
/// Single left-to-right pass. The character cursor advances by the token's
/// character length plus one after every token, mirroring the single-space
/// joining used to reconstruct the text. An `I-` label extends whatever
/// span is currently open without re-checking its type, and an `I-` with
/// no open span contributes nothing; both are inherited from the upstream
/// data contract. A span still open after the last token is flushed.
///
/// # Examples
/// ```
/// use entitag_core::span::spans_from_bio;
///
/// let spans = spans_from_bio(&["Tom", "met", "Jerry"], &["B-PER", "O", "B-PER"]);
/// assert_eq!(spans.len(), 2);
/// assert_eq!((spans[0].start, spans[0].end), (0, 3));
/// assert_eq!((spans[1].start, spans[1].end), (8, 13));
/// ```
pub fn spans_from_bio<T, L>(tokens: &[T], labels: &[L]) -> Vec<EntitySpan>
where
    T: AsRef<str>,
    L: AsRef<str>,
{
    let mut spans = Vec::new();
    let mut open: Option<EntitySpan> = None;
    let mut cursor = 0usize;

    for (token, label) in tokens.iter().zip(labels.iter()) {
        let token_len = token.as_ref().chars().count();
        let label = label.as_ref();

        if let Some(ty) = label.strip_prefix("B-") {
            if let Some(span) = open.take() {
                spans.push(span);
            }
            open = Some(EntitySpan {
                start: cursor,
                end: cursor + token_len,
                label: ty.to_string(),
            });
        } else if label.starts_with("I-") && open.is_some() {
            if let Some(span) = open.as_mut() {
                span.end = cursor + token_len;
            }
        } else if let Some(span) = open.take() {
            spans.push(span);
        }

        cursor += token_len + 1;
    }

    if let Some(span) = open {
        spans.push(span);
    }

    spans
}

/// Assemble recognized entities from predicted BIO labels over real tokens.
///
/// Unlike [`spans_from_bio`], offsets come from the tokens themselves, so
/// this works on arbitrary input text rather than space-joined token lists.
pub fn entities_from_labels<L: AsRef<str>>(
    text: &str,
    tokens: &[Token],
    labels: &[L],
) -> Vec<RecognizedEntity> {
    let mut entities = Vec::new();
    let mut open: Option<(usize, usize, String)> = None;

    for (token, label) in tokens.iter().zip(labels.iter()) {
        let label = label.as_ref();

        if let Some(ty) = label.strip_prefix("B-") {
            if let Some((start, end, ty)) = open.take() {
                entities.push(make_entity(text, start, end, ty));
            }
            open = Some((token.start, token.end, ty.to_string()));
        } else if label.starts_with("I-") && open.is_some() {
            if let Some(span) = open.as_mut() {
                span.1 = token.end;
            }
        } else if let Some((start, end, ty)) = open.take() {
            entities.push(make_entity(text, start, end, ty));
        }
    }

    if let Some((start, end, ty)) = open {
        entities.push(make_entity(text, start, end, ty));
    }

    entities
}

fn make_entity(text: &str, start: usize, end: usize, label: String) -> RecognizedEntity {
    RecognizedEntity {
        text: char_slice(text, start, end),
        label,
        start,
        end,
    }
}
