//! papermeta Extractor - Metadata extraction pipeline
//!
//! Turns the plain text of a research paper into an `ExtractedRecord` by
//! layering line-position rules, named-entity annotations, regex section
//! matching and noun-phrase frequency ranking.
//!
//! The NLP work itself sits behind the `EntityEngine` trait. The pipeline only
//! consumes the annotation contract defined here: entity spans tagged with a
//! kind, and noun-phrase spans tagged with the kinds of entities they overlap.

use serde::{Deserialize, Serialize};

use papermeta_core::Result;

pub mod annotate;
pub mod authors;
pub mod conclusion;
pub mod date;
pub mod link;
pub mod ner;
pub mod normalize;
pub mod pipeline;
pub mod title;
pub mod topics;

pub use annotate::EntityAnnotator;
pub use ner::RuleBasedEngine;
pub use normalize::normalize;
pub use pipeline::{assemble_record, RecordAssembler};

// ============================================================================
// Annotation Contract
// ============================================================================

/// Kinds of entities an engine may report. Only `Person` and `Date` are
/// consumed by the pipeline; the rest pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Person,
    Date,
    Org,
    Gpe,
    Misc,
}

impl EntityKind {
    /// Get the label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Date => "DATE",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Misc => "MISC",
        }
    }

    /// Map an engine label onto a kind; unrecognized labels become `Misc`.
    ///
    /// The built-in engine tags spans directly. Adapters wrapping an external
    /// NER model (spaCy-style `PER`/`LOC` or OntoNotes `PERSON`/`GPE` tags)
    /// call this from their `EntityEngine::annotate` to translate labels.
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "DATE" => Self::Date,
            "ORG" | "ORGANIZATION" => Self::Org,
            "GPE" | "LOC" | "LOCATION" => Self::Gpe,
            _ => Self::Misc,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span of text tagged with an entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
}

impl Entity {
    pub fn new(text: impl Into<String>, kind: EntityKind, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            start,
            end,
        }
    }

    /// Whether this entity shares at least one byte with `start..end`
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// A contiguous noun-headed phrase and the entity kinds overlapping it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounPhrase {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub entity_kinds: Vec<EntityKind>,
}

impl NounPhrase {
    /// Create a phrase with no known entity overlaps
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            entity_kinds: Vec::new(),
        }
    }

    /// Set the overlapping entity kinds
    pub fn with_entity_kinds(mut self, kinds: Vec<EntityKind>) -> Self {
        self.entity_kinds = kinds;
        self
    }

    /// Whether any overlapping entity has the given kind
    pub fn overlaps(&self, kind: EntityKind) -> bool {
        self.entity_kinds.contains(&kind)
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Everything an engine reports for one piece of text, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub entities: Vec<Entity>,
    pub noun_phrases: Vec<NounPhrase>,
}

impl Annotation {
    pub fn new(entities: Vec<Entity>, noun_phrases: Vec<NounPhrase>) -> Self {
        Self {
            entities,
            noun_phrases,
        }
    }

    /// Build an annotation, filling each phrase's entity kinds from span
    /// intersections with `entities`
    pub fn with_overlaps(entities: Vec<Entity>, noun_phrases: Vec<NounPhrase>) -> Self {
        let noun_phrases = noun_phrases
            .into_iter()
            .map(|mut phrase| {
                for entity in &entities {
                    if entity.intersects(phrase.start, phrase.end)
                        && !phrase.entity_kinds.contains(&entity.kind)
                    {
                        phrase.entity_kinds.push(entity.kind);
                    }
                }
                phrase
            })
            .collect();

        Self {
            entities,
            noun_phrases,
        }
    }

    /// Entities of one kind, in document order
    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// First entity of one kind
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities_of_kind(kind).next()
    }
}

/// Trait for NLP engines that annotate text with entities and noun phrases.
///
/// Engines are loaded once and reused for every document; from the
/// pipeline's point of view they hold no state between calls.
pub trait EntityEngine: Send + Sync {
    /// Engine identifier for logging
    fn engine_id(&self) -> &str;

    /// Annotate a piece of text
    fn annotate(&self, text: &str) -> Result<Annotation>;
}

/// Lines of the document as the line-position heuristics see them:
/// surrounding whitespace removed, then split on `\n`.
pub(crate) fn document_lines(text: &str) -> std::str::Split<'_, char> {
    text.trim().split('\n')
}
