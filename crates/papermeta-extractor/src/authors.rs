//! Author resolution from the first lines of a paper
//!
//! Each leading line is annotated on its own rather than reusing the
//! whole-document annotation, so that affiliations and title words on the
//! same page do not bleed into the name spans.

use once_cell::sync::Lazy;
use regex::Regex;

use papermeta_core::{ExtractionConfig, Result};

use crate::annotate::EntityAnnotator;
use crate::normalize::normalize;
use crate::{document_lines, Annotation, EntityKind};

static DIGITS_OR_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+|,").unwrap());

/// Remove affiliation digits and commas from a name, then trim it
pub fn clean_author_name(name: &str) -> String {
    DIGITS_OR_COMMAS.replace_all(name, "").trim().to_string()
}

/// Build the author string from per-line annotations.
///
/// PERSON entities are taken in encounter order, cleaned, empties dropped,
/// capped at `max_authors`, joined with ", " and normalized. Returns an empty
/// string when no name survives.
pub fn authors_from_line_annotations<'a, I>(lines: I, max_authors: usize) -> String
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let names: Vec<String> = lines
        .into_iter()
        .flat_map(|annotation| annotation.entities_of_kind(EntityKind::Person))
        .map(|entity| clean_author_name(&entity.text))
        .filter(|name| !name.is_empty())
        .take(max_authors)
        .collect();

    normalize(&names.join(", "))
}

/// Annotate the first `config.author_lines` lines individually.
pub fn annotate_author_lines(
    text: &str,
    annotator: &EntityAnnotator,
    config: &ExtractionConfig,
) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::with_capacity(config.author_lines);
    for line in document_lines(text).take(config.author_lines) {
        // a blank line carries no entities
        if line.trim().is_empty() {
            continue;
        }
        annotations.push(annotator.annotate_line(line)?);
    }
    Ok(annotations)
}

/// Annotate the leading lines and resolve the author string from them.
pub fn resolve_authors(
    text: &str,
    annotator: &EntityAnnotator,
    config: &ExtractionConfig,
) -> Result<String> {
    let annotations = annotate_author_lines(text, annotator, config)?;
    Ok(authors_from_line_annotations(
        &annotations,
        config.max_authors,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, EntityEngine};
    use std::sync::{Arc, Mutex};

    fn person_line(names: &[&str]) -> Annotation {
        Annotation::new(
            names
                .iter()
                .map(|n| Entity::new(*n, EntityKind::Person, 0, n.len()))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn test_clean_author_name() {
        assert_eq!(clean_author_name("John Smith1,2"), "John Smith");
        assert_eq!(clean_author_name("  Jane Doe*  "), "Jane Doe*");
        assert_eq!(clean_author_name("1, 2"), "");
    }

    #[test]
    fn test_caps_at_three_in_encounter_order() {
        let lines = vec![
            person_line(&["Alice Adams", "Bob Brown"]),
            person_line(&["Carol Chen", "Dan Diaz"]),
        ];
        assert_eq!(
            authors_from_line_annotations(&lines, 3),
            "Alice Adams, Bob Brown, Carol Chen"
        );
    }

    #[test]
    fn test_empty_names_do_not_use_up_slots() {
        let lines = vec![person_line(&["12", "Alice Adams", ",", "Bob Brown"])];
        assert_eq!(authors_from_line_annotations(&lines, 3), "Alice Adams, Bob Brown");
    }

    #[test]
    fn test_only_person_entities_count() {
        let line = Annotation::new(
            vec![
                Entity::new("2021", EntityKind::Date, 0, 4),
                Entity::new("MIT", EntityKind::Org, 5, 8),
            ],
            vec![],
        );
        assert_eq!(authors_from_line_annotations([&line], 3), "");
    }

    #[test]
    fn test_normalization_drops_periods() {
        let lines = vec![person_line(&["J. K. Rowling", "Seán O'Brien"])];
        assert_eq!(
            authors_from_line_annotations(&lines, 3),
            "J K Rowling, San OBrien"
        );
    }

    /// Records every text it is asked to annotate
    struct RecordingEngine {
        seen: Mutex<Vec<String>>,
    }

    impl EntityEngine for RecordingEngine {
        fn engine_id(&self) -> &str {
            "recording"
        }

        fn annotate(&self, text: &str) -> Result<Annotation> {
            self.seen.lock().unwrap().push(text.to_string());
            if text.contains("Jane") {
                Ok(person_line(&["Jane Doe"]))
            } else {
                Ok(Annotation::default())
            }
        }
    }

    #[test]
    fn test_resolve_annotates_each_leading_line() {
        let engine = Arc::new(RecordingEngine {
            seen: Mutex::new(Vec::new()),
        });
        let annotator = EntityAnnotator::new(engine.clone());
        let text = "A Study of Things\n\nJane Doe\nline four Jane\n";

        let authors = resolve_authors(text, &annotator, &ExtractionConfig::default()).unwrap();
        assert_eq!(authors, "Jane Doe");

        let seen = engine.seen.lock().unwrap();
        assert_eq!(*seen, vec!["A Study of Things".to_string(), "Jane Doe".to_string()]);
    }
}
