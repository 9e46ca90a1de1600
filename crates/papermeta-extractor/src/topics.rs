//! Topic ranking from noun phrases
//!
//! Multi-word noun phrases that do not touch a PERSON entity are counted by
//! exact text, ranked by frequency (ties keep first-appearance order), and
//! cleaned of a leading article.
//!
//! Counting happens before the article is removed, so "the neural network"
//! and "a neural network" are ranked as two separate phrases. When an article
//! is removed the remaining words are rejoined with ", " rather than a space;
//! downstream consumers already store topics in that shape.

use std::collections::HashMap;

use crate::{EntityKind, NounPhrase};

/// Leading words removed from a ranked phrase
pub const ARTICLES: [&str; 3] = ["the", "a", "an"];

/// Citation filler that never counts as a topic
const EXCLUDED: [&str; 2] = ["et al", "etal"];

/// Rank topic phrases and return at most `max_topics` of them
pub fn rank_topics(phrases: &[NounPhrase], max_topics: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for phrase in phrases
        .iter()
        .filter(|p| !p.overlaps(EntityKind::Person) && p.word_count() > 1)
    {
        match positions.get(phrase.text.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(phrase.text.as_str(), counts.len());
                counts.push((phrase.text.as_str(), 1));
            }
        }
    }

    // stable: equal counts stay in first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(text, _)| strip_leading_article(text))
        .filter(|topic| !is_excluded(topic))
        .take(max_topics)
        .collect()
}

/// Drop a leading article, joining the remaining words with ", "
pub fn strip_leading_article(phrase: &str) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    match words.split_first() {
        Some((first, rest)) if ARTICLES.contains(&first.to_lowercase().as_str()) => {
            rest.join(", ")
        }
        _ => phrase.to_string(),
    }
}

fn is_excluded(topic: &str) -> bool {
    let lower = topic.to_lowercase();
    EXCLUDED.contains(&lower.as_str())
}
