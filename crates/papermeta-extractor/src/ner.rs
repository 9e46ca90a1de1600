//! Rule-based entity engine
//!
//! A dependency-free `EntityEngine` for running the pipeline without an
//! external NLP service:
//! - PERSON: names after an honorific, and runs of capitalized words minus a
//!   vocabulary of words that are common in paper titles and affiliations
//! - DATE: month-name dates, numeric dates and bare years
//! - Noun phrases: maximal runs of content words, optionally led by an
//!   article, split at stopwords and punctuation
//!
//! Recall on unusual names is limited; a model-backed engine can be swapped
//! in through the same trait.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use papermeta_core::Result;

use crate::{Annotation, Entity, EntityEngine, EntityKind, NounPhrase};

// ============================================================================
// Patterns and vocabularies
// ============================================================================

const MONTHS: &str = r"(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)";

static NAME_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)?(?:[ \t]+(?:[A-Z]\.[ \t]*)*[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)?)+",
    )
    .unwrap()
});

static HONORIFIC_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Dr|Prof|Professor|Mr|Mrs|Ms)\.?[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)?)")
        .unwrap()
});

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

static INITIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\.$").unwrap());

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]*").unwrap());

/// Capitalized words that start titles, headings and affiliations far more
/// often than they start names
static NON_NAME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // function words
        "the", "a", "an", "of", "and", "or", "in", "on", "for", "with", "to", "by", "from", "at",
        "via", "towards", "toward", "into", "over", "under", "we", "our", "this", "these", "that",
        "is", "are", "as", "its", "dr", "prof", "professor", "mr", "mrs", "ms",
        // paper structure
        "abstract", "introduction", "background", "conclusion", "conclusions", "references",
        "acknowledgments", "acknowledgements", "appendix", "related", "work", "method", "methods",
        "methodology", "results", "discussion", "evaluation", "experiments", "experiment",
        "table", "figure", "fig", "section", "equation", "theorem", "lemma", "proof",
        "algorithm", "definition", "corollary", "preprint", "draft", "keywords", "index",
        "terms", "proceedings", "conference", "journal", "workshop", "symposium", "volume",
        "corresponding", "author", "authors", "email", "contact", "submitted", "accepted",
        "published", "review", "copyright", "license", "supplementary", "material",
        // affiliations
        "university", "institute", "department", "school", "college", "faculty", "laboratory",
        "lab", "labs", "research", "center", "centre", "group", "division", "academy",
        "national", "international", "science", "sciences", "engineering", "technology",
        "computer", "computing", "information", "mathematics", "physics", "biology", "chemistry",
        "medicine", "medical", "hospital", "foundation", "association", "society", "inc", "corp",
        "ltd", "company", "google", "microsoft", "amazon", "meta", "openai", "deepmind", "ibm",
        "nvidia", "ieee", "acm", "arxiv", "github", "state", "united", "states", "kingdom",
        "new", "york", "san", "los", "north", "south", "east", "west", "american", "european",
        "chinese", "china", "japan", "germany", "france", "india", "canada", "california",
        // common title vocabulary
        "deep", "learning", "machine", "neural", "network", "networks", "model", "models",
        "language", "large", "small", "graph", "graphs", "data", "dataset", "datasets",
        "analysis", "system", "systems", "approach", "framework", "efficient", "robust",
        "scalable", "fast", "novel", "sparse", "dense", "expert", "experts", "mixture",
        "mixtures", "attention", "transformer", "transformers",
        "reinforcement", "generative", "adversarial", "vision", "visual", "image", "images",
        "video", "speech", "text", "semantic", "knowledge", "representation", "representations",
        "training", "inference", "optimization", "learning-based", "self-supervised",
        "supervised", "unsupervised", "multi", "cross", "protein", "proteins", "molecular",
        "quantum", "study", "survey", "benchmark", "evaluating", "understanding", "improving",
        "scaling", "generalization", "prediction", "classification", "detection",
        "segmentation", "retrieval", "generation", "search", "planning", "control", "robot",
        "robotics", "agents", "agent", "multi-agent", "federated", "distributed", "privacy",
        "security", "secure", "open", "general", "universal", "simple", "better", "beyond",
        // calendar
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december", "monday", "tuesday", "wednesday", "thursday",
        "friday", "saturday", "sunday",
    ]
    .into_iter()
    .collect()
});

/// Words that end a noun phrase: pronouns, prepositions, conjunctions,
/// auxiliaries, determiners other than articles, and frequent verbs
static PHRASE_BREAKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "we", "you", "he", "she", "it", "they", "us", "them", "me", "him", "her", "our",
        "their", "its", "his", "my", "your", "this", "that", "these", "those", "each", "every",
        "some", "any", "all", "both", "either", "neither", "no", "not", "nor", "which", "who",
        "whom", "whose", "what", "where", "when", "why", "how", "of", "in", "on", "at", "by",
        "for", "with", "from", "to", "into", "onto", "over", "under", "about", "between",
        "among", "through", "during", "before", "after", "above", "below", "across", "against",
        "within", "without", "via", "per", "upon", "than", "and", "or", "but", "so", "yet",
        "if", "then", "else", "because", "while", "although", "though", "however", "thus",
        "hence", "therefore", "moreover", "furthermore", "also", "very", "more", "most",
        "less", "least", "such", "only", "just", "even", "as", "is", "are", "was", "were",
        "be", "been", "being", "am", "has", "have", "had", "having", "do", "does", "did",
        "can", "could", "may", "might", "must", "shall", "should", "will", "would", "there",
        "here", "show", "shows", "shown", "showed", "propose", "proposes", "proposed",
        "present", "presents", "presented", "use", "uses", "used", "using", "achieve",
        "achieves", "achieved", "demonstrate", "demonstrates", "demonstrated", "introduce",
        "introduces", "introduced", "provide", "provides", "provided", "obtain", "obtains",
        "obtained", "consider", "considers", "considered", "find", "finds", "found", "make",
        "makes", "made", "take", "takes", "taken", "give", "gives", "given", "allow",
        "allows", "allowed", "perform", "performs", "performed", "improve", "improves",
        "improved", "outperform", "outperforms", "outperformed", "evaluate", "evaluates",
        "evaluated", "remain", "remains", "remained", "train", "trains", "trained", "learn",
        "learns", "learned", "go", "goes", "went", "see", "seen", "note", "leads", "lead",
        "require", "requires", "required", "yields", "yield", "enables", "enable",
        "study", "studies", "studied", "reduce", "reduces", "reduced", "help", "helps",
        "helped", "scale", "scales", "scaled",
    ]
    .into_iter()
    .collect()
});

const ARTICLES: [&str; 3] = ["the", "a", "an"];

// ============================================================================
// Rule-based engine
// ============================================================================

/// Rule-based entity engine using regex patterns and word lists
pub struct RuleBasedEngine {
    /// Date patterns, most specific first
    date_patterns: Vec<Regex>,
    /// Longest noun phrase emitted, in words
    max_phrase_words: usize,
}

impl RuleBasedEngine {
    /// Create a new engine with the default date patterns
    pub fn new() -> Self {
        let mut engine = Self {
            date_patterns: Vec::new(),
            max_phrase_words: 5,
        };

        engine.init_date_patterns();
        engine
    }

    fn init_date_patterns(&mut self) {
        // March 3, 2023 / Sept. 14th 2020
        self.add_date_pattern(&format!(
            r"\b{MONTHS}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"
        ));
        // 3 March 2023
        self.add_date_pattern(&format!(
            r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+{MONTHS}\.?,?\s+\d{{4}}\b"
        ));
        // March 2023
        self.add_date_pattern(&format!(r"\b{MONTHS}\.?,?\s+\d{{4}}\b"));
        // 2023-03-14 / 14/03/2023
        self.add_date_pattern(r"\b\d{4}-\d{1,2}-\d{1,2}\b");
        self.add_date_pattern(r"\b\d{1,2}/\d{1,2}/\d{4}\b");
        // bare years
        self.add_date_pattern(r"\b(?:19|20)\d{2}\b");
    }

    fn add_date_pattern(&mut self, pattern: &str) {
        if let Ok(regex) = Regex::new(pattern) {
            self.date_patterns.push(regex);
        }
    }

    /// Extract DATE entities
    fn extract_dates(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for regex in &self.date_patterns {
            for mat in regex.find_iter(text) {
                entities.push(Entity::new(
                    mat.as_str(),
                    EntityKind::Date,
                    mat.start(),
                    mat.end(),
                ));
            }
        }

        entities
    }

    /// Extract PERSON entities from honorifics and capitalized word runs
    fn extract_persons(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for caps in HONORIFIC_NAME.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                entities.push(Entity::new(
                    name.as_str(),
                    EntityKind::Person,
                    name.start(),
                    name.end(),
                ));
            }
        }

        for candidate in NAME_CANDIDATE.find_iter(text) {
            let offset = candidate.start();
            let mut run: Vec<(usize, usize, bool)> = Vec::new();

            for token in TOKEN.find_iter(candidate.as_str()) {
                let word = token.as_str();
                let is_initial = INITIAL.is_match(word);
                let is_name_word = is_initial
                    || !NON_NAME_WORDS.contains(word.to_lowercase().trim_end_matches('.'));

                if is_name_word {
                    run.push((offset + token.start(), offset + token.end(), is_initial));
                } else {
                    flush_name_run(text, &mut run, &mut entities);
                }
            }
            flush_name_run(text, &mut run, &mut entities);
        }

        entities
    }

    /// Extract noun phrases as runs of content words
    fn extract_noun_phrases(&self, text: &str) -> Vec<NounPhrase> {
        let mut phrases = Vec::new();
        let mut chunk = PhraseChunk::default();
        let mut prev_end = 0;

        for mat in WORD.find_iter(text) {
            if !is_soft_gap(&text[prev_end..mat.start()]) {
                chunk.flush(text, &mut phrases);
            }
            prev_end = mat.end();

            let lower = mat.as_str().to_lowercase();
            if ARTICLES.contains(&lower.as_str()) {
                chunk.flush(text, &mut phrases);
                chunk.start_with(mat.start(), mat.end(), false);
            } else if PHRASE_BREAKERS.contains(lower.as_str()) || is_adverb(&lower) {
                chunk.flush(text, &mut phrases);
            } else if chunk.is_open() && chunk.words < self.max_phrase_words {
                chunk.extend(mat.end());
            } else {
                chunk.flush(text, &mut phrases);
                chunk.start_with(mat.start(), mat.end(), true);
            }
        }
        chunk.flush(text, &mut phrases);

        phrases
    }
}

impl Default for RuleBasedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityEngine for RuleBasedEngine {
    fn engine_id(&self) -> &str {
        "rules"
    }

    fn annotate(&self, text: &str) -> Result<Annotation> {
        let mut entities = self.extract_dates(text);
        entities.extend(self.extract_persons(text));
        let entities = deduplicate(entities);

        let phrases = self.extract_noun_phrases(text);
        Ok(Annotation::with_overlaps(entities, phrases))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Emit a PERSON for a run of 2-4 name tokens with at least two full words
fn flush_name_run(text: &str, run: &mut Vec<(usize, usize, bool)>, out: &mut Vec<Entity>) {
    // initials cannot end a name
    while matches!(run.last(), Some((_, _, true))) {
        run.pop();
    }

    let words = run.iter().filter(|(_, _, initial)| !initial).count();
    if (2..=4).contains(&words) {
        if let (Some(first), Some(last)) = (run.first(), run.last()) {
            out.push(Entity::new(
                &text[first.0..last.1],
                EntityKind::Person,
                first.0,
                last.1,
            ));
        }
    }
    run.clear();
}

/// Remove overlapping entities, preferring the earliest then the longest span
fn deduplicate(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut result: Vec<Entity> = Vec::new();
    let mut covered_to = 0;

    for entity in entities {
        if result.is_empty() || entity.start >= covered_to {
            covered_to = entity.end;
            result.push(entity);
        }
    }

    result
}

/// Whitespace between two words that does not end a phrase: spaces, tabs and
/// at most one line break
fn is_soft_gap(gap: &str) -> bool {
    gap.chars().all(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r')
        && gap.matches('\n').count() <= 1
}

fn is_adverb(word: &str) -> bool {
    word.len() > 4 && word.ends_with("ly")
}

/// Noun phrase under construction
#[derive(Default)]
struct PhraseChunk {
    start: Option<usize>,
    end: usize,
    /// Content words so far (articles excluded)
    words: usize,
}

impl PhraseChunk {
    fn is_open(&self) -> bool {
        self.start.is_some()
    }

    fn start_with(&mut self, start: usize, end: usize, content: bool) {
        self.start = Some(start);
        self.end = end;
        self.words = usize::from(content);
    }

    fn extend(&mut self, end: usize) {
        self.end = end;
        self.words += 1;
    }

    fn flush(&mut self, text: &str, out: &mut Vec<NounPhrase>) {
        if let Some(start) = self.start.take() {
            if self.words > 0 {
                let phrase = text[start..self.end]
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push(NounPhrase::new(phrase, start, self.end));
            }
        }
        self.words = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn persons(annotation: &Annotation) -> Vec<&str> {
        annotation
            .entities_of_kind(EntityKind::Person)
            .map(|e| e.text.as_str())
            .collect()
    }

    fn phrases(annotation: &Annotation) -> Vec<&str> {
        annotation
            .noun_phrases
            .iter()
            .map(|p| p.text.as_str())
            .collect()
    }

    #[test]
    fn test_author_line() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("John Smith1, Jane Doe2 and Alan M. Turing").unwrap();
        assert_eq!(persons(&annotation), vec!["John Smith", "Jane Doe", "Alan M. Turing"]);
    }

    #[test]
    fn test_title_words_are_not_people() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("Deep Learning for Proteins").unwrap();
        assert!(persons(&annotation).is_empty());

        let annotation = engine.annotate("Stanford University Department").unwrap();
        assert!(persons(&annotation).is_empty());
    }

    #[test]
    fn test_name_trimmed_out_of_longer_run() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("Abstract Grace Hopper Institute").unwrap();
        assert_eq!(persons(&annotation), vec!["Grace Hopper"]);
    }

    #[test]
    fn test_honorific_allows_single_surname() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("as noted by Prof. Knuth in his letter").unwrap();
        assert_eq!(persons(&annotation), vec!["Knuth"]);
    }

    #[test]
    fn test_dates() {
        let engine = RuleBasedEngine::new();
        let annotation = engine
            .annotate("Submitted on March 3, 2023; revised 14 June 2023 and 2024-01-05.")
            .unwrap();
        let dates: Vec<&str> = annotation
            .entities_of_kind(EntityKind::Date)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(dates, vec!["March 3, 2023", "14 June 2023", "2024-01-05"]);
    }

    #[test]
    fn test_bare_year_and_identifiers() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("arXiv:1706.03762 published in 2017").unwrap();
        let dates: Vec<&str> = annotation
            .entities_of_kind(EntityKind::Date)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(dates, vec!["2017"]);
    }

    #[test]
    fn test_noun_phrases() {
        let engine = RuleBasedEngine::new();
        let annotation = engine
            .annotate("We train the neural network on training data. The results\nwere clear.")
            .unwrap();
        let found = phrases(&annotation);
        assert!(found.contains(&"the neural network"));
        assert!(found.contains(&"training data"));
        assert!(found.contains(&"The results"));
        assert!(!found
            .iter()
            .any(|p| p.split_whitespace().any(|w| w == "on")));
    }

    #[test]
    fn test_phrase_breaks_at_blank_line_and_punctuation() {
        let engine = RuleBasedEngine::new();
        let annotation = engine
            .annotate("graph structure\n\nnode features, edge weights")
            .unwrap();
        assert_eq!(
            phrases(&annotation),
            vec!["graph structure", "node features", "edge weights"]
        );
    }

    #[test]
    fn test_phrase_length_cap() {
        let engine = RuleBasedEngine {
            max_phrase_words: 2,
            ..RuleBasedEngine::new()
        };
        let annotation = engine.annotate("sparse mixture expert routing").unwrap();
        assert_eq!(phrases(&annotation), vec!["sparse mixture", "expert routing"]);
    }

    #[test]
    fn test_person_phrases_are_flagged() {
        let engine = RuleBasedEngine::new();
        let annotation = engine.annotate("results from Grace Hopper were strong").unwrap();
        let hopper = annotation
            .noun_phrases
            .iter()
            .find(|p| p.text == "Grace Hopper")
            .unwrap();
        assert!(hopper.overlaps(EntityKind::Person));
    }

    #[test]
    fn test_deduplicate_prefers_longest() {
        let entities = vec![
            Entity::new("2023", EntityKind::Date, 8, 12),
            Entity::new("March 3, 2023", EntityKind::Date, 0, 12),
            Entity::new("Jane Doe", EntityKind::Person, 20, 28),
        ];
        let result = deduplicate(entities);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "March 3, 2023");
        assert_eq!(result[1].text, "Jane Doe");
    }

    #[test]
    fn test_empty_text() {
        let annotation = RuleBasedEngine::new().annotate("").unwrap();
        assert_eq!(annotation, Annotation::default());
    }
}
