//! Entity annotation adapter
//!
//! Wraps the injected `EntityEngine` and offers the two annotation
//! granularities the pipeline needs: the whole document, and single lines.
//! They are kept separate on purpose; an engine can tag a name differently
//! when it sees it in isolation.

use std::sync::Arc;

use papermeta_core::{PapermetaError, Result};

use crate::{Annotation, EntityEngine};

/// Thin adapter over a shared entity engine
#[derive(Clone)]
pub struct EntityAnnotator {
    engine: Arc<dyn EntityEngine>,
}

impl EntityAnnotator {
    pub fn new(engine: Arc<dyn EntityEngine>) -> Self {
        Self { engine }
    }

    /// Identifier of the wrapped engine
    pub fn engine_id(&self) -> &str {
        self.engine.engine_id()
    }

    /// Annotate the full document text
    pub fn annotate_document(&self, text: &str) -> Result<Annotation> {
        let annotation = self.call(text)?;
        tracing::debug!(
            engine = self.engine_id(),
            entities = annotation.entities.len(),
            noun_phrases = annotation.noun_phrases.len(),
            "document annotated"
        );
        Ok(annotation)
    }

    /// Annotate one line on its own
    pub fn annotate_line(&self, line: &str) -> Result<Annotation> {
        self.call(line)
    }

    fn call(&self, text: &str) -> Result<Annotation> {
        self.engine.annotate(text).map_err(|e| match e {
            PapermetaError::EntityEngineFailure(_) => e,
            other => PapermetaError::EntityEngineFailure(other.to_string()),
        })
    }
}

impl std::fmt::Debug for EntityAnnotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityAnnotator")
            .field("engine", &self.engine_id())
            .finish()
    }
}
