//! # Unified Recognizer
//!
//! Wraps the trained tagger and the heuristic fallback behind one
//! interface. Model load is an explicit two-step procedure with a tagged
//! outcome: the custom artifact directory is tried first, a load failure
//! falls back to the built-in heuristic recognizer, and a failure to build
//! the fallback aborts startup.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::heuristic::HeuristicRecognizer;
use crate::span::RecognizedEntity;
use crate::tagger::TaggerModel;

/// Which model ended up serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// The trained artifact directory loaded successfully.
    CustomLoaded,
    /// The artifact was missing or corrupt; the built-in default serves.
    DefaultLoaded,
}

enum Backend {
    Tagger(TaggerModel),
    Heuristic(HeuristicRecognizer),
}

/// Read-only entity recognizer, loaded once at startup.
pub struct Recognizer {
    backend: Backend,
    source: ModelSource,
}

impl Recognizer {
    /// Load the custom model, falling back to the heuristic default.
    ///
    /// Only fallback construction errors propagate; a missing or corrupt
    /// custom artifact is logged and degrades to the default.
    pub fn load(custom_dir: impl AsRef<Path>) -> Result<Self> {
        let custom_dir = custom_dir.as_ref();
        match TaggerModel::load(custom_dir) {
            Ok(model) => {
                info!(dir = %custom_dir.display(), labels = model.num_labels(), "loaded custom model");
                Ok(Self {
                    backend: Backend::Tagger(model),
                    source: ModelSource::CustomLoaded,
                })
            }
            Err(e) => {
                warn!(dir = %custom_dir.display(), error = %e, "custom model unavailable, using default recognizer");
                Ok(Self {
                    backend: Backend::Heuristic(HeuristicRecognizer::new()?),
                    source: ModelSource::DefaultLoaded,
                })
            }
        }
    }

    /// Wrap an already-trained model (used for post-training diagnostics).
    pub fn from_model(model: TaggerModel) -> Self {
        Self {
            backend: Backend::Tagger(model),
            source: ModelSource::CustomLoaded,
        }
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    /// Recognize entities in the given text, in the model's native order.
    pub fn analyze(&self, text: &str) -> Vec<RecognizedEntity> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match &self.backend {
            Backend::Tagger(model) => model.recognize(text),
            Backend::Heuristic(rec) => rec.recognize(text),
        }
    }
}

/// Tally entities per label. Labels with no occurrences are absent.
pub fn count_labels(entities: &[RecognizedEntity]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entity in entities {
        *counts.entry(entity.label.clone()).or_insert(0) += 1;
    }
    counts
}
