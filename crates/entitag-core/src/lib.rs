//! # Entitag Core
//!
//! Named-entity recognition building blocks: per-dataset BIO label tables,
//! BIO-to-span conversion over reconstructed text, a whitespace tokenizer
//! with character offsets, a trainable perceptron tagger, and a heuristic
//! fallback recognizer behind a unified load interface.
//!
//! ## Quick Start
//!
//! ```rust
//! use entitag_core::span::spans_from_bio;
//!
//! let spans = spans_from_bio(&["Paris"], &["B-LOC"]);
//! assert_eq!((spans[0].start, spans[0].end), (0, 5));
//! assert_eq!(spans[0].label, "LOC");
//! ```
pub mod error;
pub mod heuristic;
pub mod labels;
pub mod recognizer;
pub mod span;
pub mod tagger;
pub mod tokenizer;
pub mod viterbi;

// Re-export primary API
pub use error::{EntitagError, Result};
pub use heuristic::HeuristicRecognizer;
pub use labels::Dataset;
pub use recognizer::{count_labels, ModelSource, Recognizer};
pub use span::{
    entities_from_labels, join_tokens, spans_from_bio, EntitySpan, RecognizedEntity,
    TrainingRecord,
};
pub use tagger::{TaggedSentence, TaggerModel, MODEL_FILE};
pub use tokenizer::{Token, Tokenizer};
pub use viterbi::ViterbiDecoder;
