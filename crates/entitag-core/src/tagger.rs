//! # Trainable Tagger Model
//!
//! Feature-based perceptron tagger with a learned transition matrix and
//! Viterbi decoding. Starts blank: the label vocabulary is built from the
//! training data, with no prior entity knowledge. Persisted as a single
//! `model.json` inside the model directory.

use std::collections::HashMap;
use std::path::Path;

use oorandom::Rand32;
use serde::{Deserialize, Serialize};

use crate::error::{EntitagError, Result};
use crate::span::{entities_from_labels, RecognizedEntity};
use crate::tokenizer::{Token, Tokenizer};
use crate::viterbi::ViterbiDecoder;

/// Filename of the serialized model inside its artifact directory.
pub const MODEL_FILE: &str = "model.json";

/// A tokenized sentence with gold label ids, ready for training.
#[derive(Debug, Clone)]
pub struct TaggedSentence {
    pub tokens: Vec<Token>,
    pub labels: Vec<usize>,
}

/// Perceptron sequence tagger over BIO labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerModel {
    /// Label vocabulary; index 0 is always `"O"`.
    labels: Vec<String>,
    /// Sparse feature weights, one score per label.
    weights: HashMap<String, Vec<f32>>,
    /// Flat transition matrix indexed as `to * num_labels + from`.
    transitions: Vec<f32>,
}

impl TaggerModel {
    /// Create a blank model knowing only the `"O"` label.
    pub fn blank() -> Self {
        Self {
            labels: vec!["O".to_string()],
            weights: HashMap::new(),
            transitions: vec![0.0],
        }
    }

    /// Register an entity type, adding its `B-` and `I-` labels.
    pub fn add_entity_type(&mut self, entity_type: &str) {
        let begin = format!("B-{entity_type}");
        if !self.labels.contains(&begin) {
            self.labels.push(begin);
            self.labels.push(format!("I-{entity_type}"));
        }
        let n = self.labels.len();
        for row in self.weights.values_mut() {
            row.resize(n, 0.0);
        }
        self.transitions = vec![0.0; n * n];
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Extract sparse features for the token at `i`.
    fn features(tokens: &[Token], i: usize) -> Vec<String> {
        let text = &tokens[i].text;
        let lower = text.to_lowercase();
        let chars: Vec<char> = text.chars().collect();

        let mut feats = vec![
            "bias".to_string(),
            format!("w={lower}"),
            format!("suf3={}", suffix(&lower, 3)),
            format!("shape={}", shape(&chars)),
        ];
        if chars.len() > 1 && chars.iter().all(|c| !c.is_alphabetic() || c.is_uppercase()) {
            feats.push("upper".to_string());
        }
        if chars.first().is_some_and(|c| c.is_uppercase()) {
            feats.push("title".to_string());
        }
        if chars.iter().any(|c| c.is_ascii_digit()) {
            feats.push("digit".to_string());
        }
        match i.checked_sub(1).and_then(|p| tokens.get(p)) {
            Some(prev) => feats.push(format!("prev={}", prev.text.to_lowercase())),
            None => feats.push("prev=<s>".to_string()),
        }
        match tokens.get(i + 1) {
            Some(next) => feats.push(format!("next={}", next.text.to_lowercase())),
            None => feats.push("next=</s>".to_string()),
        }
        feats
    }

    fn emissions(&self, tokens: &[Token]) -> Vec<Vec<f32>> {
        let n = self.num_labels();
        tokens
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let mut scores = vec![0.0f32; n];
                for feat in Self::features(tokens, i) {
                    if let Some(row) = self.weights.get(&feat) {
                        for (score, w) in scores.iter_mut().zip(row.iter()) {
                            *score += w;
                        }
                    }
                }
                scores
            })
            .collect()
    }

    /// Predict label ids for a token sequence.
    pub fn predict(&self, tokens: &[Token]) -> Vec<usize> {
        let emissions = self.emissions(tokens);
        ViterbiDecoder::new(self.num_labels()).decode(&emissions, &self.transitions)
    }

    /// Predict label strings for a token sequence.
    pub fn predict_labels(&self, tokens: &[Token]) -> Vec<&str> {
        self.predict(tokens)
            .into_iter()
            .map(|id| self.labels[id].as_str())
            .collect()
    }

    /// Apply one perceptron update over a batch of sentences.
    ///
    /// Deltas are accumulated across the whole batch and applied once.
    /// Each active feature is dropped with probability `dropout` before
    /// contributing to the update. Returns the number of mispredicted
    /// tokens in the batch.
    pub fn update_batch(
        &mut self,
        batch: &[&TaggedSentence],
        lr: f32,
        dropout: f32,
        rng: &mut Rand32,
    ) -> usize {
        let n = self.num_labels();
        let mut feat_delta: HashMap<(String, usize), f32> = HashMap::new();
        let mut trans_delta: HashMap<usize, f32> = HashMap::new();
        let mut mispredicted = 0;

        for sentence in batch {
            if sentence.tokens.is_empty() {
                continue;
            }
            let preds = self.predict(&sentence.tokens);

            for (i, (&pred, &gold)) in preds.iter().zip(sentence.labels.iter()).enumerate() {
                if pred == gold {
                    continue;
                }
                mispredicted += 1;
                for feat in Self::features(&sentence.tokens, i) {
                    if dropout > 0.0 && rng.rand_float() < dropout {
                        continue;
                    }
                    *feat_delta.entry((feat.clone(), gold)).or_insert(0.0) += lr;
                    *feat_delta.entry((feat, pred)).or_insert(0.0) -= lr;
                }
            }

            for i in 1..sentence.labels.len().min(preds.len()) {
                let (from, to) = (preds[i - 1], preds[i]);
                let (gold_from, gold_to) = (sentence.labels[i - 1], sentence.labels[i]);
                if from != gold_from || to != gold_to {
                    *trans_delta.entry(to * n + from).or_insert(0.0) -= 0.01;
                    *trans_delta.entry(gold_to * n + gold_from).or_insert(0.0) += 0.01;
                }
            }
        }

        for ((feat, label), delta) in feat_delta {
            let row = self.weights.entry(feat).or_insert_with(|| vec![0.0; n]);
            row[label] += delta;
        }
        for (idx, delta) in trans_delta {
            self.transitions[idx] += delta;
        }

        mispredicted
    }

    /// Recognize entities in free text.
    pub fn recognize(&self, text: &str) -> Vec<RecognizedEntity> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let tokens = Tokenizer::new().tokenize(text);
        let labels = self.predict_labels(&tokens);
        entities_from_labels(text, &tokens, &labels)
    }

    /// Persist the model into a directory, creating it if absent.
    ///
    /// The directory is overwritten in place; there is no versioning.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| EntitagError::ModelPersist(format!("{}: {e}", dir.display())))?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EntitagError::ModelPersist(e.to_string()))?;
        let path = dir.join(MODEL_FILE);
        std::fs::write(&path, json)
            .map_err(|e| EntitagError::ModelPersist(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    /// Load a model from its artifact directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MODEL_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| EntitagError::ModelLoad(format!("{}: {e}", path.display())))?;
        let model: TaggerModel = serde_json::from_str(&content)
            .map_err(|e| EntitagError::ModelLoad(format!("{}: {e}", path.display())))?;

        let n = model.labels.len();
        if n == 0 || model.labels[0] != "O" {
            return Err(EntitagError::ModelLoad(
                "label vocabulary must start with \"O\"".to_string(),
            ));
        }
        if model.transitions.len() != n * n {
            return Err(EntitagError::ModelLoad(format!(
                "transition matrix has {} entries, expected {}",
                model.transitions.len(),
                n * n
            )));
        }
        if model.weights.values().any(|row| row.len() != n) {
            return Err(EntitagError::ModelLoad(
                "feature weight row length does not match label count".to_string(),
            ));
        }
        Ok(model)
    }
}

fn suffix(lower: &str, len: usize) -> String {
    let chars: Vec<char> = lower.chars().collect();
    let start = chars.len().saturating_sub(len);
    chars[start..].iter().collect()
}

fn shape(chars: &[char]) -> String {
    let mut out = String::new();
    let mut last = None;
    for &c in chars {
        let mapped = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_ascii_digit() {
            'd'
        } else {
            c
        };
        if last != Some(mapped) {
            out.push(mapped);
            last = Some(mapped);
        }
    }
    out
}
