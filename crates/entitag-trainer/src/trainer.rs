//! # Training Loop
//!
//! Fine-tunes a blank tagger on one exported training-record file. The
//! record set may be uniformly subsampled; every distinct entity type in
//! the (sampled) records is registered on the fresh model before training.
//! Each epoch reshuffles the records and partitions them into batches of
//! compounding size, with one perceptron update per batch and feature
//! dropout of 0.5.
//!
//! There is no checkpointing, early stopping or validation split; an
//! interrupted run loses all progress.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use entitag_core::span::RecognizedEntity;
use entitag_core::tagger::{TaggedSentence, TaggerModel};
use entitag_core::{TrainingRecord, Tokenizer};
use oorandom::Rand32;
use tracing::{info, warn};

/// Batch-size schedule bounds, matching the upstream compounding schedule.
const BATCH_START: f32 = 4.0;
const BATCH_STOP: f32 = 32.0;
const BATCH_FACTOR: f32 = 1.001;

/// Perceptron step size.
const LEARNING_RATE: f32 = 0.1;

/// Feature dropout rate during updates.
const DROPOUT: f32 = 0.5;

/// Illustrative sentences run through the fresh model after training.
const DEMO_SENTENCES: &[&str] = &[
    "Nishtha Sharma works at Microsoft in Pune, India.",
    "Elon Musk founded SpaceX in California in 2002.",
    "Apple CEO Tim Cook announced new products in Cupertino.",
    "The European Union imposed sanctions on Russia.",
    "Amazon acquired Whole Foods for $13.7 billion.",
];

/// Parameters for one training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Exported training-record JSON file.
    pub input: PathBuf,
    /// Model artifact directory, overwritten in place.
    pub output_dir: PathBuf,
    /// Number of passes over the data.
    pub epochs: usize,
    /// Uniform random subset size; `None` trains on everything.
    pub sample_size: Option<usize>,
    /// RNG seed for sampling, shuffling and dropout.
    pub seed: u64,
}

impl TrainConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            epochs: 30,
            sample_size: None,
            seed: 0,
        }
    }
}

/// Load training records from an exported JSON file.
pub fn load_records(path: &Path) -> Result<Vec<TrainingRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("no training data at {}", path.display()))?;
    let records: Vec<TrainingRecord> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    info!(count = records.len(), file = %path.display(), "loaded training records");
    Ok(records)
}

/// Draw a uniform random subset without replacement via partial Fisher-Yates.
fn sample_records(
    mut records: Vec<TrainingRecord>,
    size: usize,
    rng: &mut Rand32,
) -> Vec<TrainingRecord> {
    if size >= records.len() {
        return records;
    }
    let len = records.len();
    for i in 0..size {
        let j = i + rng.rand_range(0..(len - i) as u32) as usize;
        records.swap(i, j);
    }
    records.truncate(size);
    records
}

/// Re-express a record as a tokenized sentence with gold label ids.
///
/// The export writes offsets against space-joined tokens, so every span
/// boundary lands exactly on whitespace-token boundaries here. Spans that
/// cover no token (malformed input) are skipped with a warning.
fn align_record(model: &TaggerModel, record: &TrainingRecord) -> Option<TaggedSentence> {
    let tokens = Tokenizer::new().tokenize(&record.text);
    if tokens.is_empty() {
        return None;
    }

    let outside = 0usize;
    let mut labels = vec![outside; tokens.len()];

    for span in &record.entities {
        let mut first = true;
        let mut matched = false;
        for (i, token) in tokens.iter().enumerate() {
            if token.start >= span.start && token.end <= span.end {
                let prefix = if first { "B-" } else { "I-" };
                if let Some(id) = model.label_index(&format!("{prefix}{}", span.label)) {
                    labels[i] = id;
                    matched = true;
                }
                first = false;
            }
        }
        if !matched {
            warn!(
                start = span.start,
                end = span.end,
                label = %span.label,
                "span covers no token, skipping"
            );
        }
    }

    Some(TaggedSentence { tokens, labels })
}

/// Batch-size schedule: starts at `start`, multiplied by `factor` per
/// batch, capped at `stop`.
pub fn compounding(start: f32, stop: f32, factor: f32) -> impl Iterator<Item = usize> {
    let mut current = start;
    std::iter::from_fn(move || {
        let size = current.min(stop).floor().max(1.0) as usize;
        current *= factor;
        Some(size)
    })
}

/// Partition `len` items into contiguous batches per the compounding schedule.
fn batch_ranges(len: usize) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut sizes = compounding(BATCH_START, BATCH_STOP, BATCH_FACTOR);
    while start < len {
        let size = sizes.next().unwrap_or(1);
        let end = (start + size).min(len);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Train a fresh model on the configured record file and persist it.
pub fn train(config: &TrainConfig) -> Result<TaggerModel> {
    let records = load_records(&config.input)?;
    let mut rng = Rand32::new(config.seed);

    let records = match config.sample_size {
        Some(size) if size < records.len() => {
            info!(sample = size, total = records.len(), "subsampling records");
            sample_records(records, size, &mut rng)
        }
        _ => records,
    };

    // Register every distinct entity type on a blank model.
    let mut model = TaggerModel::blank();
    let types: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.entities.iter().map(|e| e.label.as_str()))
        .collect();
    for ty in &types {
        model.add_entity_type(ty);
    }
    info!(types = types.len(), labels = model.num_labels(), "registered entity labels");

    let mut sentences: Vec<TaggedSentence> = records
        .iter()
        .filter_map(|r| align_record(&model, r))
        .collect();

    info!(
        sentences = sentences.len(),
        epochs = config.epochs,
        "starting training"
    );

    for epoch in 0..config.epochs {
        // Fisher-Yates reshuffle per pass.
        for i in (1..sentences.len()).rev() {
            let j = rng.rand_range(0..(i + 1) as u32) as usize;
            sentences.swap(i, j);
        }

        let mut updates = 0;
        for range in batch_ranges(sentences.len()) {
            let batch: Vec<&TaggedSentence> = sentences[range].iter().collect();
            updates += model.update_batch(&batch, LEARNING_RATE, DROPOUT, &mut rng);
        }

        if (epoch + 1) % 5 == 0 || epoch == 0 {
            info!(
                epoch = epoch + 1,
                total = config.epochs,
                mispredicted = updates,
                "epoch complete"
            );
        }
    }

    model
        .save(&config.output_dir)
        .with_context(|| format!("saving model to {}", config.output_dir.display()))?;
    info!(dir = %config.output_dir.display(), "model saved");

    run_diagnostics(&model);
    Ok(model)
}

/// Run the fixed demo sentences through the fresh model and log the spans.
fn run_diagnostics(model: &TaggerModel) {
    for text in DEMO_SENTENCES {
        let entities: Vec<RecognizedEntity> = model.recognize(text);
        if entities.is_empty() {
            info!(text, "no entities detected");
        } else {
            for e in &entities {
                info!(text, entity = %e.text, label = %e.label, "recognized");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entitag_core::EntitySpan;

    fn record(text: &str, entities: Vec<(usize, usize, &str)>) -> TrainingRecord {
        TrainingRecord {
            text: text.into(),
            entities: entities
                .into_iter()
                .map(|(start, end, label)| EntitySpan {
                    start,
                    end,
                    label: label.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_compounding_schedule() {
        let sizes: Vec<usize> = compounding(4.0, 32.0, 2.0).take(5).collect();
        assert_eq!(sizes, vec![4, 8, 16, 32, 32]);
    }

    #[test]
    fn test_batch_ranges_cover_everything() {
        let ranges = batch_ranges(23);
        assert_eq!(ranges[0], 0..4);
        assert_eq!(ranges.last().unwrap().end, 23);
        let covered: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(covered, 23);
    }

    #[test]
    fn test_sample_is_subset_of_requested_size() {
        let records: Vec<TrainingRecord> = (0..20)
            .map(|i| record(&format!("text {i}"), vec![(0, 4, "PER")]))
            .collect();
        let mut rng = Rand32::new(7);
        let sampled = sample_records(records.clone(), 5, &mut rng);
        assert_eq!(sampled.len(), 5);
        for s in &sampled {
            assert!(records.contains(s));
        }
    }

    #[test]
    fn test_sample_size_larger_than_set_keeps_all() {
        let records = vec![record("a b", vec![(0, 1, "X")])];
        let mut rng = Rand32::new(7);
        assert_eq!(sample_records(records, 10, &mut rng).len(), 1);
    }

    #[test]
    fn test_align_record_builds_bio_labels() {
        let mut model = TaggerModel::blank();
        model.add_entity_type("PER");
        model.add_entity_type("ORG");

        let rec = record(
            "Nishtha Sharma works at Microsoft",
            vec![(0, 14, "PER"), (24, 33, "ORG")],
        );
        let sentence = align_record(&model, &rec).unwrap();
        let labels: Vec<&str> = sentence
            .labels
            .iter()
            .map(|&id| model.labels()[id].as_str())
            .collect();
        assert_eq!(labels, vec!["B-PER", "I-PER", "O", "O", "B-ORG"]);
    }

    #[test]
    fn test_align_record_empty_text() {
        let model = TaggerModel::blank();
        assert!(align_record(&model, &record("", vec![])).is_none());
    }

    #[test]
    fn test_load_records_missing_file_errors() {
        let err = load_records(Path::new("/nonexistent/training.json")).unwrap_err();
        assert!(err.to_string().contains("no training data"));
    }

    #[test]
    fn test_train_end_to_end_persists_model() {
        let dir = std::env::temp_dir().join("entitag_train_e2e");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("records.json");
        let output = dir.join("model");

        let records = vec![
            record("Alice Smith visited Paris", vec![(0, 11, "PER"), (20, 25, "LOC")]),
            record("Bob works in Berlin", vec![(0, 3, "PER"), (13, 19, "LOC")]),
        ];
        std::fs::write(&input, serde_json::to_string_pretty(&records).unwrap()).unwrap();

        let config = TrainConfig {
            input: input.clone(),
            output_dir: output.clone(),
            epochs: 3,
            sample_size: None,
            seed: 1,
        };
        let model = train(&config).unwrap();
        assert!(model.label_index("B-PER").is_some());
        assert!(model.label_index("I-LOC").is_some());
        assert!(output.join(entitag_core::MODEL_FILE).exists());

        let loaded = TaggerModel::load(&output).unwrap();
        assert_eq!(loaded.labels(), model.labels());

        std::fs::remove_dir_all(&dir).ok();
    }
}
