//! # Dataset Exporter
//!
//! Converts a fetched dataset split into the normalized training-record
//! format: space-joined text plus half-open character-offset entity spans.
//! Examples without entities are dropped. Output is a pretty-printed UTF-8
//! JSON array at the dataset's fixed filename.
//!
//! All dataset paths fail fast on fetch or write errors; there are no
//! retries and no partial output files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use entitag_core::span::{join_tokens, spans_from_bio};
use entitag_core::{Dataset, TrainingRecord};
use tracing::info;

use crate::hub::{HubClient, TaggedExample};

/// Parameters for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub dataset: Dataset,
    /// Cap on fetched examples, for smoke runs. `None` fetches the full split.
    pub limit: Option<usize>,
    /// Output path override; defaults to the dataset's fixed filename.
    pub output: Option<PathBuf>,
}

/// What an export run produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub fetched: usize,
    pub kept: usize,
    pub output: PathBuf,
}

/// Convert one raw example into a training record.
///
/// Returns `None` when no entity span comes out of the tag sequence; such
/// examples are filtered from the export.
pub fn convert_example(dataset: Dataset, example: &TaggedExample) -> Option<TrainingRecord> {
    let labels: Vec<String> = example
        .ner_tags
        .iter()
        .map(|&code| dataset.span_label(code).into_owned())
        .collect();

    let entities = spans_from_bio(&example.tokens, &labels);
    if entities.is_empty() {
        return None;
    }

    Some(TrainingRecord {
        text: join_tokens(&example.tokens),
        entities,
    })
}

/// Fetch, convert and persist one dataset's training split.
pub async fn export(client: &HubClient, config: &ExportConfig) -> Result<ExportSummary> {
    let examples = client
        .fetch_train_split(config.dataset, config.limit)
        .await?;
    let fetched = examples.len();
    info!(dataset = %config.dataset, fetched, "converting examples");

    let mut records = Vec::new();
    for (idx, example) in examples.iter().enumerate() {
        if let Some(record) = convert_example(config.dataset, example) {
            records.push(record);
        }
        if (idx + 1) % 1000 == 0 {
            info!(processed = idx + 1, total = fetched, "conversion progress");
        }
    }

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.dataset.output_file()));

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(&output, json)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        kept = records.len(),
        fetched,
        output = %output.display(),
        "export complete"
    );

    Ok(ExportSummary {
        fetched,
        kept: records.len(),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_keeps_examples_with_entities() {
        let example = TaggedExample {
            tokens: vec!["EU".into(), "rejects".into(), "German".into(), "call".into()],
            ner_tags: vec![3, 0, 7, 0],
        };
        let record = convert_example(Dataset::Conll2003, &example).unwrap();
        assert_eq!(record.text, "EU rejects German call");
        assert_eq!(record.entities.len(), 2);
        assert_eq!(record.entities[0].label, "ORG");
        assert_eq!(record.entities[1].label, "MISC");
    }

    #[test]
    fn test_convert_filters_all_outside_examples() {
        let example = TaggedExample {
            tokens: vec!["just".into(), "plain".into(), "words".into()],
            ner_tags: vec![0, 0, 0],
        };
        assert!(convert_example(Dataset::Conll2003, &example).is_none());
    }

    #[test]
    fn test_convert_out_of_range_codes_are_outside() {
        let example = TaggedExample {
            tokens: vec!["odd".into(), "codes".into()],
            ner_tags: vec![42, 99],
        };
        assert!(convert_example(Dataset::Conll2003, &example).is_none());
    }

    #[test]
    fn test_wnut_types_are_uppercased() {
        let example = TaggedExample {
            tokens: vec!["Empire".into(), "Strikes".into(), "Back".into()],
            ner_tags: vec![3, 4, 4],
        };
        let record = convert_example(Dataset::Wnut17, &example).unwrap();
        assert_eq!(record.entities[0].label, "CREATIVE-WORK");
        assert_eq!(record.entities[0].start, 0);
        assert_eq!(record.entities[0].end, 19);
    }

    #[test]
    fn test_exported_json_is_array_of_records() {
        let records = vec![TrainingRecord {
            text: "Paris".into(),
            entities: vec![entitag_core::EntitySpan {
                start: 0,
                end: 5,
                label: "LOC".into(),
            }],
        }];
        let json = serde_json::to_string_pretty(&records).unwrap();
        assert!(json.trim_start().starts_with('['));
        let back: Vec<TrainingRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_non_ascii_text_is_preserved_literally() {
        let records = vec![TrainingRecord {
            text: "São Paulo é grande".into(),
            entities: vec![entitag_core::EntitySpan {
                start: 0,
                end: 9,
                label: "LOC".into(),
            }],
        }];
        let json = serde_json::to_string_pretty(&records).unwrap();
        assert!(json.contains("São Paulo"));
        assert!(!json.contains("\\u"));
    }
}
