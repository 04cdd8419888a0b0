//! # Label Tables
//!
//! Maps the integer tag codes used by each supported public dataset onto
//! BIO label strings. Each dataset ships its own ordered table; a code
//! outside the table resolves to `"O"` rather than failing, matching the
//! upstream data contract.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// CoNLL-2003 NER tag table (news articles, 4 entity types).
const CONLL2003_LABELS: &[&str] = &[
    "O", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC", "B-MISC", "I-MISC",
];

/// WNUT-17 tag table (social media, 6 entity types, lowercase type names).
const WNUT17_LABELS: &[&str] = &[
    "O",
    "B-corporation",
    "I-corporation",
    "B-creative-work",
    "I-creative-work",
    "B-group",
    "I-group",
    "B-location",
    "I-location",
    "B-person",
    "I-person",
    "B-product",
    "I-product",
];

/// OntoNotes 5.0 tag table (18 entity types).
const ONTONOTES5_LABELS: &[&str] = &[
    "O",
    "B-PERSON",
    "I-PERSON",
    "B-ORG",
    "I-ORG",
    "B-GPE",
    "I-GPE",
    "B-LOC",
    "I-LOC",
    "B-FAC",
    "I-FAC",
    "B-PRODUCT",
    "I-PRODUCT",
    "B-EVENT",
    "I-EVENT",
    "B-WORK_OF_ART",
    "I-WORK_OF_ART",
    "B-LAW",
    "I-LAW",
    "B-LANGUAGE",
    "I-LANGUAGE",
    "B-DATE",
    "I-DATE",
    "B-TIME",
    "I-TIME",
    "B-PERCENT",
    "I-PERCENT",
    "B-MONEY",
    "I-MONEY",
    "B-QUANTITY",
    "I-QUANTITY",
    "B-ORDINAL",
    "I-ORDINAL",
    "B-CARDINAL",
    "I-CARDINAL",
    "B-NORP",
    "I-NORP",
];

/// Supported public NER datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Conll2003,
    Wnut17,
    OntoNotes5,
}

impl Dataset {
    /// All supported datasets in menu order.
    pub fn all() -> &'static [Dataset] {
        &[Dataset::Conll2003, Dataset::Wnut17, Dataset::OntoNotes5]
    }

    /// The ordered BIO label table for this dataset.
    pub fn label_table(&self) -> &'static [&'static str] {
        match self {
            Dataset::Conll2003 => CONLL2003_LABELS,
            Dataset::Wnut17 => WNUT17_LABELS,
            Dataset::OntoNotes5 => ONTONOTES5_LABELS,
        }
    }

    /// Resolve an integer tag code to its BIO label.
    ///
    /// Out-of-range codes resolve to `"O"` instead of erroring; some dataset
    /// exports carry stray codes and the upstream pipeline treats them as
    /// non-entities.
    pub fn resolve(&self, code: usize) -> &'static str {
        self.label_table().get(code).copied().unwrap_or("O")
    }

    /// Resolve a tag code to the label used when building spans.
    ///
    /// WNUT-17 type names are lowercase in the published table but are
    /// upper-cased in the exported spans; the other datasets keep their own
    /// casing.
    pub fn span_label(&self, code: usize) -> Cow<'static, str> {
        let label = self.resolve(code);
        match self {
            Dataset::Wnut17 => {
                if let Some(ty) = label.strip_prefix("B-") {
                    Cow::Owned(format!("B-{}", ty.to_uppercase()))
                } else if let Some(ty) = label.strip_prefix("I-") {
                    Cow::Owned(format!("I-{}", ty.to_uppercase()))
                } else {
                    Cow::Borrowed(label)
                }
            }
            _ => Cow::Borrowed(label),
        }
    }

    /// Fixed output filename for this dataset's exported training records.
    pub fn output_file(&self) -> &'static str {
        match self {
            Dataset::Conll2003 => "conll2003_training_data.json",
            Dataset::Wnut17 => "wnut17_training_data.json",
            Dataset::OntoNotes5 => "ontonotes_training_data.json",
        }
    }

    /// Dataset identifier on the Hugging Face datasets server.
    pub fn hub_dataset(&self) -> &'static str {
        match self {
            Dataset::Conll2003 => "conll2003",
            Dataset::Wnut17 => "wnut_17",
            Dataset::OntoNotes5 => "tner/ontonotes5",
        }
    }

    /// Dataset config name on the Hugging Face datasets server.
    pub fn hub_config(&self) -> &'static str {
        match self {
            Dataset::Conll2003 => "conll2003",
            Dataset::Wnut17 => "wnut_17",
            Dataset::OntoNotes5 => "ontonotes5",
        }
    }

    /// Distinct entity type names in this dataset, in table order.
    pub fn entity_types(&self) -> Vec<String> {
        let mut types = Vec::new();
        for label in self.label_table() {
            if let Some(ty) = label.strip_prefix("B-") {
                let ty = match self {
                    Dataset::Wnut17 => ty.to_uppercase(),
                    _ => ty.to_string(),
                };
                if !types.contains(&ty) {
                    types.push(ty);
                }
            }
        }
        types
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Conll2003 => write!(f, "conll2003"),
            Dataset::Wnut17 => write!(f, "wnut17"),
            Dataset::OntoNotes5 => write!(f, "ontonotes5"),
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conll2003" | "conll" => Ok(Dataset::Conll2003),
            "wnut17" | "wnut_17" | "wnut" => Ok(Dataset::Wnut17),
            "ontonotes5" | "ontonotes" => Ok(Dataset::OntoNotes5),
            other => Err(format!(
                "unknown dataset {:?} (expected conll2003, wnut17 or ontonotes5)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_in_range() {
        assert_eq!(Dataset::Conll2003.resolve(0), "O");
        assert_eq!(Dataset::Conll2003.resolve(1), "B-PER");
        assert_eq!(Dataset::Conll2003.resolve(8), "I-MISC");
        assert_eq!(Dataset::Wnut17.resolve(9), "B-person");
        assert_eq!(Dataset::OntoNotes5.resolve(36), "I-NORP");
    }

    #[test]
    fn test_resolve_out_of_range_is_outside() {
        assert_eq!(Dataset::Conll2003.resolve(9), "O");
        assert_eq!(Dataset::Wnut17.resolve(13), "O");
        assert_eq!(Dataset::OntoNotes5.resolve(999), "O");
    }

    #[test]
    fn test_wnut_span_labels_are_uppercased() {
        assert_eq!(Dataset::Wnut17.span_label(3), "B-CREATIVE-WORK");
        assert_eq!(Dataset::Wnut17.span_label(10), "I-PERSON");
        assert_eq!(Dataset::Wnut17.span_label(0), "O");
    }

    #[test]
    fn test_other_datasets_keep_casing() {
        assert_eq!(Dataset::Conll2003.span_label(1), "B-PER");
        assert_eq!(Dataset::OntoNotes5.span_label(15), "B-WORK_OF_ART");
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(Dataset::Conll2003.label_table().len(), 9);
        assert_eq!(Dataset::Wnut17.label_table().len(), 13);
        assert_eq!(Dataset::OntoNotes5.label_table().len(), 37);
    }

    #[test]
    fn test_entity_types() {
        assert_eq!(
            Dataset::Conll2003.entity_types(),
            vec!["PER", "ORG", "LOC", "MISC"]
        );
        assert_eq!(Dataset::OntoNotes5.entity_types().len(), 18);
        assert!(Dataset::Wnut17
            .entity_types()
            .contains(&"CORPORATION".to_string()));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("conll2003".parse::<Dataset>().unwrap(), Dataset::Conll2003);
        assert_eq!("WNUT17".parse::<Dataset>().unwrap(), Dataset::Wnut17);
        assert_eq!("ontonotes".parse::<Dataset>().unwrap(), Dataset::OntoNotes5);
        assert!("squad".parse::<Dataset>().is_err());
    }
}
