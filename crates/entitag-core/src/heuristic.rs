//! # Heuristic Fallback Recognizer
//!
//! Rule-based entity recognizer used when no trained model artifact is
//! available. Detects runs of capitalized tokens and classifies them with
//! small lexicons and shape rules, plus regex rules for dates, money and
//! bare numbers. Coverage is intentionally shallow; a trained tagger
//! replaces it as soon as one exists on disk.

use regex::Regex;

use crate::error::Result;
use crate::span::RecognizedEntity;
use crate::tokenizer::{char_slice, Token, Tokenizer};

/// Function words that never start or join a capitalized run.
const STOPWORDS: &[&str] = &[
    "The", "A", "An", "In", "On", "At", "Of", "For", "And", "But", "Or", "He", "She", "It",
    "They", "We", "I", "You", "This", "That", "Its", "His", "Her", "Their",
];

/// Tokens that mark a capitalized run as an organization.
const ORG_KEYWORDS: &[&str] = &[
    "Inc", "Corp", "Ltd", "Co", "Company", "Corporation", "University", "Institute", "Bank",
    "Union", "Group", "Agency", "Ministry", "Committee", "Association",
];

/// Well-known organization names.
const ORG_LEXICON: &[&str] = &[
    "Microsoft", "Apple", "Amazon", "Google", "SpaceX", "Tesla", "IBM", "Intel", "Netflix",
    "Facebook", "Twitter", "Samsung", "Sony", "Boeing", "Airbus", "Reuters",
];

/// Well-known place names (countries, states, cities).
const GPE_LEXICON: &[&str] = &[
    "India", "Pune", "California", "Cupertino", "Russia", "London", "Paris", "Berlin", "Tokyo",
    "Brazil", "France", "Germany", "Europe", "America", "China", "Japan", "Seattle", "Texas",
    "England", "Spain", "Italy", "Canada", "Australia", "Mumbai", "Delhi", "Moscow",
];

const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Rule-based recognizer standing in for a pretrained default model.
pub struct HeuristicRecognizer {
    tokenizer: Tokenizer,
    money: Regex,
    year: Regex,
    cardinal: Regex,
}

impl HeuristicRecognizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(),
            money: Regex::new(r"^\$[0-9][0-9,.]*$")?,
            year: Regex::new(r"^(19|20)\d{2}$")?,
            cardinal: Regex::new(r"^\d+(,\d{3})*(\.\d+)?$")?,
        })
    }

    /// Recognize entities in free text.
    pub fn recognize(&self, text: &str) -> Vec<RecognizedEntity> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tokens = self.tokenizer.tokenize(text);
        let mut entities = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let (core, core_len) = strip_trailing_punct(&tokens[i].text);
            if core.is_empty() {
                i += 1;
                continue;
            }

            if self.money.is_match(&core) {
                entities.push(entity(text, &tokens[i], core_len, "MONEY"));
                i += 1;
                continue;
            }
            if self.year.is_match(&core) || MONTHS.contains(&core.as_str()) {
                entities.push(entity(text, &tokens[i], core_len, "DATE"));
                i += 1;
                continue;
            }
            if self.cardinal.is_match(&core) {
                entities.push(entity(text, &tokens[i], core_len, "CARDINAL"));
                i += 1;
                continue;
            }

            if is_capitalized(&core) && !STOPWORDS.contains(&core.as_str()) {
                let run_start = i;
                let mut run_cores = vec![core.clone()];
                let mut last_core_len = core_len;
                let mut j = i;

                // A token carrying trailing punctuation closes the run.
                while ends_clean(&tokens[j].text) {
                    let Some(next) = tokens.get(j + 1) else { break };
                    let (next_core, next_len) = strip_trailing_punct(&next.text);
                    if !is_capitalized(&next_core) || STOPWORDS.contains(&next_core.as_str()) {
                        break;
                    }
                    j += 1;
                    run_cores.push(next_core);
                    last_core_len = next_len;
                }

                if let Some(label) = classify_run(&run_cores, run_start, &tokens) {
                    let start = tokens[run_start].start;
                    let end = tokens[j].start + last_core_len;
                    entities.push(RecognizedEntity {
                        text: char_slice(text, start, end),
                        label: label.to_string(),
                        start,
                        end,
                    });
                }
                i = j + 1;
                continue;
            }

            i += 1;
        }

        entities
    }
}

fn entity(text: &str, token: &Token, core_len: usize, label: &str) -> RecognizedEntity {
    let end = token.start + core_len;
    RecognizedEntity {
        text: char_slice(text, token.start, end),
        label: label.to_string(),
        start: token.start,
        end,
    }
}

/// Strip trailing punctuation, returning the core text and its char length.
fn strip_trailing_punct(token: &str) -> (String, usize) {
    let trimmed = token.trim_end_matches(|c: char| c.is_ascii_punctuation());
    (trimmed.to_string(), trimmed.chars().count())
}

fn ends_clean(token: &str) -> bool {
    !token
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
}

fn is_capitalized(core: &str) -> bool {
    let mut chars = core.chars();
    chars.next().is_some_and(|c| c.is_uppercase()) && core.chars().any(|c| c.is_alphabetic())
}

fn classify_run(cores: &[String], run_start: usize, tokens: &[Token]) -> Option<&'static str> {
    if cores.iter().any(|c| {
        ORG_KEYWORDS.contains(&c.as_str()) || ORG_LEXICON.contains(&c.as_str())
    }) {
        return Some("ORG");
    }
    if cores.iter().any(|c| GPE_LEXICON.contains(&c.as_str())) {
        return Some("GPE");
    }
    if cores.len() >= 2 {
        return Some("PERSON");
    }
    // A lone unknown capitalized word mid-sentence is likely a name; at
    // sentence start it is usually just sentence case, so skip it.
    let sentence_initial = run_start == 0
        || tokens
            .get(run_start - 1)
            .is_some_and(|t| !ends_clean(&t.text));
    if sentence_initial {
        None
    } else {
        Some("PERSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entities: &[RecognizedEntity]) -> Vec<(&str, &str)> {
        entities
            .iter()
            .map(|e| (e.text.as_str(), e.label.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let rec = HeuristicRecognizer::new().unwrap();
        assert!(rec.recognize("").is_empty());
        assert!(rec.recognize("   ").is_empty());
    }

    #[test]
    fn test_no_entities_in_plain_text() {
        let rec = HeuristicRecognizer::new().unwrap();
        assert!(rec.recognize("the quick brown fox jumps").is_empty());
    }

    #[test]
    fn test_person_org_gpe() {
        let rec = HeuristicRecognizer::new().unwrap();
        let entities = rec.recognize("Elon Musk founded SpaceX in California in 2002.");
        assert_eq!(
            labels(&entities),
            vec![
                ("Elon Musk", "PERSON"),
                ("SpaceX", "ORG"),
                ("California", "GPE"),
                ("2002", "DATE"),
            ]
        );
    }

    #[test]
    fn test_org_keyword_run() {
        let rec = HeuristicRecognizer::new().unwrap();
        let entities = rec.recognize("The European Union imposed sanctions on Russia.");
        assert_eq!(
            labels(&entities),
            vec![("European Union", "ORG"), ("Russia", "GPE")]
        );
    }

    #[test]
    fn test_money_and_cardinal() {
        let rec = HeuristicRecognizer::new().unwrap();
        let entities = rec.recognize("Amazon paid $13.7 billion for 471 stores.");
        assert_eq!(
            labels(&entities),
            vec![("Amazon", "ORG"), ("$13.7", "MONEY"), ("471", "CARDINAL")]
        );
    }

    #[test]
    fn test_sentence_initial_unknown_word_skipped() {
        let rec = HeuristicRecognizer::new().unwrap();
        // "Yesterday" is capitalized only because it opens the sentence.
        assert!(rec.recognize("Yesterday it rained a lot").is_empty());
    }

    #[test]
    fn test_offsets_cover_entity_text() {
        let rec = HeuristicRecognizer::new().unwrap();
        let text = "Tim Cook announced products in Cupertino.";
        for e in rec.recognize(text) {
            assert_eq!(char_slice(text, e.start, e.end), e.text);
            assert!(e.start < e.end);
        }
    }
}
