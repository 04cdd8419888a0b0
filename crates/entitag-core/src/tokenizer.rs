//! # Whitespace Tokenizer
//!
//! Splits input text into tokens with character-offset positions. Offsets
//! are counted in characters, not bytes, so they match the offsets stored
//! in the exported training records.

/// A token with its character-offset position in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Start position in characters.
    pub start: usize,
    /// End position in characters (half-open).
    pub end: usize,
}

/// Whitespace tokenizer with character offsets.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize text on whitespace, recording character offsets.
    ///
    /// # Examples
    /// ```
    /// use entitag_core::tokenizer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("Tom met Jerry");
    /// assert_eq!(tokens.len(), 3);
    /// assert_eq!(tokens[2].text, "Jerry");
    /// assert_eq!(tokens[2].start, 8);
    /// assert_eq!(tokens[2].end, 13);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_start = 0;

        for (pos, c) in input.chars().enumerate() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        start: current_start,
                        end: pos,
                    });
                }
            } else {
                if current.is_empty() {
                    current_start = pos;
                }
                current.push(c);
            }
        }

        if !current.is_empty() {
            let end = current_start + current.chars().count();
            tokens.push(Token {
                text: current,
                start: current_start,
                end,
            });
        }

        tokens
    }
}

/// Slice a string by character offsets (half-open range).
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = Tokenizer::new().tokenize("Elon Musk founded SpaceX");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text, "Elon");
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(tokens[1].start, 5);
        assert_eq!(tokens[3].text, "SpaceX");
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new().tokenize("").is_empty());
        assert!(Tokenizer::new().tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_multiple_spaces() {
        let tokens = Tokenizer::new().tokenize("a  b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].start, 3);
        assert_eq!(tokens[1].end, 4);
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let tokens = Tokenizer::new().tokenize("São Paulo");
        assert_eq!(tokens[0].end, 3);
        assert_eq!(tokens[1].start, 4);
        assert_eq!(tokens[1].end, 9);
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("Tom met Jerry", 8, 13), "Jerry");
        assert_eq!(char_slice("São Paulo", 0, 3), "São");
        assert_eq!(char_slice("abc", 2, 2), "");
    }
}
