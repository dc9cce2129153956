//! Regex tokenizer shared by the segmenter and tagger sentences

use regex::Regex;
use std::sync::OnceLock;

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_pattern() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?x)
              (?:\p{L}\.){2,}                                    # dotted abbreviations: U.S. e.g.
            | \p{N}+(?:[.,:/]\p{N}+)+                            # 3.14  1,000  10:30  1/2
            | [\p{L}\p{M}\p{N}_]+(?:['’\-][\p{L}\p{M}\p{N}_]+)*  # words, isn't, well-known
            | \.{2,}                                             # ellipsis
            | [!?]+                                              # !? runs
            | \S                                                 # any other symbol
            ",
        )
        .expect("token pattern is a valid regex")
    })
}

/// A token with the whitespace that precedes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Whitespace between the previous token and this one
    pub spacing: String,
    /// The token text
    pub value: String,
    /// Character offset of `value` in the analyzed text
    pub offset: usize,
    /// Byte offset of `value` in the analyzed text
    pub byte_offset: usize,
}

impl Token {
    /// Character length of the value
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset one past the end of the value
    pub fn byte_end(&self) -> usize {
        self.byte_offset + self.value.len()
    }
}

/// Split text into tokens
///
/// Every non-whitespace character belongs to exactly one token, so joining
/// `spacing + value` over all tokens gives back the text without its
/// trailing whitespace.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for m in token_pattern().find_iter(text) {
        let spacing = &text[byte_pos..m.start()];
        char_pos += spacing.chars().count();
        tokens.push(Token {
            spacing: spacing.to_string(),
            value: m.as_str().to_string(),
            offset: char_pos,
            byte_offset: m.start(),
        });
        char_pos += m.as_str().chars().count();
        byte_pos = m.end();
    }

    tokens
}

/// Rebuild text from tokens, keeping their original spacing
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.spacing);
        out.push_str(&token.value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            values("Hello, world! Isn't it?"),
            vec!["Hello", ",", "world", "!", "Isn't", "it", "?"]
        );
    }

    #[test]
    fn test_numbers_and_abbreviations() {
        assert_eq!(
            values("It cost 1,000.50 in the U.S. at 10:30."),
            vec!["It", "cost", "1,000.50", "in", "the", "U.S.", "at", "10:30", "."]
        );
    }

    #[test]
    fn test_ellipsis_and_runs() {
        assert_eq!(values("Wait... what?!"), vec!["Wait", "...", "what", "?!"]);
        assert_eq!(values("so…"), vec!["so", "…"]);
    }

    #[test]
    fn test_hyphenated_words() {
        assert_eq!(values("a well-known fact"), vec!["a", "well-known", "fact"]);
    }

    #[test]
    fn test_spacing_and_offsets() {
        let tokens = tokenize("  Größe ist  gut.");
        assert_eq!(tokens[0].spacing, "  ");
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].value, "ist");
        assert_eq!(tokens[1].offset, 8);
        assert_eq!(tokens[1].byte_offset, 10);
        assert_eq!(tokens[2].spacing, "  ");
        assert_eq!(tokens[3].value, ".");
        assert_eq!(tokens[3].offset, 16);
    }

    #[test]
    fn test_join_tokens_reproduces_text() {
        let text = "One  two.\n\nThree!";
        assert_eq!(join_tokens(&tokenize(text)), text);
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }
}
