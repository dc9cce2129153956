//! Rule-based paragraph and sentence analyzer

use super::rules::SegmentationRules;
use super::tokenizer::{tokenize, Token};
use std::sync::Arc;

/// Tokens of one sentence
pub type SentenceTokens = Vec<Token>;

/// Sentences of one paragraph
pub type Paragraph = Vec<SentenceTokens>;

/// Splits text into paragraphs of sentences of tokens
#[derive(Debug, Clone)]
pub struct Segmenter {
    rules: Arc<SegmentationRules>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentationRules::english())
    }
}

impl Segmenter {
    /// Create a segmenter using the given rules
    pub fn new(rules: Arc<SegmentationRules>) -> Self {
        Self { rules }
    }

    /// The rules in use
    pub fn rules(&self) -> &SegmentationRules {
        &self.rules
    }

    /// Analyze text into paragraphs, sentences and tokens
    pub fn analyze(&self, text: &str) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<Token> = Vec::new();

        for token in tokenize(text) {
            if !current.is_empty() && line_breaks(&token.spacing) >= self.rules.min_line_breaks() {
                paragraphs.push(self.split_sentences(std::mem::take(&mut current)));
            }
            current.push(token);
        }
        if !current.is_empty() {
            paragraphs.push(self.split_sentences(current));
        }

        paragraphs
    }

    fn split_sentences(&self, mut tokens: Vec<Token>) -> Paragraph {
        let mut ends = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < tokens.len() {
            let previous = (i > start).then(|| &tokens[i - 1]);
            let terminal = self.is_terminal(previous, &tokens[i]);
            i += 1;
            if !terminal {
                continue;
            }

            while tokens
                .get(i)
                .is_some_and(|token| self.is_attached_closer(token, tokens.get(i + 1)))
            {
                i += 1;
            }

            if tokens.get(i).is_some_and(|next| self.starts_sentence(next)) {
                ends.push(i);
                start = i;
            }
        }

        let mut sentences: Paragraph = ends.into_iter().rev().map(|end| tokens.split_off(end)).collect();
        if !tokens.is_empty() {
            sentences.push(tokens);
        }
        sentences.reverse();
        sentences
    }

    fn is_terminal(&self, previous: Option<&Token>, token: &Token) -> bool {
        if self.rules.is_ellipsis(&token.value) {
            return self.rules.ellipsis_is_boundary();
        }
        // U.S. ends a sentence, e.g. does not
        if self.rules.is_terminator('.') && is_dotted_abbreviation(&token.value) {
            return !self.rules.is_abbreviation(token.value.trim_end_matches('.'));
        }
        if !token.value.chars().all(|c| self.rules.is_terminator(c)) {
            return false;
        }
        if token.value != "." || !token.spacing.is_empty() {
            return true;
        }

        match previous {
            Some(prev) => !(self.rules.is_abbreviation(&prev.value) || is_initial(&prev.value)),
            None => true,
        }
    }

    /// A closing enclosure glued to the end of a sentence
    ///
    /// Quotes that both open and close are read as opening when an
    /// unspaced capitalised token follows them: `Stop!"No."`.
    fn is_attached_closer(&self, token: &Token, after: Option<&Token>) -> bool {
        if !token.spacing.is_empty() {
            return false;
        }
        let Some(c) = single_char(&token.value).filter(|&c| self.rules.is_closing(c)) else {
            return false;
        };
        let opens_next = after.is_some_and(|next| {
            next.spacing.is_empty() && next.value.chars().next().is_some_and(char::is_uppercase)
        });
        !(self.rules.is_opening(c) && opens_next)
    }

    fn starts_sentence(&self, token: &Token) -> bool {
        match token.value.chars().next() {
            Some(c) if self.rules.is_opening(c) => true,
            Some(c) => c.is_alphanumeric() && !c.is_lowercase(),
            None => false,
        }
    }
}

fn line_breaks(spacing: &str) -> usize {
    let mut count = 0;
    let mut chars = spacing.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => count += 1,
            '\r' => {
                chars.next_if_eq(&'\n');
                count += 1;
            }
            _ => {}
        }
    }
    count
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn is_initial(value: &str) -> bool {
    single_char(value).is_some_and(char::is_uppercase)
}

fn is_dotted_abbreviation(value: &str) -> bool {
    value.ends_with('.')
        && value.matches('.').count() >= 2
        && value.chars().any(char::is_alphabetic)
        && value.chars().all(|c| c == '.' || c.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::tokenizer::join_tokens;

    fn sentences(text: &str) -> Vec<Vec<String>> {
        Segmenter::default()
            .analyze(text)
            .into_iter()
            .map(|p| p.iter().map(|s| join_tokens(s).trim().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_simple_sentences() {
        assert_eq!(
            sentences("Hello world. This is a test! Is it? Yes."),
            vec![vec!["Hello world.", "This is a test!", "Is it?", "Yes."]]
        );
    }

    #[test]
    fn test_paragraph_breaks() {
        assert_eq!(
            sentences("First one. Second.\n\nNew paragraph.\r\n\r\nThird\nstill third."),
            vec![
                vec!["First one.", "Second."],
                vec!["New paragraph."],
                vec!["Third\nstill third."]
            ]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        assert_eq!(
            sentences("Dr. Smith met Mr. Jones. They talked."),
            vec![vec!["Dr. Smith met Mr. Jones.", "They talked."]]
        );
    }

    #[test]
    fn test_initials_do_not_split() {
        assert_eq!(
            sentences("J. R. R. Tolkien wrote it. Then he slept."),
            vec![vec!["J. R. R. Tolkien wrote it.", "Then he slept."]]
        );
    }

    #[test]
    fn test_lowercase_continuation_does_not_split() {
        assert_eq!(
            sentences("It was approx. three hours. OK."),
            vec![vec!["It was approx. three hours.", "OK."]]
        );
        assert_eq!(sentences("See fig. 3 for details."), vec![vec!["See fig. 3 for details."]]);
    }

    #[test]
    fn test_closing_quotes_stay_attached() {
        assert_eq!(
            sentences("He said \"Stop.\" Then he left."),
            vec![vec!["He said \"Stop.\"", "Then he left."]]
        );
    }

    #[test]
    fn test_dotted_abbreviation_can_end_sentence() {
        assert_eq!(
            sentences("I live in the U.S. It is big."),
            vec![vec!["I live in the U.S.", "It is big."]]
        );
        assert_eq!(
            sentences("We met at 5 p.m. Then we left."),
            vec![vec!["We met at 5 p.m.", "Then we left."]]
        );
        assert_eq!(
            sentences("The U.S. delegation left."),
            vec![vec!["The U.S. delegation left."]]
        );
    }

    #[test]
    fn test_known_dotted_abbreviations_do_not_split() {
        assert_eq!(sentences("Use e.g. Rust here."), vec![vec!["Use e.g. Rust here."]]);
        assert_eq!(
            sentences("Pick one, i.e. The first. Done."),
            vec![vec!["Pick one, i.e. The first.", "Done."]]
        );
    }

    #[test]
    fn test_quote_before_capital_opens_next_sentence() {
        assert_eq!(
            sentences("Stop!\"No.\" Go."),
            vec![vec!["Stop!", "\"No.\"", "Go."]]
        );
        assert_eq!(
            sentences("She wrote 'Done.' Next."),
            vec![vec!["She wrote 'Done.'", "Next."]]
        );
    }

    #[test]
    fn test_ellipsis_boundary() {
        assert_eq!(
            sentences("Well... Maybe not. and so… it goes"),
            vec![vec!["Well...", "Maybe not. and so… it goes"]]
        );
    }

    #[test]
    fn test_sentence_starting_with_number() {
        assert_eq!(
            sentences("Items follow. 3 were sold."),
            vec![vec!["Items follow.", "3 were sold."]]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(Segmenter::default().analyze("").is_empty());
        assert!(Segmenter::default().analyze("  \n\n ").is_empty());
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(line_breaks(" \n \n"), 2);
        assert_eq!(line_breaks("\r\n\r\n"), 2);
        assert_eq!(line_breaks("\r\r"), 2);
        assert_eq!(line_breaks("  "), 0);
    }
}
