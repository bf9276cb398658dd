//! Lexer for tokenizing shell input.
//!
//! Handles:
//! - Whitespace-separated words
//! - Single quotes (literal, no escapes)
//! - Double quotes (`\"` and `\\` are the only escapes)
//! - Backslash escaping of the next character outside quotes
//!
//! Adjacent quoted and unquoted pieces join into one word, so
//! `"a b"c` is the single word `a bc`. An empty pair of quotes still
//! yields an (empty) word.

use std::iter::Peekable;
use std::str::Chars;

use crate::core::error::TokenizeError;

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing shell input
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            failed: false,
        }
    }

    /// Tokenize the entire input, stopping at the first error.
    pub fn tokenize(self) -> Result<Vec<String>, TokenizeError> {
        self.collect()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn next_word(&mut self) -> Result<String, TokenizeError> {
        let mut word = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                break;
            }
            self.chars.next();
            match c {
                '\\' => {
                    let escaped = self.chars.next().ok_or(TokenizeError::DanglingEscape)?;
                    word.push(escaped);
                }
                '\'' => self.read_single_quoted(&mut word)?,
                '"' => self.read_double_quoted(&mut word)?,
                _ => word.push(c),
            }
        }

        Ok(word)
    }

    fn read_single_quoted(&mut self, word: &mut String) -> Result<(), TokenizeError> {
        loop {
            match self.chars.next() {
                Some('\'') => return Ok(()),
                Some(c) => word.push(c),
                None => return Err(TokenizeError::UnclosedQuote { quote: '\'' }),
            }
        }
    }

    fn read_double_quoted(&mut self, word: &mut String) -> Result<(), TokenizeError> {
        loop {
            match self.chars.next() {
                Some('"') => return Ok(()),
                Some('\\') => match self.chars.next_if(|c| *c == '"' || *c == '\\') {
                    Some(escaped) => word.push(escaped),
                    None => word.push('\\'),
                },
                Some(c) => word.push(c),
                None => return Err(TokenizeError::UnclosedQuote { quote: '"' }),
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<String, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        self.chars.peek()?;

        let word = self.next_word();
        self.failed = word.is_err();
        Some(word)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        Lexer::new(input).tokenize().unwrap()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(words("sym"), vec!["sym"]);
    }

    #[test]
    fn test_command_with_args() {
        assert_eq!(
            words("sym main 0x401000"),
            vec!["sym", "main", "0x401000"]
        );
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(words("  load \t a.out   "), vec!["load", "a.out"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(words("load 'my file'"), vec!["load", "my file"]);
        assert_eq!(words(r"echo 'a\b'"), vec!["echo", r"a\b"]);
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(words("load \"my file\""), vec!["load", "my file"]);
        assert_eq!(words(r#"x "a\"b""#), vec!["x", "a\"b"]);
        assert_eq!(words(r#"x "a\nb""#), vec!["x", r"a\nb"]);
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(words(r"load my\ file"), vec!["load", "my file"]);
    }

    #[test]
    fn test_adjacent_pieces_join() {
        assert_eq!(words(r#"a"b c"'d'"#), vec!["ab cd"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_word() {
        assert_eq!(words("sym ''"), vec!["sym", ""]);
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(
            Lexer::new("load \"abc").tokenize(),
            Err(TokenizeError::UnclosedQuote { quote: '"' })
        );
        assert_eq!(
            Lexer::new("load 'abc").tokenize(),
            Err(TokenizeError::UnclosedQuote { quote: '\'' })
        );
    }

    #[test]
    fn test_dangling_escape() {
        assert_eq!(
            Lexer::new("load abc\\").tokenize(),
            Err(TokenizeError::DanglingEscape)
        );
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let mut lexer = Lexer::new("a 'b c");
        assert_eq!(lexer.next(), Some(Ok("a".to_string())));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert_eq!(lexer.next(), None);
    }
}
