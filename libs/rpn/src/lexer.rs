//! Calculator lexer - splits input text into tokens
//!
//! Words are separated by whitespace. A `#` at the start of a word comments
//! out the rest of the line. Each word is classified as a unit, a numeric
//! literal or an operator, in that order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::token::Token;

static UNIT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((1|[a-zA-Z]\w*)\)$").expect("unit token pattern"));
static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9._]+(e[+-]?[0-9_]+)?$").expect("numeric token pattern"));
static OPERATOR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[cdrbpnvf+\-*/]$").expect("operator token pattern"));

/// Classify a single whitespace-free word.
pub fn classify(word: &str) -> Result<Token> {
    if UNIT_TOKEN.is_match(word) {
        Ok(Token::unit(word))
    } else if NUMERIC_TOKEN.is_match(word) {
        Ok(Token::numeric(word))
    } else if OPERATOR_TOKEN.is_match(word) {
        Ok(Token::operator(word))
    } else {
        Err(Error::UnknownToken(word.to_string()))
    }
}

/// Tokenize a whole string, stopping at the first unknown token.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).collect()
}

/// Streaming tokenizer over an in-memory string.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        let mut in_comment = false;
        while let Some(c) = self.current() {
            if c == '\r' || c == '\n' {
                in_comment = false;
            }
            if !c.is_whitespace() {
                if c == '#' {
                    in_comment = true;
                }
                if !in_comment {
                    break;
                }
            }
            self.advance();
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                break;
            }
            self.advance();
        }
        self.chars[start..self.position].iter().collect()
    }

    /// Next token, `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token>> {
        self.skip_whitespace_and_comments();
        self.current()?;
        let word = self.read_word();
        Some(classify(&word))
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
