//! Reverse-Polish stack machine over dimensioned quantities.
//!
//! ```text
//! 1 (ng) 1 (ul) / p
//! ```
//!
//! Input is split into [`Token`]s by the [`Lexer`] (or any other
//! [`TokenSource`]) and evaluated one batch at a time by an [`Interpreter`],
//! which reports printed values and errors to a [`ResultSink`].

#![forbid(unsafe_code)]

pub mod error;
pub mod interpreter;
pub mod io;
pub mod lexer;
pub mod stack;
pub mod token;

pub use error::{Error, NumberError, Result};
pub use interpreter::Interpreter;
pub use io::{Output, RecordingSink, ResultSink, TokenSource};
pub use lexer::{classify, tokenize, Lexer};
pub use stack::{Stack, STACK_CAPACITY};
pub use token::{parse_number, Operator, Token};
