//! The boundary between the stack machine and whatever feeds it tokens and
//! shows its results.

use unitdc_units::Quantity;

use crate::error::{Error, Result};
use crate::token::Token;

/// Supplies tokens for one batch. `None` ends the batch normally; an `Err`
/// is reported like any evaluation failure.
pub trait TokenSource {
    fn next_token(&mut self) -> Option<Result<Token>>;
}

impl<I> TokenSource for I
where
    I: Iterator<Item = Result<Token>>,
{
    fn next_token(&mut self) -> Option<Result<Token>> {
        self.next()
    }
}

/// Receives printed quantities and errors.
pub trait ResultSink {
    fn print_quantities(&mut self, values: &[Quantity]) -> Result<()>;

    fn print_error(&mut self, error: &Error) -> Result<()>;
}

/// One observation recorded by [`RecordingSink`].
#[derive(Debug, Clone)]
pub enum Output {
    Quantities(Vec<Quantity>),
    Error(Error),
}

/// A sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub outputs: Vec<Output>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All printed quantities, flattened in print order.
    pub fn quantities(&self) -> Vec<&Quantity> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Quantities(values) => Some(values),
                Output::Error(_) => None,
            })
            .flatten()
            .collect()
    }

    pub fn errors(&self) -> Vec<&Error> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Error(e) => Some(e),
                Output::Quantities(_) => None,
            })
            .collect()
    }
}

impl ResultSink for RecordingSink {
    fn print_quantities(&mut self, values: &[Quantity]) -> Result<()> {
        self.outputs.push(Output::Quantities(values.to_vec()));
        Ok(())
    }

    fn print_error(&mut self, error: &Error) -> Result<()> {
        self.outputs.push(Output::Error(error.clone()));
        Ok(())
    }
}
