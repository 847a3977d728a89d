#![allow(dead_code)]

use std::collections::VecDeque;

use unitdc_rpn::{Error, Interpreter, RecordingSink, Result, ResultSink, Token, TokenSource};
use unitdc_units::Quantity;

/// Hands out a fixed list of token results, then ends the batch.
pub struct ScriptedSource {
    items: VecDeque<Result<Token>>,
}

impl ScriptedSource {
    pub fn new(items: Vec<Result<Token>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

// A plain `TokenSource` impl rather than the iterator blanket impl, so the
// trait itself is exercised.
impl TokenSource for ScriptedSource {
    fn next_token(&mut self) -> Option<Result<Token>> {
        self.items.pop_front()
    }
}

/// A sink whose `print_quantities` always fails.
#[derive(Default)]
pub struct FailingSink {
    pub errors: Vec<Error>,
}

impl ResultSink for FailingSink {
    fn print_quantities(&mut self, _values: &[Quantity]) -> Result<()> {
        Err(Error::Output("display unavailable".into()))
    }

    fn print_error(&mut self, error: &Error) -> Result<()> {
        self.errors.push(error.clone());
        Ok(())
    }
}

/// Evaluate `input` on `interp` and return what was reported.
pub fn eval(interp: &mut Interpreter, input: &str) -> RecordingSink {
    let mut sink = RecordingSink::new();
    interp
        .evaluate(input, &mut sink)
        .expect("recording sink never fails");
    sink
}

/// Evaluate `input` on a fresh interpreter.
pub fn eval_fresh(input: &str) -> (Interpreter, RecordingSink) {
    let mut interp = Interpreter::default();
    let sink = eval(&mut interp, input);
    (interp, sink)
}

pub fn numbers(values: &[&Quantity]) -> Vec<f64> {
    values.iter().map(|q| q.number).collect()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}
