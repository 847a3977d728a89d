//! The stack machine.
//!
//! Every operator either succeeds or leaves the stack exactly as it found it;
//! the one exception is `n`, which does not restore its operand if printing
//! fails.

use std::sync::Arc;

use unitdc_units::{Quantity, Registry, UnitRef};

use crate::error::{Error, Result};
use crate::io::{ResultSink, TokenSource};
use crate::lexer::Lexer;
use crate::stack::Stack;
use crate::token::{Operator, Token};

/// One calculator session: a stack plus the unit catalog it resolves against.
#[derive(Debug, Clone)]
pub struct Interpreter {
    stack: Stack,
    registry: Arc<Registry>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Arc::new(Registry::builtin()))
    }
}

impl Interpreter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            stack: Stack::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Tokenize `input` and run it as one batch.
    pub fn evaluate<O>(&mut self, input: &str, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        self.run(&mut Lexer::new(input), sink)
    }

    /// Consume tokens until the source is exhausted or a token fails.
    ///
    /// A failure is handed to `sink` and ends the batch; the session stays
    /// usable. The returned error is only ever the sink's own failure.
    pub fn run<S, O>(&mut self, source: &mut S, sink: &mut O) -> Result<()>
    where
        S: TokenSource + ?Sized,
        O: ResultSink + ?Sized,
    {
        while let Some(next) = source.next_token() {
            let outcome = next.and_then(|token| self.handle_token(&token, sink));
            if let Err(err) = outcome {
                tracing::debug!(error = %err, depth = self.stack.depth(), "batch aborted");
                return sink.print_error(&err);
            }
        }
        Ok(())
    }

    pub fn handle_token<O>(&mut self, token: &Token, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        tracing::trace!(token = %token, depth = self.stack.depth(), "handling token");
        match token {
            Token::Numeric(_) => self.push_numeric(token),
            Token::Operator(symbol) => match Operator::from_symbol(symbol) {
                Some(op) => self.apply(op, sink),
                None => Err(Error::UnknownOperation(symbol.clone())),
            },
            Token::Unit(_) => {
                let identifier = token.unit_identifier().unwrap_or_default();
                self.assign_unit(identifier)
            }
        }
    }

    pub fn apply<O>(&mut self, op: Operator, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        match op {
            Operator::Add => self.binary(|a, b| Ok(a.try_add(b)?)),
            Operator::Subtract => self.binary(|a, b| Ok(a.try_sub(b)?)),
            Operator::Multiply => self.binary(|a, b| Ok(a.try_mul(b)?)),
            Operator::Divide => self.binary(|a, b| Ok(a.try_div(b)?)),
            Operator::Sqrt => self.unary(|a| Ok(a.try_sqrt()?)),
            Operator::Peek => self.peek_print(sink),
            Operator::PopPrint => self.pop_print(sink),
            Operator::PrintAll => self.print_all(sink),
            Operator::Duplicate => self.duplicate(),
            Operator::Swap => self.swap(),
            Operator::Clear => {
                self.stack.clear();
                Ok(())
            }
        }
    }

    /// Push a numeric token as a dimensionless quantity.
    pub fn push_numeric(&mut self, token: &Token) -> Result<()> {
        let number = token
            .to_f64()
            .ok_or_else(|| Error::UnknownToken(token.to_string()))??;
        self.stack.push(Quantity::dimensionless(number));
        Ok(())
    }

    /// Pop the right then the left operand; on failure nothing stays popped.
    fn pop_pair(&mut self) -> Result<(Quantity, Quantity)> {
        let right = self.stack.pop()?;
        match self.stack.pop() {
            Ok(left) => Ok((left, right)),
            Err(err) => {
                self.stack.push(right);
                Err(err)
            }
        }
    }

    fn binary<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&Quantity, &Quantity) -> Result<Quantity>,
    {
        let (left, right) = self.pop_pair()?;
        match f(&left, &right) {
            Ok(result) => {
                self.stack.push(result);
                Ok(())
            }
            Err(err) => {
                self.stack.push(left);
                self.stack.push(right);
                Err(err)
            }
        }
    }

    fn unary<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&Quantity) -> Result<Quantity>,
    {
        let operand = self.stack.pop()?;
        match f(&operand) {
            Ok(result) => {
                self.stack.push(result);
                Ok(())
            }
            Err(err) => {
                self.stack.push(operand);
                Err(err)
            }
        }
    }

    /// `p`: print the top and leave it in place.
    pub fn peek_print<O>(&mut self, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        let operand = self.stack.pop()?;
        let printed = sink.print_quantities(std::slice::from_ref(&operand));
        self.stack.push(operand);
        printed
    }

    /// `n`: pop and print the top. A print failure loses the operand.
    pub fn pop_print<O>(&mut self, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        let operand = self.stack.pop()?;
        sink.print_quantities(std::slice::from_ref(&operand))
    }

    /// `f`: print the whole stack, bottom first.
    pub fn print_all<O>(&mut self, sink: &mut O) -> Result<()>
    where
        O: ResultSink + ?Sized,
    {
        sink.print_quantities(self.stack.as_slice())
    }

    /// `d`: push a copy of the top.
    pub fn duplicate(&mut self) -> Result<()> {
        let operand = self.stack.pop()?;
        self.stack.push(operand.clone());
        self.stack.push(operand);
        Ok(())
    }

    /// `r`: swap the top two.
    pub fn swap(&mut self) -> Result<()> {
        let (left, right) = self.pop_pair()?;
        self.stack.push(right);
        self.stack.push(left);
        Ok(())
    }

    /// Apply a unit to the top of the stack.
    ///
    /// `1` strips the dimension. Otherwise a dimensionless quantity takes on
    /// the unit (a derived unit also rescales its number), and the unit
    /// updates the quantity's display preferences. Unknown identifiers are
    /// rejected before anything is popped.
    pub fn assign_unit(&mut self, identifier: &str) -> Result<()> {
        let unit = self
            .registry
            .lookup(identifier)
            .ok_or_else(|| Error::UnknownUnit(identifier.to_string()))?;

        let mut operand = self.stack.pop()?;
        match unit {
            UnitRef::Dimensionless => operand.clear_unit(),
            UnitRef::Base(base) => operand.assign_base_unit(base),
            UnitRef::Derived(derived) => operand.assign_derived_unit(derived),
        }
        self.stack.push(operand);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RecordingSink;
    use unitdc_units::UnitCombination;

    fn eval(interp: &mut Interpreter, input: &str) -> RecordingSink {
        let mut sink = RecordingSink::new();
        interp.evaluate(input, &mut sink).unwrap();
        sink
    }

    #[test]
    fn binary_operand_order() {
        let mut interp = Interpreter::default();
        eval(&mut interp, "10 4 -");
        assert_eq!(interp.stack().top().unwrap().number, 6.0);
        eval(&mut interp, "c 10 4 /");
        assert_eq!(interp.stack().top().unwrap().number, 2.5);
    }

    #[test]
    fn failing_binary_restores_operands_in_order() {
        let mut interp = Interpreter::default();
        let sink = eval(&mut interp, "1 (g) 2 (l) +");
        assert!(sink.errors()[0].incompatible_units().is_some());
        let stack = interp.stack().as_slice();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0].number, 1.0);
        assert_eq!(stack[1].number, 2.0);
        assert_eq!(stack[1].combination.to_string(), "(l)");
    }

    #[test]
    fn sqrt_failure_restores_operand() {
        let mut interp = Interpreter::default();
        let sink = eval(&mut interp, "4 (m) v");
        let (target, offending) = sink.errors()[0].incompatible_units().unwrap();
        assert!(target.is_none());
        assert_eq!(offending.to_string(), "(m)");
        assert_eq!(interp.stack().depth(), 1);
        assert_eq!(interp.stack().top().unwrap().number, 4.0);
    }

    #[test]
    fn unknown_unit_does_not_pop() {
        let mut interp = Interpreter::default();
        let sink = eval(&mut interp, "5 (furlong)");
        assert_eq!(sink.errors(), vec![&Error::UnknownUnit("furlong".into())]);
        assert_eq!(interp.stack().depth(), 1);
        assert!(interp.stack().top().unwrap().is_dimensionless());
    }

    #[test]
    fn dimensionless_marker_strips_unit() {
        let mut interp = Interpreter::default();
        eval(&mut interp, "5 (ml) (1)");
        let top = interp.stack().top().unwrap();
        assert_eq!(top.combination, UnitCombination::none());
        assert!((top.number - 0.005).abs() < 1e-15);
        assert_eq!(top.preferred.len(), 1);
    }
}
