//! Line-oriented front end: prompts, result blocks and error lines.

use std::io::{BufRead, Write};

use clap::ValueEnum;
use serde::Serialize;
use unitdc_rpn::{Error, Interpreter, ResultSink};
use unitdc_units::{FormattedQuantity, Quantity, Registry};

use crate::config::ReplConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `Out(n):` blocks with one `[i]` line per value
    Text,
    /// One JSON object per line
    Json,
}

/// Prompts only make sense for a person at a terminal, and would corrupt
/// line-delimited JSON.
pub fn wants_prompt(format: OutputFormat, interactive: bool) -> bool {
    interactive && format == OutputFormat::Text
}

#[derive(Serialize)]
struct ValuesBlock {
    values: Vec<FormattedQuantity>,
}

#[derive(Serialize)]
struct ErrorBlock {
    error: String,
}

/// Writes calculator output. Values go to `out`; in text mode errors go to
/// `err`, in JSON mode both go to `out`.
pub struct Printer<W, E> {
    out: W,
    err: E,
    format: OutputFormat,
    precision: usize,
    output_count: u64,
    error_count: usize,
}

impl<W: Write, E: Write> Printer<W, E> {
    pub fn new(out: W, err: E, format: OutputFormat, precision: usize) -> Self {
        Self {
            out,
            err,
            format,
            precision,
            output_count: 0,
            error_count: 0,
        }
    }

    /// Errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn write_prompt(&mut self, prompt: &str) -> std::io::Result<()> {
        self.out.write_all(prompt.as_bytes())?;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_values(&mut self, values: &[Quantity]) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "Out({}):", self.output_count)?;
                for (i, value) in values.iter().enumerate() {
                    writeln!(self.out, "\t[{i}]{:.*}", self.precision, value.format())?;
                }
            }
            OutputFormat::Json => {
                let block = ValuesBlock {
                    values: values.iter().map(Quantity::format).collect(),
                };
                serde_json::to_writer(&mut self.out, &block)?;
                writeln!(self.out)?;
            }
        }
        self.output_count += 1;
        self.out.flush()
    }

    fn write_error(&mut self, error: &Error) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.err, "Error: {error}")?;
                self.err.flush()
            }
            OutputFormat::Json => {
                let block = ErrorBlock {
                    error: error.to_string(),
                };
                serde_json::to_writer(&mut self.out, &block)?;
                writeln!(self.out)?;
                self.out.flush()
            }
        }
    }
}

impl<W: Write, E: Write> ResultSink for Printer<W, E> {
    fn print_quantities(&mut self, values: &[Quantity]) -> unitdc_rpn::Result<()> {
        self.write_values(values)
            .map_err(|e| Error::Output(e.to_string()))
    }

    fn print_error(&mut self, error: &Error) -> unitdc_rpn::Result<()> {
        self.error_count += 1;
        self.write_error(error)
            .map_err(|e| Error::Output(e.to_string()))
    }
}

/// Feeds input to an interpreter one line (one batch) at a time.
pub struct Repl<R> {
    input: R,
    prompt: Option<ReplConfig>,
    input_count: u64,
}

impl<R: BufRead> Repl<R> {
    /// `prompt` is `None` for non-interactive input.
    pub fn new(input: R, prompt: Option<ReplConfig>) -> Self {
        Self {
            input,
            prompt,
            input_count: 0,
        }
    }

    /// Run until end of input. Evaluation errors are reported through
    /// `printer`; only I/O failures end the loop early.
    pub fn run<W, E>(
        &mut self,
        interpreter: &mut Interpreter,
        printer: &mut Printer<W, E>,
    ) -> anyhow::Result<()>
    where
        W: Write,
        E: Write,
    {
        let mut line = String::new();
        loop {
            if let Some(prompt) = &self.prompt {
                printer.write_prompt(&prompt.render_prompt(self.input_count))?;
            }
            self.input_count += 1;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            tracing::trace!(line = self.input_count, input = line.trim_end(), "evaluating");
            interpreter.evaluate(&line, printer)?;
        }
        if self.prompt.is_some() {
            // Leave the shell prompt on its own line after EOF.
            printer.write_prompt("\n")?;
        }
        Ok(())
    }
}

/// Print the unit catalog, base units first.
pub fn write_catalog<W: Write>(registry: &Registry, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Base units:")?;
    for unit in registry.base_units() {
        writeln!(out, "\t{:<8} #{}", unit.identifier(), unit.id())?;
    }
    writeln!(out, "Derived units:")?;
    for unit in registry.derived_units() {
        write!(
            out,
            "\t{:<8} {} {}",
            unit.identifier(),
            unit.multiplier(),
            unit.exponents()
        )?;
        if unit.offset() != 0.0 {
            write!(out, " + {}", unit.offset())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer(format: OutputFormat) -> Printer<Vec<u8>, Vec<u8>> {
        Printer::new(Vec::new(), Vec::new(), format, 6)
    }

    fn output(printer: Printer<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = printer.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn text_blocks_are_numbered() {
        let mut interp = Interpreter::default();
        let mut printer = printer(OutputFormat::Text);
        interp
            .evaluate("1 (g) 1 (l) / p 2 n", &mut printer)
            .unwrap();

        let (out, err) = output(printer);
        assert_eq!(
            out,
            "Out(0):\n\t[0]1.000000 (g)(l)-1\nOut(1):\n\t[0]2.000000\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn text_errors_go_to_stderr() {
        let mut interp = Interpreter::default();
        let mut printer = printer(OutputFormat::Text);
        interp.evaluate("+", &mut printer).unwrap();

        assert_eq!(printer.error_count(), 1);
        let (out, err) = output(printer);
        assert!(out.is_empty());
        assert_eq!(err, "Error: invalid operation: stack empty\n");
    }

    #[test]
    fn json_lines() {
        let mut interp = Interpreter::default();
        let mut printer = printer(OutputFormat::Json);
        interp.evaluate("2 (mol) p", &mut printer).unwrap();
        interp.evaluate("(furlong)", &mut printer).unwrap();

        let (out, _) = output(printer);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            lines[0],
            serde_json::json!({
                "values": [{"number": 2.0, "units": [{"identifier": "mol", "exponent": 1}]}]
            })
        );
        assert_eq!(
            lines[1],
            serde_json::json!({"error": "invalid operation: unknown unit identifier furlong"})
        );
    }

    #[test]
    fn prompts_only_for_text_on_a_terminal() {
        assert!(wants_prompt(OutputFormat::Text, true));
        assert!(!wants_prompt(OutputFormat::Text, false));
        assert!(!wants_prompt(OutputFormat::Json, true));
        assert!(!wants_prompt(OutputFormat::Json, false));
    }

    #[test]
    fn repl_prompts_per_line() {
        let mut interp = Interpreter::default();
        let mut printer = printer(OutputFormat::Text);
        let input = "1 2 +\nn\n".as_bytes();
        Repl::new(input, Some(ReplConfig::default()))
            .run(&mut interp, &mut printer)
            .unwrap();

        let (out, _) = output(printer);
        assert_eq!(out, "In(0): In(1): Out(0):\n\t[0]3.000000\nIn(2): \n");
    }

    #[test]
    fn script_mode_keeps_stack_between_lines() {
        let mut interp = Interpreter::default();
        let mut printer = printer(OutputFormat::Text);
        let input = "# molarity of 1 g NaCl in 1 l\n58.44 (g) 1 (mol) / \n1 (g) r / 1 (l) / (mM) p\n".as_bytes();
        Repl::new(input, None).run(&mut interp, &mut printer).unwrap();

        assert_eq!(printer.error_count(), 0);
        let (out, _) = output(printer);
        assert_eq!(out, "Out(0):\n\t[0]17.111567 (mM)\n");
    }

    #[test]
    fn catalog_lists_builtin_units() {
        let mut out = Vec::new();
        write_catalog(&Registry::builtin(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\tmol      #5\n"));
        assert!(text.contains("\tmM       0.001 (mol)(l)-1\n"));
    }
}
