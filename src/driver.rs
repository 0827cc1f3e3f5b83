use std::io::Write;

use tracing::{info, warn};

use crate::{
    ast::AnyAst,
    parser::{Parser, ParserError},
};

/// Outcome of one [`Driver::step`].
#[derive(Debug, PartialEq)]
pub enum Step {
    Parsed(AnyAst),
    /// The unit failed to parse; the diagnostic was reported and one token skipped.
    Failed(ParserError),
    /// End of input.
    Done,
}

/// Top-level loop: parses units one after another, reporting errors to `diagnostics` and
/// skipping one token after each error.
pub struct Driver<'stream, W> {
    parser: Parser<'stream>,
    diagnostics: W,
}

impl<'stream, W: Write> Driver<'stream, W> {
    pub fn new(parser: Parser<'stream>, diagnostics: W) -> Self {
        Self {
            parser,
            diagnostics,
        }
    }

    pub async fn step(&mut self) -> Step {
        match self.parser.parse_any().await {
            Ok(Some(ast)) => {
                match &ast {
                    AnyAst::Prototype(prototype) => {
                        info!(name = %prototype.name, "parsed an extern")
                    }
                    AnyAst::Function(function) if function.prototype.is_anonymous() => {
                        info!("parsed a top-level expression")
                    }
                    AnyAst::Function(function) => {
                        info!(name = %function.prototype.name, "parsed a function definition")
                    }
                }
                Step::Parsed(ast)
            }
            Ok(None) => Step::Done,
            Err(e) => {
                warn!(error = %e, "failed to parse top-level unit");
                if let Err(io_err) = writeln!(self.diagnostics, "Error: {}", e) {
                    warn!(error = %io_err, "failed to write diagnostic");
                }

                // Skip token for error recovery.
                self.parser.skip_token().await;
                Step::Failed(e)
            }
        }
    }

    /// Drives the parser to the end of input and returns every unit that parsed.
    pub async fn run(&mut self) -> Vec<AnyAst> {
        let mut units = Vec::new();
        loop {
            match self.step().await {
                Step::Parsed(ast) => units.push(ast),
                Step::Failed(_) => (),
                Step::Done => return units,
            }
        }
    }

    pub fn into_diagnostics(self) -> W {
        self.diagnostics
    }
}
