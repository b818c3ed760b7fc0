//! ECMAScript parser producing ESTree-shaped syntax trees
//!
//! Parses scripts and modules of the full ES2022 grammar, checks the early
//! errors of the language and fails with the first syntax error found.
//!
//! # Example
//!
//! ```
//! use esparse::ast::Statement;
//!
//! let program = esparse::parse_script("let answer = 6 * 7;").unwrap();
//! assert!(matches!(program.body.first(), Some(Statement::VariableDeclaration(_))));
//!
//! let err = esparse::parse_module("let = 1;").unwrap_err();
//! assert_eq!(err.kind, esparse::ErrorKind::ReservedWord);
//! ```

pub mod ast;
pub mod atom;
pub mod error;
pub mod estree;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod unicode;

pub use ast::Program;
pub use error::{ErrorKind, ParseError, SourcePosition};
pub use options::ParseOptions;
pub use parser::{BindingKind, Parser, to_pattern};

/// Parse `source` under `options`
pub fn parse(source: &str, options: &ParseOptions) -> Result<Program, ParseError> {
    let goal = if options.module { "module" } else { "script" };
    log::debug!("parsing {} bytes as {}", source.len(), goal);

    match Parser::new(source, options).parse_program() {
        Ok(program) => {
            log::debug!(
                "parsed {}: {} top-level statements",
                goal,
                program.body.len()
            );
            Ok(program)
        }
        Err(err) => {
            log::trace!("parse failed at {}: {}", err.position, err.message);
            Err(err)
        }
    }
}

/// Parse a script with default options
pub fn parse_script(source: &str) -> Result<Program, ParseError> {
    parse(source, &ParseOptions::script())
}

/// Parse a module with default options
pub fn parse_module(source: &str) -> Result<Program, ParseError> {
    parse(source, &ParseOptions::module())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_selects_source_type() {
        assert_eq!(
            parse_script("x").map(|p| p.source_type),
            Ok(ast::SourceType::Script)
        );
        assert_eq!(
            parse_module("x").map(|p| p.source_type),
            Ok(ast::SourceType::Module)
        );
    }

    #[test]
    fn programs_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Program>();
        assert_send_sync::<ParseError>();
    }
}
