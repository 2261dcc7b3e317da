//! # graphedexcel-formula
//!
//! Static analysis of spreadsheet formulas.
//!
//! - **Lexer**: `nom`-based tokenization of formula text.
//! - **References**: extraction of the cells and ranges a formula reads.
//! - **Functions**: usage counts of the functions formulas call.

pub mod functions;
pub mod lexer;
pub mod references;

use graphedexcel_common::error::Result;

use self::lexer::Token;
use self::references::RawReference;

/// Everything the graph builder needs from one formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaAnalysis {
    /// References in order of appearance, duplicates included.
    pub references: Vec<RawReference>,
    /// Called function names in order of appearance, duplicates included.
    pub functions: Vec<String>,
}

/// Tokenizes `formula` once and collects its references and function calls.
///
/// # Errors
///
/// Returns an error if the formula contains an unterminated string literal
/// or quoted sheet name.
pub fn analyze(formula: &str) -> Result<FormulaAnalysis> {
    let tokens = lexer::tokenize(formula)?;
    let mut analysis = FormulaAnalysis::default();
    for token in tokens {
        match token {
            Token::Reference(reference) => analysis.references.push(reference),
            Token::Function(name) => analysis.functions.push(name),
            _ => {}
        }
    }
    Ok(analysis)
}
