//! Front half of the compile pipeline: text to intermediate code.

pub(crate) mod encoder;
pub(crate) mod tokenizer;

use crate::error::SymFunError;
use crate::ops::OperatorTable;
use crate::parser::encoder::Entry;
use crate::symbol::SymbolTable;

/// Run the front half of the pipeline: tokenize, collect symbols, encode.
///
/// The symbol table is built between the two stages because encoding needs
/// every distinct literal pre-assigned to its slot.
pub(crate) fn analyze(
    variables: &[&str],
    constants: &[&str],
    expression: &str,
    ops: &dyn OperatorTable,
) -> Result<(SymbolTable, Vec<Entry>), SymFunError> {
    let tokens = tokenizer::tokenize(expression)?;
    let symbols = SymbolTable::build(variables, constants, &tokens);
    let code =
        encoder::encode(&tokens, &symbols, ops).map_err(|e| e.with_expression(expression))?;

    log::trace!(
        "analyzed \"{}\": {} tokens, {} symbols",
        expression,
        tokens.len(),
        symbols.len()
    );

    Ok((symbols, code))
}
