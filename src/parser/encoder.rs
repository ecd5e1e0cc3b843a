//! Encodes the token stream into intermediate expression code.
//!
//! Every token becomes either an operand reference (a slot of the symbol
//! table) or an operator entry tagged with its reduction rank. The one piece
//! of context sensitivity lives here: a `+` or `-` is unary exactly when it
//! cannot follow a completed operand, i.e. at the start of the expression,
//! after `(` or `,`, or directly after one of the five binary operators.

use crate::error::SymFunError;
use crate::ops::{OpIndex, OperatorTable, Precedence};
use crate::parser::tokenizer::Token;
use crate::symbol::{Slot, SymbolTable};

/// Delimiter kinds surviving into the intermediate code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delim {
    LeftParen,
    RightParen,
    Comma,
}

/// One entry of the intermediate expression code.
///
/// Reduction rewrites operator entries into `Operand`s carrying their result
/// slot and tags spent entries `Consumed` instead of splicing the buffer, so
/// positions stay stable while the code collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Delim(Delim),
    Operand(Slot),
    Operator { prec: Precedence, op: OpIndex },
    Consumed,
}

/// The binary operator indices that force a following `+`/`-` to be unary.
struct SignContext {
    unary_plus: OpIndex,
    unary_minus: OpIndex,
    binary: [OpIndex; 5],
}

impl SignContext {
    fn resolve(ops: &dyn OperatorTable) -> Result<Self, SymFunError> {
        let index = |sym: &str, op: Option<OpIndex>| {
            op.ok_or_else(|| SymFunError::illegal_symbol(sym))
        };
        Ok(SignContext {
            unary_plus: index("+", ops.unary_index("+"))?,
            unary_minus: index("-", ops.unary_index("-"))?,
            binary: [
                index("+", ops.binary_index("+"))?,
                index("-", ops.binary_index("-"))?,
                index("*", ops.operator_index("*"))?,
                index("/", ops.operator_index("/"))?,
                index("^", ops.operator_index("^"))?,
            ],
        })
    }

    /// Unary iff at the start, after `(`/`,`, or after a binary operator.
    fn is_unary_position(&self, encoded: &[Entry]) -> bool {
        match encoded.last() {
            None => true,
            Some(Entry::Delim(Delim::LeftParen | Delim::Comma)) => true,
            Some(Entry::Operator { op, .. }) => self.binary.contains(op),
            _ => false,
        }
    }
}

pub(crate) fn encode(
    tokens: &[Token],
    symbols: &SymbolTable,
    ops: &dyn OperatorTable,
) -> Result<Vec<Entry>, SymFunError> {
    let signs = SignContext::resolve(ops)?;
    let mut encoded = Vec::with_capacity(tokens.len());

    for token in tokens {
        let entry = match token {
            Token::LeftParen => Entry::Delim(Delim::LeftParen),
            Token::RightParen => Entry::Delim(Delim::RightParen),
            Token::Comma => Entry::Delim(Delim::Comma),

            Token::Number(text) => {
                let slot = symbols
                    .literal_slot(text)
                    .ok_or_else(|| SymFunError::illegal_symbol(text.clone()))?;
                Entry::Operand(slot)
            }

            Token::Identifier(name) => {
                if let Some(slot) = symbols.named_slot(name) {
                    Entry::Operand(slot)
                } else if let Some(op) = ops.operator_index(name) {
                    Entry::Operator {
                        prec: ops.def(op).precedence,
                        op,
                    }
                } else {
                    return Err(SymFunError::illegal_symbol(name.clone()));
                }
            }

            Token::Plus | Token::Minus => {
                let unary = signs.is_unary_position(&encoded);
                let op = match (token, unary) {
                    (Token::Plus, true) => signs.unary_plus,
                    (Token::Plus, false) => signs.binary[0],
                    (Token::Minus, true) => signs.unary_minus,
                    (Token::Minus, false) => signs.binary[1],
                    _ => unreachable!(),
                };
                Entry::Operator {
                    prec: ops.def(op).precedence,
                    op,
                }
            }

            Token::Star => operator_entry("*", ops)?,
            Token::Slash => operator_entry("/", ops)?,
            Token::Caret => operator_entry("^", ops)?,
        };
        encoded.push(entry);
    }

    Ok(encoded)
}

fn operator_entry(symbol: &str, ops: &dyn OperatorTable) -> Result<Entry, SymFunError> {
    let op = ops
        .operator_index(symbol)
        .ok_or_else(|| SymFunError::illegal_symbol(symbol))?;
    Ok(Entry::Operator {
        prec: ops.def(op).precedence,
        op,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::StandardOps;
    use crate::parser::tokenizer::tokenize;

    fn encode_str(text: &str, variables: &[&str]) -> Vec<Entry> {
        let ops = StandardOps::shared();
        let tokens = tokenize(text).unwrap();
        let symbols = SymbolTable::build(variables, &[], &tokens);
        encode(&tokens, &symbols, ops).unwrap()
    }

    fn sign_kind(entry: &Entry) -> Option<Precedence> {
        match entry {
            Entry::Operator { prec, .. } => Some(*prec),
            _ => None,
        }
    }

    #[test]
    fn leading_minus_is_unary() {
        let code = encode_str("-x", &["x"]);
        assert_eq!(sign_kind(&code[0]), Some(Precedence::Sign));
    }

    #[test]
    fn minus_after_operand_is_binary() {
        let code = encode_str("x-2", &["x"]);
        assert_eq!(sign_kind(&code[1]), Some(Precedence::AddSub));
    }

    #[test]
    fn minus_after_paren_or_comma_is_unary() {
        let code = encode_str("(-x)", &["x"]);
        assert_eq!(sign_kind(&code[1]), Some(Precedence::Sign));

        let code = encode_str("atan2(x,-x)", &["x"]);
        assert_eq!(sign_kind(&code[4]), Some(Precedence::Sign));
    }

    #[test]
    fn minus_after_binary_operator_is_unary() {
        let code = encode_str("2*-x", &["x"]);
        assert_eq!(sign_kind(&code[2]), Some(Precedence::Sign));

        let code = encode_str("x^-2", &["x"]);
        assert_eq!(sign_kind(&code[2]), Some(Precedence::Sign));
    }

    #[test]
    fn minus_after_close_paren_is_binary() {
        let code = encode_str("(x)-2", &["x"]);
        assert_eq!(sign_kind(&code[3]), Some(Precedence::AddSub));
    }

    #[test]
    fn unknown_identifier_fails() {
        let ops = StandardOps::shared();
        let tokens = tokenize("x+q").unwrap();
        let symbols = SymbolTable::build(&["x"], &[], &tokens);
        let err = encode(&tokens, &symbols, ops).unwrap_err();
        assert!(matches!(err, SymFunError::IllegalSymbol { symbol, .. } if symbol == "q"));
    }

    #[test]
    fn function_names_encode_as_call_operators() {
        let code = encode_str("sin(x)", &["x"]);
        assert_eq!(sign_kind(&code[0]), Some(Precedence::Call));
    }
}
