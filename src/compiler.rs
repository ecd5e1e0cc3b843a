//! Reduces intermediate expression code into a flat execution program.
//!
//! The compiler resolves parenthesis nesting innermost-first, then collapses
//! each paren-free range in fixed precedence order: function calls, `^`,
//! unary signs, `*`/`/`, and finally `+`/`-`. Each collapse consumes the
//! operator's operand entries, allocates a fresh temporary slot, emits one
//! instruction, and leaves an operand entry carrying the result slot in the
//! operator's place, so outer passes see it as a plain value.
//!
//! The emitted program is single-assignment: every argument slot is either a
//! symbol slot or the result of a strictly earlier instruction, temporaries
//! grow monotonically from `symbol_count`, and the final slot always holds
//! the overall result. A bare-symbol expression gets a synthesized unary `+`
//! identity instruction so that invariant holds uniformly.

use smallvec::SmallVec;

use crate::error::SymFunError;
use crate::ops::{OpIndex, OperatorTable, Precedence};
use crate::parser::encoder::{Delim, Entry};
use crate::symbol::{Slot, SymbolTable};

/// One step of an execution program: gather `args`, apply `op`, store into
/// `result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Instruction {
    pub op: OpIndex,
    pub args: SmallVec<[Slot; 2]>,
    pub result: Slot,
}

/// Flat single-assignment instruction sequence plus the evaluation-data
/// length it requires (symbols + temporaries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Program {
    pub instructions: Vec<Instruction>,
    pub eval_data_size: usize,
}

/// Reduce intermediate code into an execution program.
pub(crate) fn reduce(
    mut code: Vec<Entry>,
    symbols: &SymbolTable,
    ops: &dyn OperatorTable,
) -> Result<Program, SymFunError> {
    balance_check(&code)?;

    let mut instructions = Vec::new();
    let mut next_slot = symbols.len();

    // Eliminate parens innermost-first; pairs at equal depth go left to
    // right. Consumed delimiters drop out of later depth counts, so each
    // forward scan from a consumed `(` meets its own `)` first.
    for depth in (1..=max_depth(&code)).rev() {
        let mut level: i32 = 0;
        let mut i = 0;
        while i < code.len() {
            match code[i] {
                Entry::Delim(Delim::LeftParen) => {
                    level += 1;
                    if level == depth {
                        code[i] = Entry::Consumed;
                        let start = i + 1;
                        let mut close = start;
                        while close < code.len()
                            && code[close] != Entry::Delim(Delim::RightParen)
                        {
                            close += 1;
                        }
                        if close == code.len() {
                            return Err(SymFunError::UnbalancedParenthesis {
                                expression: String::new(),
                            });
                        }
                        code[close] = Entry::Consumed;
                        reduce_range(
                            &mut code,
                            start,
                            close,
                            &mut instructions,
                            &mut next_slot,
                            ops,
                        )?;
                        level -= 1;
                        i = close;
                    }
                }
                Entry::Delim(Delim::RightParen) => level -= 1,
                _ => {}
            }
            i += 1;
        }
    }

    let end = code.len();
    reduce_range(&mut code, 0, end, &mut instructions, &mut next_slot, ops)?;

    // Exactly one operand may survive; anything else is structural garbage
    // like "x y" or "()".
    let mut residual = None;
    for entry in &code {
        match entry {
            Entry::Consumed => {}
            Entry::Operand(slot) if residual.is_none() => residual = Some(*slot),
            _ => {
                return Err(SymFunError::IllegalExpression {
                    expression: String::new(),
                })
            }
        }
    }
    let residual = residual.ok_or(SymFunError::IllegalExpression {
        expression: String::new(),
    })?;

    // Bare symbol (possibly parenthesized): wrap it in a unary-plus identity
    // so the final slot is still the result.
    if instructions.is_empty() {
        let identity = ops
            .unary_index("+")
            .ok_or_else(|| SymFunError::illegal_symbol("+"))?;
        instructions.push(Instruction {
            op: identity,
            args: SmallVec::from_slice(&[residual]),
            result: next_slot,
        });
        next_slot += 1;
    }

    Ok(Program {
        instructions,
        eval_data_size: next_slot,
    })
}

fn balance_check(code: &[Entry]) -> Result<(), SymFunError> {
    let mut sum: i32 = 0;
    for entry in code {
        match entry {
            Entry::Delim(Delim::LeftParen) => sum += 1,
            Entry::Delim(Delim::RightParen) => sum -= 1,
            _ => {}
        }
    }
    if sum != 0 {
        return Err(SymFunError::UnbalancedParenthesis {
            expression: String::new(),
        });
    }
    Ok(())
}

fn max_depth(code: &[Entry]) -> i32 {
    let mut level: i32 = 0;
    let mut deepest: i32 = 0;
    for entry in code {
        match entry {
            Entry::Delim(Delim::LeftParen) => {
                level += 1;
                deepest = deepest.max(level);
            }
            Entry::Delim(Delim::RightParen) => level -= 1,
            _ => {}
        }
    }
    deepest
}

/// Collapse the paren-free range `[start, end)` to a single operand,
/// emitting instructions in precedence order.
fn reduce_range(
    code: &mut [Entry],
    start: usize,
    end: usize,
    instructions: &mut Vec<Instruction>,
    next_slot: &mut Slot,
    ops: &dyn OperatorTable,
) -> Result<(), SymFunError> {
    // Commas only separate call arguments; spent once the range reduces.
    for entry in code[start..end].iter_mut() {
        if *entry == Entry::Delim(Delim::Comma) {
            *entry = Entry::Consumed;
        }
    }

    // Function calls: consume the declared arity of operands to the right.
    for i in start..end {
        if let Entry::Operator {
            prec: Precedence::Call,
            op,
        } = code[i]
        {
            let arity = ops.def(op).arity;
            let mut args: SmallVec<[Slot; 2]> = SmallVec::new();
            for _ in 0..arity {
                let slot = take_operand_right(code, i + 1, end)
                    .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
                args.push(slot);
            }
            emit(code, i, op, args, instructions, next_slot);
        }
    }

    // Exponentiation: one operand right, one operand left.
    for i in start..end {
        if let Entry::Operator {
            prec: Precedence::Power,
            op,
        } = code[i]
        {
            let right = take_operand_right(code, i + 1, end)
                .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
            let left = take_operand_left(code, start, i)
                .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
            emit(
                code,
                i,
                op,
                SmallVec::from_slice(&[left, right]),
                instructions,
                next_slot,
            );
        }
    }

    // Unary signs: one operand right.
    for i in start..end {
        if let Entry::Operator {
            prec: Precedence::Sign,
            op,
        } = code[i]
        {
            let arg = take_operand_right(code, i + 1, end)
                .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
            emit(
                code,
                i,
                op,
                SmallVec::from_slice(&[arg]),
                instructions,
                next_slot,
            );
        }
    }

    // Remaining binaries, multiplicative before additive.
    for class in [Precedence::MulDiv, Precedence::AddSub] {
        for i in start..end {
            if let Entry::Operator { prec, op } = code[i] {
                if prec != class {
                    continue;
                }
                if i + 1 >= end {
                    return Err(SymFunError::incorrect_arguments(ops.def(op).symbol));
                }
                let right = take_operand_right(code, i + 1, end)
                    .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
                let left = take_operand_left(code, start, i)
                    .ok_or_else(|| SymFunError::incorrect_arguments(ops.def(op).symbol))?;
                emit(
                    code,
                    i,
                    op,
                    SmallVec::from_slice(&[left, right]),
                    instructions,
                    next_slot,
                );
            }
        }
    }

    Ok(())
}

/// Allocate a temporary, record the instruction, and replace the operator
/// entry with an operand carrying its result.
fn emit(
    code: &mut [Entry],
    at: usize,
    op: OpIndex,
    args: SmallVec<[Slot; 2]>,
    instructions: &mut Vec<Instruction>,
    next_slot: &mut Slot,
) {
    let result = *next_slot;
    *next_slot += 1;
    instructions.push(Instruction { op, args, result });
    code[at] = Entry::Operand(result);
}

/// Consume the first unconsumed entry right of `from`; `None` if it is not
/// an operand or the range ends first.
fn take_operand_right(code: &mut [Entry], from: usize, end: usize) -> Option<Slot> {
    for j in from..end {
        match code[j] {
            Entry::Consumed => {}
            Entry::Operand(slot) => {
                code[j] = Entry::Consumed;
                return Some(slot);
            }
            _ => return None,
        }
    }
    None
}

/// Consume the first unconsumed entry left of `until`, scanning toward
/// `start`.
fn take_operand_left(code: &mut [Entry], start: usize, until: usize) -> Option<Slot> {
    for j in (start..until).rev() {
        match code[j] {
            Entry::Consumed => {}
            Entry::Operand(slot) => {
                code[j] = Entry::Consumed;
                return Some(slot);
            }
            _ => return None,
        }
    }
    None
}
