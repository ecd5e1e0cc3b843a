//! Symbolic differentiation of compiled expressions.
//!
//! The differentiator never builds a tree. It walks the compiled program in
//! evaluation order carrying two string arrays: the reconstructed value text
//! of every slot (from [`render`]) and the derivative text of every slot,
//! seeded with `"1"` at the target variable and `""` (exactly zero)
//! everywhere else. Each instruction rewrites its result slot's derivative
//! text through the per-operator rule table, and the final slot's text is
//! recompiled into a fresh [`SymFun`].
//!
//! The rule table deliberately over-parenthesizes; the derivative text is
//! therefore compiled, re-synthesized once, and compiled again, which sheds
//! the redundant wrapping without performing any algebraic simplification.

mod render;
mod rules;

pub(crate) use render::evaluation_strings;

use crate::error::SymFunError;
use crate::eval::SymFun;

use rules::BinaryArgs;

/// Differentiate `f` with respect to the variable named `var`, producing a
/// new compiled expression over the same variables and constants.
///
/// A `var` that names no declared variable is not an error: the result is
/// the constant-zero expression.
///
/// # Example
///
/// ```
/// use symfun::{differentiate, SymFun};
///
/// let f = SymFun::new("x^2 + sin(x)").unwrap();
/// let mut df = differentiate(&f, "x").unwrap();
/// let x = 0.75;
/// assert!((df.eval(&[x]) - (2.0 * x + x.cos())).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Only the recompilation of the derivative text can fail, with the same
/// failure modes as [`SymFun::compile`].
pub fn differentiate(f: &SymFun, var: &str) -> Result<SymFun, SymFunError> {
    let symbols = f.symbols();

    let Some(target) = symbols
        .variable_names()
        .iter()
        .position(|name| name == var)
    else {
        return recompile(f, "0");
    };

    let value = evaluation_strings(f);
    let size = f.program().eval_data_size;
    let mut deriv = vec![String::new(); size];
    deriv[target] = "1".to_owned();

    for instr in &f.program().instructions {
        let def = f.ops().def(instr.op);
        let text = match instr.args.as_slice() {
            [a] => rules::unary_rule(def.symbol, &value.values[*a], &deriv[*a]),
            [a, b] => rules::binary_rule(
                def.symbol,
                &BinaryArgs {
                    u: &value.values[*a],
                    du: &deriv[*a],
                    v: &value.values[*b],
                    dv: &deriv[*b],
                    v_is_literal: symbols.is_literal(*b),
                },
            ),
            _ => String::new(),
        };
        deriv[instr.result] = text;
    }

    let raw = if deriv[size - 1].is_empty() {
        "0"
    } else {
        deriv[size - 1].as_str()
    };
    log::trace!("d/d{} \"{}\" -> \"{}\"", var, f.source_text(), raw);

    // Cleanup pass: recompiling the re-synthesized text strips the rule
    // table's redundant parentheses while leaving values untouched.
    let first = recompile(f, raw)?;
    let cleaned = evaluation_strings(&first);
    let text = if cleaned.final_text().is_empty() {
        "0"
    } else {
        cleaned.final_text()
    };
    let result = recompile(f, text)?;

    log::debug!(
        "differentiated \"{}\" by {}: \"{}\"",
        f.source_text(),
        var,
        result.source_text()
    );
    Ok(result)
}

/// Compile `text` with `f`'s variables, constants, and operator table.
fn recompile(f: &SymFun, text: &str) -> Result<SymFun, SymFunError> {
    let variables: Vec<&str> = f.variable_names().iter().map(String::as_str).collect();
    let constants: Vec<&str> = f.constant_names().iter().map(String::as_str).collect();
    SymFun::compile_with(
        &variables,
        &constants,
        f.constant_values(),
        text,
        f.ops(),
    )
}
