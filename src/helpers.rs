//! Convenience calculus helpers layered on the differentiate entrypoint.

use crate::deriv::differentiate;
use crate::error::SymFunError;
use crate::eval::SymFun;

/// Partial derivatives of `f` with respect to every declared variable, in
/// declaration order.
///
/// # Errors
///
/// Fails only if a derivative fails to recompile.
pub fn gradient(f: &SymFun) -> Result<Vec<SymFun>, SymFunError> {
    f.variable_names()
        .iter()
        .map(|var| differentiate(f, var))
        .collect()
}

/// Matrix of second partials: `hessian(f)[i][j]` differentiates first by
/// variable `i`, then by variable `j`.
///
/// # Errors
///
/// Fails only if a derivative fails to recompile.
pub fn hessian(f: &SymFun) -> Result<Vec<Vec<SymFun>>, SymFunError> {
    gradient(f)?.iter().map(gradient).collect()
}
