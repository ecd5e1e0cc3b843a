//! Incremental assembly of the compile inputs.

use crate::error::SymFunError;
use crate::eval::SymFun;

/// Collects variables and symbolic constants before compiling an
/// expression, for callers that assemble the function specification piece
/// by piece (e.g. from configuration) rather than as parallel slices.
///
/// # Example
///
/// ```
/// use symfun::SymFunBuilder;
///
/// let mut f = SymFunBuilder::new()
///     .variable("x")
///     .constant("a", 2.0)
///     .build("a*x^2")
///     .unwrap();
/// assert_eq!(f.eval(&[3.0]), 18.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymFunBuilder {
    variables: Vec<String>,
    constants: Vec<(String, f64)>,
}

impl SymFunBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable. Declaration order is argument order.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    /// Append several variables at once.
    pub fn variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append a symbolic constant with its initial value.
    pub fn constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.push((name.into(), value));
        self
    }

    /// Compile `expression` against the collected declarations. The builder
    /// is not consumed and can compile several expressions over the same
    /// declarations.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`SymFun::compile`].
    pub fn build(&self, expression: &str) -> Result<SymFun, SymFunError> {
        let variables: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        let constants: Vec<&str> = self.constants.iter().map(|(n, _)| n.as_str()).collect();
        let values: Vec<f64> = self.constants.iter().map(|(_, v)| *v).collect();
        SymFun::compile(&variables, &constants, &values, expression)
    }
}
