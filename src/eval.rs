//! Compiled symbolic functions.
//!
//! ```text
//! ┌────────────┐    ┌───────────┐    ┌──────────────┐    ┌──────────┐
//! │ expression │ -> │ tokenizer │ -> │   encoder    │ -> │ compiler │
//! │    text    │    │           │    │ (interm. IR) │    │ (slots)  │
//! └────────────┘    └───────────┘    └──────────────┘    └──────────┘
//!                                                              │
//!                                                              ▼
//!                                                       ┌────────────┐
//!                                                       │   SymFun   │
//!                                                       │ eval / d/dx│
//!                                                       └────────────┘
//! ```
//!
//! A [`SymFun`] owns its source text, symbol table, execution program, and
//! evaluation-data buffer. Evaluation rebinds the variable slots and runs
//! the program once, front to back: no tree walking, no branching, no
//! allocation.

use smallvec::SmallVec;

use crate::compiler::{self, Program};
use crate::error::SymFunError;
use crate::ops::{OperatorTable, StandardOps};
use crate::parser;
use crate::symbol::SymbolTable;

/// A textual algebraic expression compiled to a slot-machine program.
///
/// The evaluation-data buffer is laid out as
/// `[variables | constants | literals | temporaries]`. Variables are
/// rebound on every [`eval`](SymFun::eval) call; constants can be changed
/// by name without recompiling; literal slots are parsed once at compile
/// time; temporaries are written as the program runs.
///
/// # Example
///
/// ```
/// use symfun::SymFun;
///
/// let mut f = SymFun::compile(&["x", "y"], &[], &[], "x^2 + 2*y").unwrap();
/// assert_eq!(f.eval(&[2.0, 3.0]), 10.0);
/// ```
///
/// # Thread safety
///
/// Evaluation overwrites the variable slots in place, so it takes
/// `&mut self`; share a `SymFun` across threads by cloning it (a clone
/// duplicates every owned buffer and never aliases the original).
#[derive(Clone)]
pub struct SymFun {
    source: String,
    symbols: SymbolTable,
    program: Program,
    constant_values: Vec<f64>,
    data: Vec<f64>,
    ops: &'static dyn OperatorTable,
}

impl SymFun {
    /// Compile `expression` over the given variables and symbolic constants
    /// using the standard operator table.
    ///
    /// Variables and constants define identifier recognition; every
    /// identifier in the expression must name one of them or a registry
    /// function. `constant_values` supplies one initial value per constant,
    /// in order.
    ///
    /// # Panics
    ///
    /// Panics if `constants` and `constant_values` differ in length.
    ///
    /// # Errors
    ///
    /// [`SymFunError::IllegalSymbol`],
    /// [`SymFunError::UnbalancedParenthesis`],
    /// [`SymFunError::IncorrectNumberOfArguments`],
    /// [`SymFunError::IllegalExpression`].
    pub fn compile(
        variables: &[&str],
        constants: &[&str],
        constant_values: &[f64],
        expression: &str,
    ) -> Result<Self, SymFunError> {
        Self::compile_with(
            variables,
            constants,
            constant_values,
            expression,
            StandardOps::shared(),
        )
    }

    /// Compile against a caller-supplied operator table.
    pub fn compile_with(
        variables: &[&str],
        constants: &[&str],
        constant_values: &[f64],
        expression: &str,
        ops: &'static dyn OperatorTable,
    ) -> Result<Self, SymFunError> {
        assert_eq!(
            constants.len(),
            constant_values.len(),
            "one initial value per symbolic constant"
        );

        let (symbols, code) = parser::analyze(variables, constants, expression, ops)?;
        let program = compiler::reduce(code, &symbols, ops)
            .map_err(|e| e.with_expression(expression))?;

        log::debug!(
            "compiled \"{}\": {} symbols, {} instructions, {} data slots",
            expression,
            symbols.len(),
            program.instructions.len(),
            program.eval_data_size
        );

        let mut data = vec![0.0; program.eval_data_size];
        for (offset, &value) in constant_values.iter().enumerate() {
            data[symbols.variable_count() + offset] = value;
        }
        for slot in symbols.variable_count() + symbols.constant_count()..symbols.len() {
            data[slot] = symbols.literal_value(slot);
        }

        Ok(SymFun {
            source: expression.to_owned(),
            symbols,
            program,
            constant_values: constant_values.to_vec(),
            data,
            ops,
        })
    }

    /// Compile an expression in the single variable `x`.
    ///
    /// ```
    /// use symfun::SymFun;
    /// let mut f = SymFun::new("x^2 + 1").unwrap();
    /// assert_eq!(f.eval(&[3.0]), 10.0);
    /// ```
    pub fn new(expression: &str) -> Result<Self, SymFunError> {
        Self::compile(&["x"], &[], &[], expression)
    }

    /// Compile an expression over the given variables, with no constants.
    pub fn with_variables(variables: &[&str], expression: &str) -> Result<Self, SymFunError> {
        Self::compile(variables, &[], &[], expression)
    }

    /// Evaluate at the given variable values, in declaration order.
    ///
    /// Passing the wrong number of values is a caller contract violation:
    /// it is checked in debug builds only, and release behavior is
    /// unspecified.
    pub fn eval(&mut self, values: &[f64]) -> f64 {
        debug_assert_eq!(
            values.len(),
            self.symbols.variable_count(),
            "called with {} arguments, expected {}",
            values.len(),
            self.symbols.variable_count()
        );
        self.data[..values.len()].copy_from_slice(values);

        let mut argv: SmallVec<[f64; 2]> = SmallVec::new();
        for instr in &self.program.instructions {
            argv.clear();
            for &slot in &instr.args {
                argv.push(self.data[slot]);
            }
            self.data[instr.result] = (self.ops.def(instr.op).eval)(&argv);
        }

        self.data[self.program.eval_data_size - 1]
    }

    /// Current value of the named symbolic constant.
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.symbols
            .constant_names()
            .iter()
            .position(|n| n == name)
            .map(|i| self.constant_values[i])
    }

    /// Set the named symbolic constant without recompiling. Unknown names
    /// are ignored.
    pub fn set_constant(&mut self, name: &str, value: f64) {
        if let Some(i) = self.symbols.constant_names().iter().position(|n| n == name) {
            self.constant_values[i] = value;
        }
        // Refresh the whole constant region of the evaluation data.
        let base = self.symbols.variable_count();
        for (offset, &v) in self.constant_values.iter().enumerate() {
            self.data[base + offset] = v;
        }
    }

    /// The expression text this instance was compiled from.
    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Declared variable names, in declaration (and argument) order.
    pub fn variable_names(&self) -> &[String] {
        self.symbols.variable_names()
    }

    /// Declared symbolic constant names, in declaration order.
    pub fn constant_names(&self) -> &[String] {
        self.symbols.constant_names()
    }

    /// Current symbolic constant values, in declaration order.
    pub fn constant_values(&self) -> &[f64] {
        &self.constant_values
    }

    pub fn variable_count(&self) -> usize {
        self.symbols.variable_count()
    }

    pub fn constant_count(&self) -> usize {
        self.symbols.constant_count()
    }

    /// Number of instructions in the compiled program.
    pub fn instruction_count(&self) -> usize {
        self.program.instructions.len()
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn program(&self) -> &Program {
        &self.program
    }

    pub(crate) fn ops(&self) -> &'static dyn OperatorTable {
        self.ops
    }
}

impl std::fmt::Debug for SymFun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymFun")
            .field("source", &self.source)
            .field("variables", &self.symbols.variable_names())
            .field("constants", &self.symbols.constant_names())
            .field("instruction_count", &self.program.instructions.len())
            .field("eval_data_size", &self.program.eval_data_size)
            .finish()
    }
}
