//! Compiled Symbolic Functions
//!
//! A small, focused library for turning textual algebraic expressions into
//! fast, repeatedly evaluable programs, with symbolic differentiation.
//!
//! # Features
//! - Compile once, evaluate many times: expressions become flat
//!   single-assignment programs over an indexed data buffer, interpreted in
//!   a single linear pass
//! - Named variables and symbolic constants; constants can be changed
//!   without recompiling
//! - Symbolic differentiation producing a new compiled expression
//! - Pluggable operator registry; the standard table covers arithmetic and
//!   the elementary functions
//!
//! # Usage
//!
//! ```
//! use symfun::SymFun;
//!
//! let mut f = SymFun::compile(&["x"], &["a", "b", "c"], &[1.0, 2.0, 1.0], "a*x^2+b*x+c").unwrap();
//! assert_eq!(f.eval(&[1.0]), 4.0);
//!
//! // Re-coefficient without recompiling.
//! f.set_constant("a", 2.0);
//! assert_eq!(f.eval(&[1.0]), 5.0);
//! ```
//!
//! Differentiation returns an independent compiled expression:
//!
//! ```
//! use symfun::{differentiate, SymFun};
//!
//! let f = SymFun::new("x^3").unwrap();
//! let mut df = differentiate(&f, "x").unwrap();
//! assert_eq!(df.eval(&[2.0]), 12.0);
//! ```

mod builder;
mod compiler;
mod deriv;
mod error;
mod eval;
mod helpers;
pub mod ops;
mod parser;
mod symbol;

#[cfg(test)]
mod tests;

pub use builder::SymFunBuilder;
pub use deriv::differentiate;
pub use error::SymFunError;
pub use eval::SymFun;
pub use helpers::{gradient, hessian};
pub use ops::{OpIndex, OperatorDef, OperatorTable, Precedence, StandardOps};
pub use symbol::{Slot, SymbolKind, SymbolTable};
