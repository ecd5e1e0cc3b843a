//! The standard real-arithmetic operator table.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::{OpIndex, OperatorDef, OperatorTable, Precedence};

/// Standard operator set: unary signs, the five algebraic binaries, and the
/// elementary function library.
///
/// Index order is fixed: entries are only ever appended, because compiled
/// programs reference operators by position. The unary and binary forms of
/// `+` and `-` are distinct entries; name lookup resolves to the binary
/// form, and the encoder asks for the unary form explicitly when context
/// demands it.
pub struct StandardOps;

impl StandardOps {
    /// Shared table instance used by the default compile entrypoints.
    pub fn shared() -> &'static Self {
        static SHARED: StandardOps = StandardOps;
        &SHARED
    }
}

fn definitions() -> Vec<OperatorDef> {
    vec![
        // Unary signs (indices 0, 1)
        OperatorDef {
            symbol: "+",
            arity: 1,
            precedence: Precedence::Sign,
            eval: |args| args[0],
        },
        OperatorDef {
            symbol: "-",
            arity: 1,
            precedence: Precedence::Sign,
            eval: |args| -args[0],
        },
        // Algebraic binaries (indices 2..=6)
        OperatorDef {
            symbol: "+",
            arity: 2,
            precedence: Precedence::AddSub,
            eval: |args| args[0] + args[1],
        },
        OperatorDef {
            symbol: "-",
            arity: 2,
            precedence: Precedence::AddSub,
            eval: |args| args[0] - args[1],
        },
        OperatorDef {
            symbol: "*",
            arity: 2,
            precedence: Precedence::MulDiv,
            eval: |args| args[0] * args[1],
        },
        OperatorDef {
            symbol: "/",
            arity: 2,
            precedence: Precedence::MulDiv,
            eval: |args| args[0] / args[1],
        },
        OperatorDef {
            symbol: "^",
            arity: 2,
            precedence: Precedence::Power,
            eval: |args| args[0].powf(args[1]),
        },
        // Function library (indices 7..)
        OperatorDef {
            symbol: "sin",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].sin(),
        },
        OperatorDef {
            symbol: "cos",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].cos(),
        },
        OperatorDef {
            symbol: "tan",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].tan(),
        },
        OperatorDef {
            symbol: "asin",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].asin(),
        },
        OperatorDef {
            symbol: "acos",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].acos(),
        },
        OperatorDef {
            symbol: "atan",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].atan(),
        },
        OperatorDef {
            symbol: "atan2",
            arity: 2,
            precedence: Precedence::Call,
            eval: |args| args[0].atan2(args[1]),
        },
        OperatorDef {
            symbol: "sinh",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].sinh(),
        },
        OperatorDef {
            symbol: "cosh",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].cosh(),
        },
        OperatorDef {
            symbol: "tanh",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].tanh(),
        },
        OperatorDef {
            symbol: "ceil",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].ceil(),
        },
        OperatorDef {
            symbol: "exp",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].exp(),
        },
        OperatorDef {
            symbol: "abs",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].abs(),
        },
        OperatorDef {
            symbol: "floor",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].floor(),
        },
        OperatorDef {
            symbol: "fmod",
            arity: 2,
            precedence: Precedence::Call,
            eval: |args| args[0] % args[1],
        },
        OperatorDef {
            symbol: "log",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].ln(),
        },
        OperatorDef {
            symbol: "log10",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].log10(),
        },
        OperatorDef {
            symbol: "sqrt",
            arity: 1,
            precedence: Precedence::Call,
            eval: |args| args[0].sqrt(),
        },
        OperatorDef {
            symbol: "pow",
            arity: 2,
            precedence: Precedence::Call,
            eval: |args| args[0].powf(args[1]),
        },
    ]
}

fn table() -> &'static [OperatorDef] {
    static TABLE: OnceLock<Vec<OperatorDef>> = OnceLock::new();
    TABLE.get_or_init(definitions)
}

fn name_map() -> &'static FxHashMap<&'static str, OpIndex> {
    static MAP: OnceLock<FxHashMap<&'static str, OpIndex>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = FxHashMap::default();
        // Later entries win, so "+" and "-" resolve to their binary forms.
        for (index, def) in table().iter().enumerate() {
            map.insert(def.symbol, index);
        }
        map
    })
}

impl OperatorTable for StandardOps {
    fn operator_index(&self, symbol: &str) -> Option<OpIndex> {
        name_map().get(symbol).copied()
    }

    fn unary_index(&self, symbol: &str) -> Option<OpIndex> {
        match symbol {
            "+" => Some(0),
            "-" => Some(1),
            _ => None,
        }
    }

    fn binary_index(&self, symbol: &str) -> Option<OpIndex> {
        match symbol {
            "+" => Some(2),
            "-" => Some(3),
            _ => None,
        }
    }

    fn def(&self, op: OpIndex) -> &OperatorDef {
        &table()[op]
    }

    fn count(&self) -> usize {
        table().len()
    }
}
