//! Re-synthesizes per-slot expression text from a compiled program.
//!
//! Walking the instruction list in program order rebuilds, for every slot,
//! the text of the value that slot holds. Parenthesization is driven by a
//! per-slot rank: a child is wrapped exactly when its recorded rank does not
//! bind strictly tighter than the current operator, so the re-synthesized
//! text parses back to the same program. Leaf slots (names and literals)
//! rank tighter than everything and are never wrapped.

use crate::eval::SymFun;

/// Leaf rank: binds tighter than any operator.
const LEAF: i32 = -1;

/// Per-slot reconstructed text and the rank it was produced at.
pub(crate) struct SlotText {
    pub values: Vec<String>,
    pub rank: Vec<i32>,
}

impl SlotText {
    /// Text of the program's final slot, i.e. the whole expression.
    pub fn final_text(&self) -> &str {
        self.values.last().map(String::as_str).unwrap_or("")
    }
}

/// Rebuild the evaluation text of every slot of `f`'s program.
pub(crate) fn evaluation_strings(f: &SymFun) -> SlotText {
    let symbols = f.symbols();
    let ops = f.ops();
    let size = f.program().eval_data_size;

    let mut values = vec![String::new(); size];
    let mut rank = vec![LEAF; size];
    for slot in 0..symbols.len() {
        values[slot] = symbols.name(slot).to_owned();
    }

    for instr in &f.program().instructions {
        let def = ops.def(instr.op);
        let prec = def.precedence.rank();

        let text = match instr.args.as_slice() {
            [a] => {
                // A sign applied directly to a literal reads as part of the
                // number: "-2", not "-(2)".
                if symbols.is_literal(*a) && matches!(def.symbol, "+" | "-" | "*" | "/") {
                    format!("{}{}", def.symbol, values[*a])
                } else {
                    format!("{}({})", def.symbol, values[*a])
                }
            }
            [a, b] => match def.symbol {
                "atan2" | "pow" | "fmod" => {
                    format!("{}({},{})", def.symbol, values[*a], values[*b])
                }
                // Caret re-renders as a call so the text needs no
                // associativity bookkeeping.
                "^" => format!("pow({},{})", values[*a], values[*b]),
                _ => {
                    let left = wrap(&values[*a], rank[*a] >= prec);
                    let right = wrap(&values[*b], rank[*b] >= prec);
                    format!("{}{}{}", left, def.symbol, right)
                }
            },
            args => {
                let rendered: Vec<&str> = args.iter().map(|s| values[*s].as_str()).collect();
                format!("{}({})", def.symbol, rendered.join(","))
            }
        };

        values[instr.result] = text;
        rank[instr.result] = prec;
    }

    SlotText { values, rank }
}

fn wrap(text: &str, needed: bool) -> String {
    if needed {
        format!("({})", text)
    } else {
        text.to_owned()
    }
}
