//! Per-operator textual derivative rules.
//!
//! Each rule composes the derivative text of an instruction's result slot
//! from the value and derivative texts of its argument slots. Two identity
//! conventions thread through every rule: an empty derivative text means
//! "exactly zero" and short-circuits the whole rule, and a derivative text
//! of `"1"` or `"(1)"` elides its multiplicative chain factor. No other
//! simplification is performed; redundant parentheses are left for the
//! recompile cleanup to absorb.

/// Arguments to a binary derivative rule: value and derivative texts of
/// both operands, plus whether the right operand is a compile-time numeric
/// literal (which specializes the power rule).
pub(crate) struct BinaryArgs<'a> {
    pub u: &'a str,
    pub du: &'a str,
    pub v: &'a str,
    pub dv: &'a str,
    pub v_is_literal: bool,
}

/// Multiplicative identity in derivative text form.
fn is_unit(text: &str) -> bool {
    text == "1" || text == "(1)"
}

/// Derivative text for a one-argument operator, or empty when the operator
/// has no rule (its derivative is carried as zero).
pub(crate) fn unary_rule(symbol: &str, u: &str, du: &str) -> String {
    if du.is_empty() {
        return String::new();
    }
    match symbol {
        "+" | "-" => format!("{}({})", symbol, du),

        "sin" | "cos" | "exp" | "cosh" | "sinh" => {
            let outer = match symbol {
                "sin" => "cos",
                "cos" => "-sin",
                "exp" => "exp",
                "cosh" => "sinh",
                _ => "cosh",
            };
            if is_unit(du) {
                format!("({}({}))", outer, u)
            } else {
                format!("({}({}))*({})", outer, u, du)
            }
        }

        "asin" => {
            if is_unit(du) {
                format!("(1./sqrt(1.-({})^2))", u)
            } else {
                format!("((1./sqrt(1.-({})^2))*({}))", u, du)
            }
        }
        "acos" => {
            if is_unit(du) {
                format!("(-1./sqrt(1-({})^2))", u)
            } else {
                format!("((-1./sqrt(1-({})^2))*({}))", u, du)
            }
        }
        "atan" => {
            if is_unit(du) {
                format!("(1./(1.+({})^2))", u)
            } else {
                format!("((1./(1.+({})^2))*({}))", u, du)
            }
        }

        "log" => {
            if is_unit(du) {
                format!("(1./({}))", u)
            } else {
                format!("(1./({}))*({})", u, du)
            }
        }
        "log10" => {
            if is_unit(du) {
                format!("(1./(({})*log(10.0)))", u)
            } else {
                format!("((1./(({})*log(10.0)))*({}))", u, du)
            }
        }
        "sqrt" => {
            if is_unit(du) {
                format!("(0.5/({})^0.5)", u)
            } else {
                format!("((0.5/({})^0.5)*({}))", u, du)
            }
        }
        "tan" => {
            if is_unit(du) {
                format!("(1/(cos({})^2))", u)
            } else {
                format!("((1/(cos({})^2))*({}))", u, du)
            }
        }
        "tanh" => {
            if is_unit(du) {
                format!("(1/(cosh({})^2))", u)
            } else {
                format!("((1/(cosh({})^2))*({}))", u, du)
            }
        }

        // ceil, floor, abs: no closed-form rule is carried.
        _ => String::new(),
    }
}

/// Derivative text for a two-argument operator.
pub(crate) fn binary_rule(symbol: &str, args: &BinaryArgs<'_>) -> String {
    if args.du.is_empty() && args.dv.is_empty() {
        return String::new();
    }
    match symbol {
        "+" | "-" => {
            if !args.dv.is_empty() {
                format!("({}{}{})", args.du, symbol, args.dv)
            } else {
                format!("({})", args.du)
            }
        }
        "*" => product_rule(args),
        "/" => quotient_rule(args),
        "^" | "pow" => power_rule(args),
        // atan2, fmod: no rule carried.
        _ => String::new(),
    }
}

fn product_rule(args: &BinaryArgs<'_>) -> String {
    let mut text = String::from("(");
    if !args.du.is_empty() {
        if is_unit(args.du) {
            text.push_str(args.v);
        } else {
            text.push_str(&format!("{}*({})", args.du, args.v));
        }
    }
    if !args.dv.is_empty() {
        if !args.du.is_empty() {
            text.push('+');
        }
        if is_unit(args.dv) {
            text.push_str(args.u);
        } else {
            text.push_str(&format!("({})*{}", args.u, args.dv));
        }
    }
    text.push(')');
    text
}

fn quotient_rule(args: &BinaryArgs<'_>) -> String {
    let mut text = String::from("((");
    if !args.du.is_empty() {
        if is_unit(args.du) {
            text.push_str(args.v);
        } else {
            text.push_str(&format!("{}*({})", args.du, args.v));
        }
    }
    if !args.dv.is_empty() {
        if is_unit(args.dv) {
            text.push_str(&format!("-({})", args.u));
        } else {
            text.push_str(&format!("-({})*{}", args.u, args.dv));
        }
    }
    text.push_str(&format!(")/(({})^2))", args.v));
    text
}

// Exact comparison against 0.0 and 1.0 picks the specialized text forms;
// any other value takes the general branch.
#[allow(clippy::float_cmp)]
fn power_rule(args: &BinaryArgs<'_>) -> String {
    let mut text = String::new();

    if !args.du.is_empty() {
        if args.v_is_literal {
            if is_decimal_text(args.v) {
                let dexp = args.v.parse::<f64>().unwrap_or(0.0) - 1.0;
                if dexp == 0.0 {
                    text.push_str(args.du);
                } else if dexp == 1.0 {
                    if is_unit(args.du) {
                        text.push_str(&format!("({}*({}))", args.v, args.u));
                    } else {
                        text.push_str(&format!("({}*({})*({}))", args.v, args.u, args.du));
                    }
                } else {
                    let exponent = format_significant(dexp, args.v.len());
                    if is_unit(args.du) {
                        text.push_str(&format!("({})*pow({},{})", args.v, args.u, exponent));
                    } else {
                        text.push_str(&format!(
                            "({})*pow({},{})*({})",
                            args.v, args.u, exponent, args.du
                        ));
                    }
                }
            } else {
                let iexp = args.v.parse::<i64>().unwrap_or(0) - 1;
                if iexp == 0 {
                    text.push_str(args.du);
                } else if iexp == 1 {
                    if is_unit(args.du) {
                        text.push_str(&format!("({}*({}))", args.v, args.u));
                    } else {
                        text.push_str(&format!("({}*({})*({}))", args.v, args.u, args.du));
                    }
                } else if is_unit(args.du) {
                    text.push_str(&format!("({}*pow({},{}))", args.v, args.u, iexp));
                } else {
                    text.push_str(&format!("({}*pow({},{}))*({})", args.v, args.u, iexp, args.du));
                }
            }
        } else if is_unit(args.du) {
            text.push_str(&format!("(({})*({})^({}-1.))", args.v, args.u, args.v));
        } else {
            text.push_str(&format!(
                "(({})*({})^({}-1.))*({})",
                args.v, args.u, args.v, args.du
            ));
        }
    }

    if !args.dv.is_empty() {
        if !args.du.is_empty() {
            text.push('+');
        }
        text.push_str(&format!(
            "(({})*({})^({}))*log({})",
            args.dv, args.u, args.v, args.u
        ));
    }

    text
}

/// Literal exponent texts with a decimal point or an exponent marker take
/// the floating-point specialization; plain digit runs take the integer
/// one.
fn is_decimal_text(text: &str) -> bool {
    text.contains(|c| c == '.' || c == 'e' || c == 'E')
}

/// Format `x` with `sig` significant digits, trimming trailing zeros.
/// Keeps `exponent - 1` texts short: `1.3 - 1` renders as `0.3`.
fn format_significant(x: f64, sig: usize) -> String {
    if x == 0.0 {
        return "0".to_owned();
    }
    let digits = sig.max(1) as i32;
    let magnitude = x.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let mut text = format!("{:.*}", decimals, x);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary<'a>(u: &'a str, du: &'a str, v: &'a str, dv: &'a str, lit: bool) -> BinaryArgs<'a> {
        BinaryArgs {
            u,
            du,
            v,
            dv,
            v_is_literal: lit,
        }
    }

    #[test]
    fn zero_short_circuits_every_rule() {
        assert_eq!(unary_rule("sin", "x", ""), "");
        assert_eq!(unary_rule("-", "x", ""), "");
        assert_eq!(binary_rule("*", &binary("a", "", "b", "", false)), "");
        assert_eq!(binary_rule("^", &binary("a", "", "2", "", true)), "");
    }

    #[test]
    fn unit_elides_chain_factor() {
        assert_eq!(unary_rule("sin", "x", "1"), "(cos(x))");
        assert_eq!(unary_rule("sin", "x", "(1)"), "(cos(x))");
        assert_eq!(unary_rule("sin", "x", "(2)"), "(cos(x))*((2))");
    }

    #[test]
    fn sum_rule_keeps_operator() {
        assert_eq!(binary_rule("+", &binary("a", "1", "b", "1", false)), "(1+1)");
        assert_eq!(binary_rule("-", &binary("a", "", "b", "1", false)), "(-1)");
        assert_eq!(binary_rule("-", &binary("a", "1", "b", "", false)), "(1)");
    }

    #[test]
    fn product_rule_text() {
        // d(x*y) with dx=1, dy=0 -> y
        assert_eq!(binary_rule("*", &binary("x", "1", "y", "", false)), "(y)");
        // both sides active
        assert_eq!(
            binary_rule("*", &binary("f", "df", "g", "dg", false)),
            "(df*(g)+(f)*dg)"
        );
    }

    #[test]
    fn quotient_rule_text() {
        assert_eq!(
            binary_rule("/", &binary("1", "", "x", "1", false)),
            "((-(1))/((x)^2))"
        );
    }

    #[test]
    fn integer_power_specialization() {
        // d(x^2) = 2*x
        assert_eq!(
            binary_rule("^", &binary("x", "1", "2", "", true)),
            "(2*(x))"
        );
        // d(x^3) = 3*pow(x,2)
        assert_eq!(
            binary_rule("^", &binary("x", "1", "3", "", true)),
            "(3*pow(x,2))"
        );
        // d(x^1) = 1
        assert_eq!(binary_rule("^", &binary("x", "1", "1", "", true)), "1");
    }

    #[test]
    fn decimal_power_specialization() {
        // d(x^2.0): exponent-1 = 1 -> n*u form
        assert_eq!(
            binary_rule("^", &binary("x", "1", "2.0", "", true)),
            "(2.0*(x))"
        );
        // d(x^0.5): exponent-1 = -0.5
        assert_eq!(
            binary_rule("^", &binary("x", "1", "0.5", "", true)),
            "(0.5)*pow(x,-0.5)"
        );
        // d(x^1.3): 1.3-1 must render as 0.3, not 0.30000000000000004
        assert_eq!(
            binary_rule("^", &binary("x", "1", "1.3", "", true)),
            "(1.3)*pow(x,0.3)"
        );
    }

    #[test]
    fn variable_exponent_uses_general_rule() {
        assert_eq!(
            binary_rule("^", &binary("x", "1", "y", "", false)),
            "((y)*(x)^(y-1.))"
        );
        // x^x: both derivative texts active
        assert_eq!(
            binary_rule("^", &binary("x", "1", "x", "1", false)),
            "((x)*(x)^(x-1.))+((1)*(x)^(x))*log(x)"
        );
    }

    #[test]
    fn operators_without_rules_carry_zero() {
        assert_eq!(unary_rule("ceil", "x", "1"), "");
        assert_eq!(unary_rule("abs", "x", "1"), "");
        assert_eq!(binary_rule("atan2", &binary("y", "1", "x", "1", false)), "");
        assert_eq!(binary_rule("fmod", &binary("x", "1", "3", "", true)), "");
    }

    #[test]
    fn significant_digit_formatting() {
        assert_eq!(format_significant(0.30000000000000004, 3), "0.3");
        assert_eq!(format_significant(2.0, 3), "2");
        assert_eq!(format_significant(-0.5, 3), "-0.5");
        assert_eq!(format_significant(1.5, 3), "1.5");
    }
}
