//! Property-based tests.
//!
//! Uses quickcheck for:
//! - Robustness: arbitrary input never panics the compiler, it either
//!   compiles or returns a typed error
//! - Evaluation correctness of random quadratics against the closed form
//! - The power rule for random small exponents
//! - The re-synthesis round trip on randomly generated expressions

use quickcheck::{Gen, QuickCheck, TestResult};

use crate::deriv::evaluation_strings;
use crate::{differentiate, SymFun};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * (1.0 + a.abs().max(b.abs()))
}

fn prop_compiler_never_panics(text: String) -> TestResult {
    // Any outcome is fine; reaching the end is the property.
    let _ = SymFun::with_variables(&["x", "y"], &text);
    TestResult::passed()
}

#[test]
fn compiler_never_panics_on_arbitrary_input() {
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop_compiler_never_panics as fn(String) -> TestResult);
}

fn prop_quadratic_matches_closed_form(a: f64, b: f64, c: f64, x: f64) -> TestResult {
    if !(a.is_finite() && b.is_finite() && c.is_finite() && x.is_finite()) {
        return TestResult::discard();
    }
    if a.abs() > 1e6 || b.abs() > 1e6 || c.abs() > 1e6 || x.abs() > 1e3 {
        return TestResult::discard();
    }

    let mut f = SymFun::compile(&["x"], &["a", "b", "c"], &[a, b, c], "a*x^2+b*x+c").unwrap();
    let expect = a * x * x + b * x + c;
    TestResult::from_bool(close(f.eval(&[x]), expect))
}

#[test]
fn quadratic_matches_closed_form() {
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop_quadratic_matches_closed_form as fn(f64, f64, f64, f64) -> TestResult);
}

fn prop_power_rule(n: u8, x: f64) -> TestResult {
    let n = u32::from(n % 6) + 1;
    if !x.is_finite() || x.abs() > 50.0 || x.abs() < 1e-3 {
        return TestResult::discard();
    }

    let f = SymFun::new(&format!("x^{}", n)).unwrap();
    let mut df = differentiate(&f, "x").unwrap();
    let expect = f64::from(n) * x.powi(n as i32 - 1);
    TestResult::from_bool(close(df.eval(&[x]), expect))
}

#[test]
fn power_rule_for_small_exponents() {
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop_power_rule as fn(u8, f64) -> TestResult);
}

/// Build a random well-formed expression over `x` and `y` from a seed.
fn arbitrary_expression(g: &mut Gen, depth: usize) -> String {
    let leaf = ["x", "y", "2", "0.5", "3.0"];
    if depth == 0 {
        return (*g.choose(&leaf).unwrap()).to_owned();
    }

    match g.choose(&[0, 1, 2, 3, 4, 5]).unwrap() {
        0 => format!(
            "({}+{})",
            arbitrary_expression(g, depth - 1),
            arbitrary_expression(g, depth - 1)
        ),
        1 => format!(
            "({}-{})",
            arbitrary_expression(g, depth - 1),
            arbitrary_expression(g, depth - 1)
        ),
        2 => format!(
            "({}*{})",
            arbitrary_expression(g, depth - 1),
            arbitrary_expression(g, depth - 1)
        ),
        3 => format!("sin({})", arbitrary_expression(g, depth - 1)),
        4 => format!("cos({})", arbitrary_expression(g, depth - 1)),
        _ => format!("({})^2", arbitrary_expression(g, depth - 1)),
    }
}

fn prop_round_trip(seed: u64) -> TestResult {
    let mut g = Gen::new(seed as usize % 97 + 3);
    let text = arbitrary_expression(&mut g, 3);

    let mut f = match SymFun::with_variables(&["x", "y"], &text) {
        Ok(f) => f,
        Err(_) => return TestResult::discard(),
    };
    let rendered = evaluation_strings(&f).final_text().to_owned();
    let mut g2 = match SymFun::with_variables(&["x", "y"], &rendered) {
        Ok(f) => f,
        Err(err) => panic!("re-synthesized \"{}\" failed to compile: {}", rendered, err),
    };

    for point in [[0.3, -0.8], [1.1, 0.4], [-2.0, 2.5]] {
        let a = f.eval(&point);
        let b = g2.eval(&point);
        if a.is_finite() != b.is_finite() {
            return TestResult::failed();
        }
        if a.is_finite() && !close(a, b) {
            return TestResult::failed();
        }
    }
    TestResult::passed()
}

#[test]
fn round_trip_on_generated_expressions() {
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop_round_trip as fn(u64) -> TestResult);
}

fn prop_absent_variable_derivative_is_zero(x: f64) -> TestResult {
    if !x.is_finite() || x.abs() > 1e3 {
        return TestResult::discard();
    }
    let f = SymFun::new("x^2 + sin(x)").unwrap();
    let mut dz = differentiate(&f, "q").unwrap();
    TestResult::from_bool(dz.eval(&[x]) == 0.0)
}

#[test]
fn absent_variable_derivative_is_zero_everywhere() {
    QuickCheck::new()
        .tests(100)
        .quickcheck(prop_absent_variable_derivative_is_zero as fn(f64) -> TestResult);
}
