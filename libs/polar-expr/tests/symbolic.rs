use approx::assert_relative_eq;
use polar_expr::{compile, simplify, Bindings, Expr};
use std::f64::consts::{FRAC_PI_2, PI};

#[test]
fn cosine_derivative_round_trip() {
    let f = compile("cos(theta)").unwrap();
    let df = simplify(&f.derivative("theta").unwrap());
    let at_zero = Bindings::new().with("theta", 0.0);
    let at_quarter = Bindings::new().with("theta", FRAC_PI_2);
    assert_eq!(df.eval(&at_zero).unwrap(), 0.0);
    assert_relative_eq!(df.eval(&at_quarter).unwrap(), -1.0);
}

#[test]
fn simplify_is_idempotent() {
    for src in [
        "1 + cos(5*theta)",
        "theta ** 2 * sin(theta) / (1 + theta)",
        "abs(sin(3*theta)) ** 0.5",
        "2 ** theta - theta ** 2",
    ] {
        let f = compile(src).unwrap();
        let df = f.derivative("theta").unwrap();
        let once = simplify(&df);
        let twice = simplify(&once);
        assert_eq!(once, twice, "{src}");
        for theta in [0.1, 1.0, 2.5] {
            let env = Bindings::new().with("theta", theta);
            assert_eq!(once.eval(&env).unwrap(), twice.eval(&env).unwrap());
        }
    }
}

#[test]
fn simplified_derivative_matches_unsimplified() {
    let f = compile("1 + 0.3 * cos(5*theta) * sin(theta)").unwrap();
    let raw = f.derivative("theta").unwrap();
    let small = raw.simplify();
    for theta in [0.0, 0.7, PI, 5.0] {
        let env = Bindings::new().with("theta", theta);
        assert_relative_eq!(
            small.eval(&env).unwrap(),
            raw.eval(&env).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn derivative_of_constant_formula_is_zero() {
    let f = compile("M_PI * 2").unwrap();
    assert_eq!(f.derivative("theta").unwrap(), Expr::num(0.0));
}

#[test]
fn printed_formula_compiles_to_same_tree() {
    let f = compile("pow(theta, 2) + 1").unwrap();
    assert_eq!(f.to_string(), "pow(theta, 2) + 1");
    assert_eq!(compile(&f.to_string()).unwrap(), f);
}
