//! Church encodings built from the plain term constructors.

use crate::term::Term;

fn var(x: &str) -> Term {
    Term::var(x)
}
fn lam(params: &[&str], body: Term) -> Term {
    params
        .iter()
        .rev()
        .fold(body, |body, &param| Term::abs(param, body))
}
fn apps(head: Term, args: impl IntoIterator<Item = Term>) -> Term {
    Term::apply_all(head, args)
}

/// `λf.λx. f (f (... (f x)))` with `n` applications of `f`.
pub fn numeral(n: u64) -> Term {
    let body = (0..n).fold(var("x"), |body, _| Term::app(var("f"), body));
    lam(&["f", "x"], body)
}

/// `λt.λf. t`
pub fn tru() -> Term {
    lam(&["t", "f"], var("t"))
}

/// `λt.λf. f`
pub fn fls() -> Term {
    lam(&["t", "f"], var("f"))
}

/// `λp.λq. p q p`
pub fn and() -> Term {
    lam(&["p", "q"], apps(var("p"), [var("q"), var("p")]))
}

/// `λp.λq. p p q`
pub fn or() -> Term {
    lam(&["p", "q"], apps(var("p"), [var("p"), var("q")]))
}

/// `λp.λt.λf. p f t`
pub fn not() -> Term {
    lam(&["p", "t", "f"], apps(var("p"), [var("f"), var("t")]))
}

/// `λn.λf.λx. f (n f x)`
pub fn succ() -> Term {
    lam(
        &["n", "f", "x"],
        Term::app(var("f"), apps(var("n"), [var("f"), var("x")])),
    )
}

/// `λm.λn.λf.λx. m f (n f x)`
pub fn add() -> Term {
    lam(
        &["m", "n", "f", "x"],
        apps(var("m"), [var("f"), apps(var("n"), [var("f"), var("x")])]),
    )
}

/// `λm.λn.λf. m (n f)`
pub fn mult() -> Term {
    lam(
        &["m", "n", "f"],
        Term::app(var("m"), Term::app(var("n"), var("f"))),
    )
}

/// `λa.λb.λs. s a b`
pub fn pair() -> Term {
    lam(&["a", "b", "s"], apps(var("s"), [var("a"), var("b")]))
}

/// `λp. p (λa.λb. a)`
pub fn first() -> Term {
    lam(&["p"], Term::app(var("p"), lam(&["a", "b"], var("a"))))
}

/// `λp. p (λa.λb. b)`
pub fn second() -> Term {
    lam(&["p"], Term::app(var("p"), lam(&["a", "b"], var("b"))))
}

/// `λf. (λx. f (x x)) (λx. f (x x))`
pub fn y_combinator() -> Term {
    let inner = lam(&["x"], Term::app(var("f"), Term::app(var("x"), var("x"))));
    lam(&["f"], Term::app(inner.clone(), inner))
}

/// `λx. x`
pub fn identity() -> Term {
    lam(&["x"], var("x"))
}

/// `λx.λy. x`
pub fn constant() -> Term {
    lam(&["x", "y"], var("x"))
}

/// `(λx. x x) (λx. x x)`, which has no normal form.
pub fn omega() -> Term {
    let w = lam(&["x"], Term::app(var("x"), var("x")));
    Term::app(w.clone(), w)
}

/// Reads back a numeral in normal form, whatever its binders are called.
pub fn decode_numeral(term: &Term) -> Option<u64> {
    let (f, x, mut body) = match term {
        Term::Abs(f, body) => match body.as_ref() {
            Term::Abs(x, body) if x != f => (f, x, body.as_ref()),
            Term::Abs(_, _) | Term::Var(_) | Term::App(_, _) => return None,
        },
        Term::Var(_) | Term::App(_, _) => return None,
    };
    let mut n = 0;
    loop {
        match body {
            Term::Var(y) if y == x => return Some(n),
            Term::App(func, arg) if matches!(func.as_ref(), Term::Var(g) if g == f) => {
                n += 1;
                body = arg.as_ref();
            }
            Term::Var(_) | Term::Abs(_, _) | Term::App(_, _) => return None,
        }
    }
}

/// Reads back `λa.λb. a` as `true` and `λa.λb. b` as `false`.
pub fn decode_bool(term: &Term) -> Option<bool> {
    match term {
        Term::Abs(a, body) => match body.as_ref() {
            Term::Abs(b, body) if a != b => match body.as_ref() {
                Term::Var(v) if v == a => Some(true),
                Term::Var(v) if v == b => Some(false),
                Term::Var(_) | Term::Abs(_, _) | Term::App(_, _) => None,
            },
            Term::Abs(_, _) | Term::Var(_) | Term::App(_, _) => None,
        },
        Term::Var(_) | Term::App(_, _) => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        reduce::{normalize, reduction_steps, Halt},
        term::test::alpha_eq,
    };

    fn eval(head: Term, args: impl IntoIterator<Item = Term>) -> Term {
        let result = normalize(&Term::apply_all(head, args), 100);
        assert_eq!(result.halt, Halt::NormalForm);
        result.term
    }

    #[test]
    fn test_numerals() {
        assert_eq!(numeral(0).to_string(), "λf.λx.x");
        assert_eq!(numeral(1).to_string(), "λf.λx.f x");
        assert_eq!(numeral(3).to_string(), "λf.λx.f (f (f x))");
        for n in 0..10 {
            assert_eq!(decode_numeral(&numeral(n)), Some(n));
        }
        assert_eq!(decode_numeral(&tru()), None);
        assert_eq!(decode_numeral(&identity()), None);
    }

    #[test]
    fn test_arithmetic() {
        let three = eval(add(), [numeral(1), numeral(2)]);
        assert!(alpha_eq(&three, &numeral(3)));
        assert_eq!(decode_numeral(&three), Some(3));

        assert_eq!(decode_numeral(&eval(succ(), [numeral(2)])), Some(3));
        assert_eq!(decode_numeral(&eval(succ(), [numeral(0)])), Some(1));
        let six = eval(mult(), [numeral(2), numeral(3)]);
        assert!(alpha_eq(&six, &numeral(6)));
        assert_eq!(decode_numeral(&eval(mult(), [numeral(0), numeral(3)])), Some(0));
        assert_eq!(
            decode_numeral(&eval(add(), [eval(mult(), [numeral(3), numeral(3)]), numeral(1)])),
            Some(10)
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(tru().to_string(), "λt.λf.t");
        assert_eq!(fls().to_string(), "λt.λf.f");
        assert!(alpha_eq(&eval(and(), [tru(), fls()]), &fls()));
        for (p, q) in [(false, false), (false, true), (true, false), (true, true)] {
            let encode = |b| if b { tru() } else { fls() };
            assert_eq!(decode_bool(&eval(and(), [encode(p), encode(q)])), Some(p && q));
            assert_eq!(decode_bool(&eval(or(), [encode(p), encode(q)])), Some(p || q));
        }
        assert_eq!(decode_bool(&eval(not(), [tru()])), Some(false));
        assert_eq!(decode_bool(&eval(not(), [fls()])), Some(true));
        assert_eq!(decode_bool(&numeral(2)), None);
    }

    #[test]
    fn test_pairs() {
        let p = Term::apply_all(pair(), [numeral(1), numeral(2)]);
        assert_eq!(decode_numeral(&eval(first(), [p.clone()])), Some(1));
        assert_eq!(decode_numeral(&eval(second(), [p])), Some(2));
    }

    #[test]
    fn test_y_combinator() {
        let y = y_combinator();
        assert!(y.is_closed());
        assert_eq!(y.count_redexes(), 1);
        // Y g unfolds forever.
        let unfolding = Term::app(y, Term::var("g"));
        let result = normalize(&unfolding, 20);
        assert_eq!(result.halt, Halt::StepBoundExhausted);
        assert_eq!(reduction_steps(&unfolding, 4).count(), 5);
        // Y (λr. c0) ignores the recursion entirely.
        let constant_zero = Term::abs("r", numeral(0));
        let result = eval(y_combinator(), [constant_zero]);
        assert_eq!(decode_numeral(&result), Some(0));
    }

    #[test]
    fn test_deep_numerals() {
        let big = numeral(200_000);
        assert_eq!(decode_numeral(&big), Some(200_000));
        drop(big);

        let result = normalize(&Term::app(succ(), numeral(20_000)), 10);
        assert_eq!(result.halt, Halt::NormalForm);
        assert_eq!(result.steps, 3);
        assert_eq!(decode_numeral(&result.term), Some(20_001));
        assert!(result.term == numeral(20_001));
        assert!(result.term.to_string().ends_with("x))"));
    }

    #[test]
    fn test_omega() {
        assert_eq!(omega().count_redexes(), 1);
        assert_eq!(normalize(&omega(), 50).halt, Halt::StepBoundExhausted);
        assert_eq!(
            eval(constant(), [identity(), omega()]),
            identity()
        );
    }
}
