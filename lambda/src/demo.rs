use lambda::{
    alpha_convert, church, eta_convert, is_normal_form, normalize,
    reduction_steps, substitute, Term,
};

use crate::session::{show_vars, Limits};

fn v(x: &str) -> Term {
    Term::var(x)
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
    println!();
}

fn stepwise(limits: &Limits, title: &str, term: Term) {
    println!("=== {title} ===");
    println!("Term: {term}");
    for (i, step) in reduction_steps(&term, limits.max_steps).enumerate().skip(1) {
        println!("Step {i}: {step}");
    }
    println!();
}

fn reduced(limits: &Limits, label: &str, term: Term) {
    let result = normalize(&term, limits.max_steps);
    println!("{label}: {term}");
    println!("Reduced: {} ({} steps, {})", result.term, result.steps, result.halt);
    println!();
}

fn conversions() {
    println!("=== Alpha Conversion ===");
    let term = Term::abs("x", Term::app(v("x"), v("y")));
    println!("Original: {term}");
    println!("Free variables: {}", show_vars(&term.free_variables()));
    match alpha_convert(&term, "z") {
        Ok(converted) => {
            println!("After α-conversion (x → z): {converted}");
            println!("Free variables: {}", show_vars(&converted.free_variables()));
        }
        Err(e) => println!("Error: {e}"),
    }
    if let Err(e) = alpha_convert(&term, "y") {
        println!("After α-conversion (x → y): {e}");
    }
    println!();

    println!("=== Eta Conversion ===");
    let term = Term::abs("x", Term::app(v("f"), v("x")));
    println!("Original: {term}");
    if let Some(converted) = eta_convert(&term) {
        println!("After η-conversion: {converted}");
    }
    let term = Term::abs("x", Term::app(v("x"), v("x")));
    println!("Counter-example: {term}");
    if eta_convert(&term).is_none() {
        println!("η-conversion is not applicable");
    }
    println!();
}

fn substitution() {
    println!("=== Substitution with Capture Avoidance ===");
    let term = Term::app(v("x"), v("y"));
    println!("Original: {term}");
    println!(
        "After substituting x with z: {}",
        substitute(&term, "x", &v("z"))
    );
    println!();

    let term = Term::abs("y", Term::app(v("x"), v("y")));
    println!("Original: {term}");
    println!("Free variables: {}", show_vars(&term.free_variables()));
    let substituted = substitute(&term, "x", &v("y"));
    println!("After substituting x with y (avoids capture): {substituted}");
    println!("Free variables: {}", show_vars(&substituted.free_variables()));
    println!();
}

fn numerals(limits: &Limits) {
    println!("=== Church Numerals ===");
    for n in 0..4 {
        println!("Church {n}: {}", church::numeral(n));
    }
    println!();

    println!("=== Church Arithmetic ===");
    println!("Successor: {}", church::succ());
    reduced(
        limits,
        "Successor of 2",
        Term::app(church::succ(), church::numeral(2)),
    );
    println!("Addition: {}", church::add());
    reduced(
        limits,
        "1 + 2",
        Term::apply_all(church::add(), [church::numeral(1), church::numeral(2)]),
    );
    println!("Multiplication: {}", church::mult());
    reduced(
        limits,
        "2 * 3",
        Term::apply_all(church::mult(), [church::numeral(2), church::numeral(3)]),
    );
}

fn booleans(limits: &Limits) {
    println!("=== Church Booleans ===");
    println!("True: {}", church::tru());
    println!("False: {}", church::fls());
    println!();

    println!("=== Boolean Operations ===");
    println!("NOT: {}", church::not());
    reduced(limits, "NOT True", Term::app(church::not(), church::tru()));
    println!("AND: {}", church::and());
    reduced(
        limits,
        "True AND False",
        Term::apply_all(church::and(), [church::tru(), church::fls()]),
    );
    println!("OR: {}", church::or());
    reduced(
        limits,
        "True OR False",
        Term::apply_all(church::or(), [church::tru(), church::fls()]),
    );
}

fn omega() {
    println!("=== Omega Combinator (Non-terminating) ===");
    let omega = church::omega();
    println!("Omega: {omega}");
    println!("Is in normal form: {}", is_normal_form(&omega));
    println!("Number of redexes: {}", omega.count_redexes());
    println!("First 3 reduction steps:");
    for (i, step) in reduction_steps(&omega, 3).enumerate() {
        println!("  Step {i}: {step}");
    }
    println!("  (continues infinitely...)");
    println!();
}

fn y_combinator() {
    println!("=== Y Combinator ===");
    let y = church::y_combinator();
    println!("Y combinator: {y}");
    println!("Term size: {}", y.size());
    println!("Property: Y f = f (Y f)");
    for (i, step) in reduction_steps(&Term::app(y, v("f")), 2).enumerate() {
        println!("  Step {i}: {step}");
    }
    println!();
}

fn analyze(limits: &Limits, name: &str, term: Term) {
    println!("=== Analysis of {name} ===");
    println!("Term: {term}");
    println!("Size: {}", term.size());
    println!("Depth: {}", term.depth());
    println!("Free variables: {}", show_vars(&term.free_variables()));
    println!("Number of redexes: {}", term.count_redexes());
    println!("Is in normal form: {}", is_normal_form(&term));
    if !is_normal_form(&term) {
        println!();
        println!("Reduction sequence:");
        let steps = reduction_steps(&term, limits.trace_steps).collect::<Vec<_>>();
        for (i, step) in steps.iter().take(5).enumerate() {
            println!("  Step {i}: {step}");
        }
        if steps.len() > 5 {
            println!("  ... ({} terms in total)", steps.len());
        }
    }
    println!();
}

pub fn run(limits: Limits) {
    banner("LAMBDA CALCULUS EXAMPLES");
    stepwise(
        &limits,
        "Identity Function",
        Term::app(church::identity(), v("a")),
    );
    stepwise(
        &limits,
        "Constant Function",
        Term::apply_all(church::constant(), [v("a"), v("b")]),
    );
    conversions();
    substitution();
    numerals(&limits);
    booleans(&limits);
    omega();
    y_combinator();

    banner("ANALYTICAL OPERATIONS");
    analyze(&limits, "Church numeral 3", church::numeral(3));
    analyze(
        &limits,
        "Successor of 2",
        Term::app(church::succ(), church::numeral(2)),
    );
    analyze(
        &limits,
        "1 + 2",
        Term::apply_all(church::add(), [church::numeral(1), church::numeral(2)]),
    );
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_run_finishes() {
        run(Limits::default());
        run(Limits {
            max_steps: 0,
            trace_steps: 0,
        });
    }

    #[test]
    fn test_stepwise_is_bounded() {
        stepwise(&Limits::default(), "Omega", church::omega());
    }
}
