use std::{path::PathBuf, rc::Rc};

use lambda::{
    alpha_convert, beta_reduce_step, church, eta_convert, is_normal_form, normalize,
    reduction_steps, EngineError, Halt, Identifier, Term, VarSet,
};
use rpds::HashTrieMap;
use thiserror::Error;
use util::repl::{self, Flow};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{0}` is not defined")]
    Undefined(String),
    #[error("Expected one or more definition names")]
    EmptyExpression,
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Unknown command `:{0}`. Type :help for help.")]
    UnknownCommand(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
pub type Result<T> = std::result::Result<T, CommandError>;

#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Bound for `:norm` and bare expressions.
    pub max_steps: usize,
    /// Bound for `:steps`.
    pub trace_steps: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: 100,
            trace_steps: 10,
        }
    }
}

pub enum Outcome {
    Print(String),
    Quit,
}

type Definitions = HashTrieMap<Identifier, Rc<Term>>;

fn builtins() -> Definitions {
    let mut definitions = Definitions::new();
    let named = [
        ("id", church::identity()),
        ("const", church::constant()),
        ("omega", church::omega()),
        ("true", church::tru()),
        ("false", church::fls()),
        ("and", church::and()),
        ("or", church::or()),
        ("not", church::not()),
        ("succ", church::succ()),
        ("add", church::add()),
        ("mult", church::mult()),
        ("pair", church::pair()),
        ("fst", church::first()),
        ("snd", church::second()),
        ("Y", church::y_combinator()),
    ];
    for (name, term) in named {
        definitions = definitions.insert(name.into(), term.into());
    }
    for n in 0..10 {
        definitions = definitions.insert(format!("c{n}").into(), church::numeral(n).into());
    }
    definitions
}

pub fn show_vars(vars: &VarSet) -> String {
    if vars.is_empty() {
        "none".to_string()
    } else {
        let names = vars.iter().map(|name| &**name).collect::<Vec<&str>>();
        format!("{{{}}}", names.join(", "))
    }
}

pub struct Session {
    definitions: Definitions,
    limits: Limits,
    history: Option<PathBuf>,
}

impl Session {
    pub fn new(limits: Limits, history: Option<PathBuf>) -> Self {
        Self {
            definitions: builtins(),
            limits,
            history,
        }
    }

    /// An expression is one or more definition names, applied left to right.
    fn resolve(&self, expr: &str) -> Result<Term> {
        let mut terms = expr.split_whitespace().map(|name| {
            self.definitions
                .get(name)
                .map(|term| term.as_ref().clone())
                .ok_or_else(|| CommandError::Undefined(name.to_string()))
        });
        let head = terms.next().ok_or(CommandError::EmptyExpression)??;
        Ok(Term::apply_all(head, terms.collect::<Result<Vec<_>>>()?))
    }

    fn show(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        Ok(format!("{} = {term}", expr.trim()))
    }

    fn list(&self) -> String {
        let mut definitions = self.definitions.iter().collect::<Vec<_>>();
        definitions.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        definitions
            .into_iter()
            .map(|(name, term)| {
                let rendered = term.to_string().chars().take(60).collect::<String>();
                format!("  {name:10} = {rendered}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn reduce(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        Ok(match beta_reduce_step(&term) {
            Some(reduced) => format!("Original: {term}\nReduced:  {reduced}"),
            None => format!("Term is already in normal form: {term}"),
        })
    }

    fn normalize(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        let result = normalize(&term, self.limits.max_steps);
        let mut lines = vec![
            format!("Original: {term}"),
            format!("Normal:   {}", result.term),
            format!("Steps:    {} ({})", result.steps, result.halt),
        ];
        if result.halt == Halt::NormalForm {
            if let Some(n) = church::decode_numeral(&result.term) {
                lines.push(format!("Numeral:  {n}"));
            }
            if let Some(b) = church::decode_bool(&result.term) {
                lines.push(format!("Boolean:  {b}"));
            }
        }
        Ok(lines.join("\n"))
    }

    fn analyze(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        Ok([
            format!("Term:        {term}"),
            format!("Size:        {}", term.size()),
            format!("Depth:       {}", term.depth()),
            format!("Free vars:   {}", show_vars(&term.free_variables())),
            format!("Bound vars:  {}", show_vars(&term.bound_variables())),
            format!("Redexes:     {}", term.count_redexes()),
            format!("Normal form: {}", is_normal_form(&term)),
        ]
        .join("\n"))
    }

    fn steps(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        let limit = self.limits.trace_steps;
        let steps = reduction_steps(&term, limit).collect::<Vec<_>>();
        let mut lines = steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("  Step {i}: {step}"))
            .collect::<Vec<_>>();
        if steps.last().map_or(false, |last| !is_normal_form(last)) {
            lines.push(format!("  ... (limited to {limit} steps)"));
        }
        Ok(lines.join("\n"))
    }

    fn eta(&self, expr: &str) -> Result<String> {
        let term = self.resolve(expr)?;
        Ok(match eta_convert(&term) {
            Some(converted) => format!("Original: {term}\nEta:      {converted}"),
            None => format!("No eta-redex at the root of {term}"),
        })
    }

    fn alpha(&self, args: &str) -> Result<String> {
        const USAGE: &str = ":alpha <new-name> <expr>";
        let (name, expr) = args
            .trim()
            .split_once(char::is_whitespace)
            .ok_or(CommandError::Usage(USAGE))?;
        let term = self.resolve(expr)?;
        let converted = alpha_convert(&term, name)?;
        Ok(format!("Original: {term}\nAlpha:    {converted}"))
    }

    fn define(&mut self, args: &str) -> Result<String> {
        const USAGE: &str = ":let <name> = <expr>";
        let (name, expr) = args.split_once('=').ok_or(CommandError::Usage(USAGE))?;
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(CommandError::Usage(USAGE));
        }
        let term = self.resolve(expr)?;
        let shown = format!("{name} = {term}");
        self.definitions = self.definitions.insert(name.into(), term.into());
        Ok(shown)
    }

    fn help() -> String {
        r#"
expr                -- same as :norm expr
:show     expr      -- show the term
:list               -- list all definitions
:reduce   expr      -- one normal-order reduction step
:norm     expr      -- reduce to normal form (bounded)
:analyze  expr      -- size, depth, variables and redexes
:steps    expr      -- show the reduction sequence (bounded)
:eta      expr      -- eta-convert at the root
:alpha    new expr  -- rename the outermost binder to `new`
:let name = expr    -- add a definition
:help               -- show this message
:quit               -- leave

An expression is a sequence of definition names applied left to right,
e.g. `add c1 c2`. Built-in definitions: id, const, omega, c0 .. c9, true,
false, and, or, not, succ, add, mult, pair, fst, snd, Y.
        "#
        .trim()
        .to_string()
    }

    pub fn execute(&mut self, input: &str) -> Result<Outcome> {
        let input = input.trim();
        let (cmd, args) = if let Some(stripped) = input.strip_prefix(':') {
            let stripped = stripped.trim_start();
            stripped
                .split_once(char::is_whitespace)
                .unwrap_or((stripped, ""))
        } else {
            ("", input)
        };
        let output = match cmd {
            "" | "n" | "norm" | "normalize" => self.normalize(args)?,
            "s" | "show" => self.show(args)?,
            "l" | "list" => self.list(),
            "r" | "reduce" => self.reduce(args)?,
            "a" | "analyze" => self.analyze(args)?,
            "st" | "steps" => self.steps(args)?,
            "eta" => self.eta(args)?,
            "alpha" => self.alpha(args)?,
            "let" => self.define(args)?,
            "h" | "help" => Self::help(),
            "q" | "quit" => return Ok(Outcome::Quit),
            _ => return Err(CommandError::UnknownCommand(cmd.to_string())),
        };
        Ok(Outcome::Print(output))
    }
}

impl repl::Repl for Session {
    type Error = anyhow::Error;
    const PROMPT: &'static str = "λ> ";
    fn history(&self) -> Option<PathBuf> {
        self.history.clone()
    }
    fn evaluate(&mut self, input: &str) -> anyhow::Result<Flow> {
        match self.execute(input) {
            Ok(Outcome::Print(output)) => println!("{output}"),
            Ok(Outcome::Quit) => {
                println!("Goodbye!");
                return Ok(Flow::Quit);
            }
            Err(e) => eprintln!("Error: {e}"),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(session: &mut Session, input: &str) -> String {
        match session.execute(input) {
            Ok(Outcome::Print(output)) => output,
            Ok(Outcome::Quit) => panic!("unexpected quit"),
            Err(e) => panic!("{input}: {e}"),
        }
    }

    fn session() -> Session {
        Session::new(Limits::default(), None)
    }

    #[test]
    fn test_show_and_list() {
        let mut session = session();
        assert_eq!(run(&mut session, ":show id"), "id = λx.x");
        assert_eq!(run(&mut session, ":show  c2"), "c2 = λf.λx.f (f x)");
        let listing = run(&mut session, ":list");
        assert!(listing.contains("  c0         = λf.λx.x"));
        assert!(listing.contains("  Y          = "));
    }

    #[test]
    fn test_norm() {
        let mut session = session();
        let output = run(&mut session, ":norm add c1 c2");
        assert!(output.contains("Normal:   λf.λx.f (f (f x))"));
        assert!(output.contains("(normal form)"));
        assert!(output.contains("Numeral:  3"));
        // A bare expression is normalized too.
        assert!(run(&mut session, "and true false").contains("Boolean:  false"));
        let output = run(&mut session, ":norm omega");
        assert!(output.contains("Steps:    100 (step bound exhausted)"));
        assert!(!output.contains("Numeral"));
    }

    #[test]
    fn test_reduce_and_steps() {
        let mut session = session();
        assert_eq!(
            run(&mut session, ":reduce id c0"),
            "Original: (λx.x) (λf.λx.x)\nReduced:  λf.λx.x"
        );
        assert_eq!(
            run(&mut session, ":reduce c0"),
            "Term is already in normal form: λf.λx.x"
        );
        let output = run(&mut session, ":steps omega");
        assert_eq!(output.lines().count(), 12);
        assert!(output.ends_with("... (limited to 10 steps)"));
        let output = run(&mut session, ":steps id c1");
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_analyze() {
        let mut session = session();
        let output = run(&mut session, ":analyze id c1");
        assert!(output.contains("Size:        8"));
        assert!(output.contains("Free vars:   none"));
        assert!(output.contains("Bound vars:  {f, x}"));
        assert!(output.contains("Redexes:     1"));
        assert!(output.contains("Normal form: false"));
    }

    #[test]
    fn test_let_extends_definitions() {
        let mut session = session();
        assert_eq!(
            run(&mut session, ":let three = succ c2"),
            "three = (λn.λf.λx.f (n f x)) (λf.λx.f (f x))"
        );
        assert!(run(&mut session, ":norm mult three c2").contains("Numeral:  6"));
        assert!(matches!(
            session.execute(":let = c1"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_eta_and_alpha() {
        let mut session = session();
        assert!(run(&mut session, ":eta id").starts_with("No eta-redex"));
        assert_eq!(
            run(&mut session, ":alpha y const"),
            "Original: λx.λy.x\nAlpha:    λy.λy_1.y"
        );
        assert!(matches!(
            session.execute(":alpha y id c1"),
            Err(CommandError::Engine(EngineError::NotAnAbstraction(_)))
        ));
        assert!(matches!(
            session.execute(":alpha y"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_errors() {
        let mut session = session();
        assert!(matches!(
            session.execute(":norm add nope"),
            Err(CommandError::Undefined(name)) if name == "nope"
        ));
        assert!(matches!(
            session.execute(":norm"),
            Err(CommandError::EmptyExpression)
        ));
        assert!(matches!(
            session.execute(":frobnicate c1"),
            Err(CommandError::UnknownCommand(cmd)) if cmd == "frobnicate"
        ));
        assert!(matches!(session.execute(":quit"), Ok(Outcome::Quit)));
        assert!(matches!(session.execute(": quit"), Ok(Outcome::Quit)));
        assert!(run(&mut session, ": list").contains("  c0         = λf.λx.x"));
        assert_eq!(run(&mut session, ":  show id"), "id = λx.x");
    }
}
