//! Capture-avoiding substitution and normal-order reduction.
//!
//! Substitution and the redex search run on an explicit work stack, so their
//! native stack use does not grow with the depth of the term.

use std::rc::Rc;

use rpds::HashTrieMap;

use crate::{
    error::{EngineError, Result},
    term::{Identifier, Term, TermRef, VarSet},
};

/// Step bound used when the caller has no better idea.
pub const DEFAULT_MAX_STEPS: usize = 1000;

#[derive(Clone, Debug)]
struct Replacement {
    value: TermRef,
    free: Rc<VarSet>,
}
impl Replacement {
    fn new(value: Term) -> Self {
        let free = value.free_variables();
        Self {
            value: value.into(),
            free: free.into(),
        }
    }
    fn rename(name: Identifier) -> Self {
        Self {
            value: Term::Var(name.clone()).into(),
            free: Rc::new(VarSet::from([name])),
        }
    }
}

/// Simultaneous substitution in scope at some point of the traversal.
type Env = HashTrieMap<Identifier, Replacement>;

/// `{base}_1`, `{base}_2`, ... whichever comes first outside of everything
/// the new binder could clash with.
fn fresh_name(base: &str, body: &Term, env: &Env) -> Identifier {
    let mut avoid = body.free_variables();
    for (name, replacement) in env.iter() {
        avoid.insert(name.clone());
        avoid.extend(replacement.free.iter().cloned());
    }
    (1..)
        .map(|i| Identifier::from(format!("{base}_{i}")))
        .find(|candidate| !avoid.contains(candidate))
        .expect("Something went wrong: ran out of fresh names")
}

fn substitute_env(term: &Term, env: Env) -> Term {
    enum Task<'t> {
        Visit(&'t Term, Env),
        Abs(Identifier),
        App,
    }
    let mut tasks = vec![Task::Visit(term, env)];
    let mut built: Vec<Term> = vec![];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(Term::Var(x), env) => built.push(match env.get(x) {
                Some(replacement) => Term::clone(&replacement.value),
                None => Term::Var(x.clone()),
            }),
            Task::Visit(Term::Abs(x, body), env) => {
                // The binder shadows any substitution for its own name.
                let env = env.remove(x);
                if env.values().any(|r| r.free.contains(x)) {
                    let fresh = fresh_name(x, body, &env);
                    let env = env.insert(x.clone(), Replacement::rename(fresh.clone()));
                    tasks.push(Task::Abs(fresh));
                    tasks.push(Task::Visit(body.as_ref(), env));
                } else {
                    tasks.push(Task::Abs(x.clone()));
                    tasks.push(Task::Visit(body.as_ref(), env));
                }
            }
            Task::Visit(Term::App(func, arg), env) => {
                tasks.push(Task::App);
                tasks.push(Task::Visit(arg.as_ref(), env.clone()));
                tasks.push(Task::Visit(func.as_ref(), env));
            }
            Task::Abs(x) => {
                let body = built.pop().expect("Something went wrong: missing body");
                built.push(Term::Abs(x, body.into()));
            }
            Task::App => {
                let arg = built.pop().expect("Something went wrong: missing argument");
                let func = built.pop().expect("Something went wrong: missing function");
                built.push(Term::App(func.into(), arg.into()));
            }
        }
    }
    assert_eq!(built.len(), 1);
    built.pop().expect("Something went wrong: nothing was built")
}

/// `term[name := value]`, renaming binders of `term` that would capture a
/// free variable of `value`.
pub fn substitute(term: &Term, name: &str, value: &Term) -> Term {
    let env = Env::new().insert(name.into(), Replacement::new(value.clone()));
    substitute_env(term, env)
}

/// Where the traversal went at each node on the way down to a redex,
/// holding on to the part it did not enter.
enum Frame<'t> {
    Body(&'t Identifier),
    Func(&'t TermRef),
    Arg(&'t TermRef),
}

struct Redex<'t> {
    context: Vec<Frame<'t>>,
    param: &'t Identifier,
    body: &'t Term,
    arg: &'t Term,
}
impl<'t> Redex<'t> {
    /// Leftmost-outermost redex of `term`: pre-order, abstraction bodies are
    /// entered, function position before argument position.
    fn locate(term: &'t Term) -> Option<Self> {
        let mut context = vec![];
        let mut stack = vec![(term, 0, None)];
        while let Some((term, depth, frame)) = stack.pop() {
            context.truncate(depth);
            context.extend(frame);
            let depth = context.len();
            match term {
                Term::Var(_) => {}
                Term::Abs(x, body) => stack.push((body.as_ref(), depth, Some(Frame::Body(x)))),
                Term::App(func, arg) => match func.as_ref() {
                    Term::Abs(param, body) => {
                        return Some(Redex {
                            context,
                            param,
                            body: body.as_ref(),
                            arg: arg.as_ref(),
                        })
                    }
                    Term::Var(_) | Term::App(_, _) => {
                        stack.push((arg.as_ref(), depth, Some(Frame::Arg(func))));
                        stack.push((func.as_ref(), depth, Some(Frame::Func(arg))));
                    }
                },
            }
        }
        None
    }

    fn contract(self) -> Term {
        let mut term = substitute(self.body, self.param, self.arg);
        for frame in self.context.into_iter().rev() {
            term = match frame {
                Frame::Body(x) => Term::Abs(x.clone(), term.into()),
                Frame::Func(arg) => Term::App(term.into(), arg.clone()),
                Frame::Arg(func) => Term::App(func.clone(), term.into()),
            };
        }
        term
    }
}

/// One normal-order beta step. `None` when `term` has no redex.
pub fn beta_reduce_step(term: &Term) -> Option<Term> {
    Redex::locate(term).map(Redex::contract)
}

pub fn is_normal_form(term: &Term) -> bool {
    Redex::locate(term).is_none()
}

pub fn count_redexes(term: &Term) -> usize {
    term.count_redexes()
}

#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
pub enum Halt {
    #[display(fmt = "normal form")]
    NormalForm,
    #[display(fmt = "step bound exhausted")]
    StepBoundExhausted,
}

#[derive(Clone, Debug)]
pub struct Normalization {
    pub term: Term,
    pub steps: usize,
    pub halt: Halt,
}

/// Reduces until no redex is left or `max_steps` steps were taken.
///
/// A term which has no normal form is not an error; it comes back with
/// [`Halt::StepBoundExhausted`] and whatever it had been reduced to. If the
/// bound is reached exactly on a normal form, the halt reason is
/// [`Halt::NormalForm`].
pub fn normalize(term: &Term, max_steps: usize) -> Normalization {
    let mut term = term.clone();
    let mut steps = 0;
    let halt = loop {
        if steps == max_steps {
            break if is_normal_form(&term) {
                Halt::NormalForm
            } else {
                Halt::StepBoundExhausted
            };
        }
        match beta_reduce_step(&term) {
            Some(next) => {
                term = next;
                steps += 1;
            }
            None => break Halt::NormalForm,
        }
    };
    Normalization { term, steps, halt }
}

/// Lazily produced sequence `term, term', term'', ...` of normal-order steps.
#[derive(Clone, Debug)]
pub struct Trace {
    pending: Option<Term>,
    remaining: usize,
}
impl Iterator for Trace {
    type Item = Term;
    fn next(&mut self) -> Option<Term> {
        let current = self.pending.take()?;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.pending = beta_reduce_step(&current);
        }
        Some(current)
    }
}

/// At most `max_steps + 1` terms, starting with `term` itself. The trace ends
/// early when a normal form is reached.
pub fn reduction_steps(term: &Term, max_steps: usize) -> Trace {
    Trace {
        pending: Some(term.clone()),
        remaining: max_steps,
    }
}

/// `λx. M` to `λy. M[x := y]`.
pub fn alpha_convert(term: &Term, new_name: impl Into<Identifier>) -> Result<Term> {
    match term {
        Term::Abs(x, body) => {
            let new_name = new_name.into();
            if new_name != *x && body.occurs_free(&new_name) {
                return Err(EngineError::Capture(new_name));
            }
            let body = substitute(body, x, &Term::Var(new_name.clone()));
            Ok(Term::Abs(new_name, body.into()))
        }
        Term::Var(_) | Term::App(_, _) => Err(EngineError::NotAnAbstraction(term.to_string())),
    }
}

/// `λx. f x` to `f` when `x` is not free in `f`. Only the root is inspected.
pub fn eta_convert(term: &Term) -> Option<Term> {
    match term {
        Term::Abs(x, body) => match body.as_ref() {
            Term::App(func, arg) => match arg.as_ref() {
                Term::Var(y) if y == x && !func.occurs_free(x) => Some(Term::clone(func)),
                Term::Var(_) | Term::Abs(_, _) | Term::App(_, _) => None,
            },
            Term::Var(_) | Term::Abs(_, _) => None,
        },
        Term::Var(_) | Term::App(_, _) => None,
    }
}
