use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    rc::Rc,
};

pub type Identifier = Rc<str>;
pub type VarSet = BTreeSet<Identifier>;
pub type TermRef = Rc<Term>;

/// An untyped lambda term. Children are shared, so cloning a term is cheap
/// and a reduct reuses every subterm the step did not touch.
#[derive(Clone)]
pub enum Term {
    /// `x`
    Var(Identifier),
    /// `λx. t`
    Abs(Identifier, TermRef),
    /// `t t`
    App(TermRef, TermRef),
}

impl Term {
    pub fn var(name: impl Into<Identifier>) -> Self {
        Term::Var(name.into())
    }
    pub fn abs(param: impl Into<Identifier>, body: impl Into<TermRef>) -> Self {
        Term::Abs(param.into(), body.into())
    }
    pub fn app(func: impl Into<TermRef>, arg: impl Into<TermRef>) -> Self {
        Term::App(func.into(), arg.into())
    }

    /// Left-associative application: `apply_all(f, [a, b])` is `(f a) b`.
    pub fn apply_all(head: Term, args: impl IntoIterator<Item = Term>) -> Self {
        args.into_iter().fold(head, Term::app)
    }

    /// `true` when the root itself is `(λx. M) N`.
    pub fn is_redex(&self) -> bool {
        matches!(self, Term::App(func, _) if matches!(func.as_ref(), Term::Abs(_, _)))
    }

    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            size += 1;
            match term {
                Term::Var(_) => {}
                Term::Abs(_, body) => stack.push(body),
                Term::App(func, arg) => {
                    stack.push(func);
                    stack.push(arg);
                }
            }
        }
        size
    }

    /// Longest chain of abstraction/application nodes above a variable.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((term, depth)) = stack.pop() {
            match term {
                Term::Var(_) => deepest = deepest.max(depth),
                Term::Abs(_, body) => stack.push((body.as_ref(), depth + 1)),
                Term::App(func, arg) => {
                    stack.push((func.as_ref(), depth + 1));
                    stack.push((arg.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    pub fn free_variables(&self) -> VarSet {
        enum Task<'t> {
            Visit(&'t Term),
            Unbind(&'t str),
        }
        let mut free = VarSet::new();
        let mut bound = HashMap::<&str, usize>::new();
        let mut stack = vec![Task::Visit(self)];
        while let Some(task) = stack.pop() {
            match task {
                Task::Visit(Term::Var(x)) => {
                    if bound.get(x.as_ref()).map_or(true, |n| *n == 0) {
                        free.insert(x.clone());
                    }
                }
                Task::Visit(Term::Abs(x, body)) => {
                    *bound.entry(x).or_default() += 1;
                    stack.push(Task::Unbind(x));
                    stack.push(Task::Visit(body));
                }
                Task::Visit(Term::App(func, arg)) => {
                    stack.push(Task::Visit(arg));
                    stack.push(Task::Visit(func));
                }
                Task::Unbind(x) => {
                    if let Some(n) = bound.get_mut(x) {
                        *n -= 1;
                    }
                }
            }
        }
        free
    }

    /// Every abstraction parameter in the term, used or not.
    pub fn bound_variables(&self) -> VarSet {
        let mut bound = VarSet::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Var(_) => {}
                Term::Abs(x, body) => {
                    bound.insert(x.clone());
                    stack.push(body);
                }
                Term::App(func, arg) => {
                    stack.push(func);
                    stack.push(arg);
                }
            }
        }
        bound
    }

    pub fn occurs_free(&self, name: &str) -> bool {
        self.free_variables().contains(name)
    }

    /// Number of subterms of the shape `(λx. M) N`, anywhere in the tree.
    pub fn count_redexes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Var(_) => {}
                Term::Abs(_, body) => stack.push(body),
                Term::App(func, arg) => {
                    if term.is_redex() {
                        count += 1;
                    }
                    stack.push(func);
                    stack.push(arg);
                }
            }
        }
        count
    }

    /// Moves uniquely owned compound children into `pending`, leaving a
    /// placeholder variable behind.
    fn unlink(&mut self, hole: &mut Option<Identifier>, pending: &mut Vec<Term>) {
        let children = match self {
            Term::Var(_) => return,
            Term::Abs(_, body) => [Some(body), None],
            Term::App(func, arg) => [Some(func), Some(arg)],
        };
        for child in children.into_iter().flatten() {
            if let Some(inner) = Rc::get_mut(child) {
                if !matches!(inner, Term::Var(_)) {
                    let hole = hole.get_or_insert_with(|| Identifier::from("")).clone();
                    pending.push(std::mem::replace(inner, Term::Var(hole)));
                }
            }
        }
    }
}

// Dropping, comparing and printing all walk the term on the heap: a Church
// numeral is as deep as it is large.
impl Drop for Term {
    fn drop(&mut self) {
        let mut hole = None;
        let mut pending = vec![];
        self.unlink(&mut hole, &mut pending);
        while let Some(mut term) = pending.pop() {
            term.unlink(&mut hole, &mut pending);
        }
    }
}

/// Syntactic equality: same shape, same names. Alpha-equivalent terms with
/// different binder names are not equal.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((lhs, rhs)) = stack.pop() {
            if std::ptr::eq(lhs, rhs) {
                continue;
            }
            match (lhs, rhs) {
                (Term::Var(x), Term::Var(y)) if x == y => {}
                (Term::Abs(x, lbody), Term::Abs(y, rbody)) if x == y => {
                    stack.push((lbody.as_ref(), rbody.as_ref()));
                }
                (Term::App(lf, la), Term::App(rf, ra)) => {
                    stack.push((la.as_ref(), ra.as_ref()));
                    stack.push((lf.as_ref(), rf.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}
impl Eq for Term {}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'t> {
            Show(&'t Term),
            Text(&'static str),
        }
        let mut stack = vec![Piece::Show(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Show(Term::Var(x)) => f.write_str(x)?,
                Piece::Show(Term::Abs(x, body)) => {
                    f.write_fmt(format_args!("λ{x}."))?;
                    stack.push(Piece::Show(body));
                }
                Piece::Show(Term::App(func, arg)) => {
                    if let Term::Var(_) = arg.as_ref() {
                        stack.push(Piece::Show(arg));
                        stack.push(Piece::Text(" "));
                    } else {
                        stack.push(Piece::Text(")"));
                        stack.push(Piece::Show(arg));
                        stack.push(Piece::Text(" ("));
                    }
                    if let Term::Abs(_, _) = func.as_ref() {
                        stack.push(Piece::Text(")"));
                        stack.push(Piece::Show(func));
                        stack.push(Piece::Text("("));
                    } else {
                        stack.push(Piece::Show(func));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("`{self}`"))
    }
}
