//! Untyped lambda calculus: terms, capture-avoiding substitution and
//! normal-order reduction, plus the usual Church encodings.

pub mod church;
pub mod error;
pub mod reduce;
pub mod term;

pub use error::{EngineError, Result};
pub use reduce::{
    alpha_convert, beta_reduce_step, count_redexes, eta_convert, is_normal_form, normalize,
    reduction_steps, substitute, Halt, Normalization, Trace, DEFAULT_MAX_STEPS,
};
pub use term::{Identifier, Term, VarSet};
