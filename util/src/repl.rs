use std::path::PathBuf;

use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

/// Whether the session goes on after an input has been handled.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const PROMPT: &'static str = ">> ";
    const CONTINUATION: &'static str = ".. ";
    fn history(&self) -> Option<PathBuf> {
        None
    }
    fn evaluate(&mut self, input: &str) -> Result<Flow, Self::Error>;
}

/// Reads lines until `Flow::Quit` or end of input. A line ending in `\`
/// continues on the next one. Ctrl-C throws away the pending input only.
pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    let history = repl.history();
    if let Some(history) = &history {
        editor.load_history(history).ok();
    }
    let mut input: Option<String> = None;
    loop {
        let prompt = if input.is_some() {
            R::CONTINUATION
        } else {
            R::PROMPT
        };
        match editor.readline(prompt) {
            Ok(mut line) if line.ends_with('\\') => {
                line.pop();
                line.push('\n');
                if let Some(input) = input.as_mut() {
                    input.push_str(line.as_str());
                } else {
                    input = Some(line);
                }
            }
            Ok(line) => {
                let input = if let Some(mut input) = input.take() {
                    input.push_str(line.as_str());
                    input
                } else {
                    line
                };
                if input.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(input.as_str());
                let flow = repl.evaluate(&input).map_err(Error::EvalError)?;
                if let Some(history) = &history {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
                if flow == Flow::Quit {
                    break Ok(());
                }
            }
            Err(ReadlineError::Interrupted) => {
                input = None;
                println!("Interrupted. Type :quit to exit.");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
