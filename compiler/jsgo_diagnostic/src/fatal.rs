//! Fatal internal errors.
//!
//! A [`FatalError`] means an invariant was broken: the compiler (or the
//! runtime value bridge) reached a state a well-typed program cannot produce.
//! It aborts the current unit or call chain; callers add clues on the way up
//! with [`ResultExt::clue`] and never retry.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::{self, Write as _};

type Cause = Box<dyn Error + Send + Sync + 'static>;

/// An unrecoverable invariant violation.
pub struct FatalError {
    cause: Cause,
    stack: Backtrace,
    clues: String,
}

impl FatalError {
    /// Wrap a cause, capturing the current stack.
    ///
    /// The stack is only resolved when `RUST_BACKTRACE` asks for it.
    pub fn new(cause: impl Into<Cause>) -> Self {
        let cause = cause.into();
        tracing::debug!(%cause, "fatal error raised");
        FatalError {
            cause,
            stack: Backtrace::capture(),
            clues: String::new(),
        }
    }

    /// Append a line of debugging context.
    pub fn add_clue(&mut self, clue: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.clues, "{clue}");
    }

    #[must_use]
    pub fn with_clue(mut self, clue: impl fmt::Display) -> Self {
        self.add_clue(format_args!("{clue}"));
        self
    }

    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    /// Downcast the cause to a concrete error type.
    pub fn cause_as<E: Error + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }

    pub fn clues(&self) -> &str {
        &self.clues
    }

    pub fn stack(&self) -> &Backtrace {
        &self.stack
    }
}

/// Turn a cause into a fatal error at the point where it is detected.
pub fn bailout(cause: impl Into<Cause>) -> FatalError {
    FatalError::new(cause)
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[compiler panic] {}", self.cause)?;
        if !self.clues.is_empty() {
            write!(f, "\n\n{}", self.clues.trim_end())?;
        }
        if self.stack.status() == BacktraceStatus::Captured {
            f.write_str("\n\nOriginal stack trace:")?;
            for line in self.stack.to_string().lines() {
                write!(f, "\n  {line}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FatalError")
            .field("cause", &self.cause)
            .field("clues", &self.clues)
            .finish_non_exhaustive()
    }
}

impl Error for FatalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

/// Add context to a fatal error as it propagates.
pub trait ResultExt<T> {
    #[must_use]
    fn clue<D: fmt::Display>(self, clue: impl FnOnce() -> D) -> Self;
}

impl<T> ResultExt<T> for Result<T, FatalError> {
    fn clue<D: fmt::Display>(self, clue: impl FnOnce() -> D) -> Self {
        self.map_err(|mut err| {
            err.add_clue(format_args!("{}", clue()));
            err
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
