//! The shared validate-or-fail capability.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError, Violations};

/// How many violations a pass reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Stop at the first violated rule.
    #[default]
    FailFast,
    /// Run every rule and report all violations in rule order.
    CollectAll,
}

/// Receives violations from validators and decides whether to keep going.
#[derive(Debug)]
pub struct Sink {
    mode: Mode,
    violations: Violations,
}

impl Sink {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            violations: Violations::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Record a violation. Breaks in fail-fast mode.
    pub fn report(&mut self, error: ValidationError) -> ControlFlow<()> {
        log::trace!("{} violation: {}", error.kind().label(), error);
        self.violations.push(error);
        match self.mode {
            Mode::FailFast => ControlFlow::Break(()),
            Mode::CollectAll => ControlFlow::Continue(()),
        }
    }

    /// Number of violations recorded so far.
    pub fn count(&self) -> usize {
        self.violations.len()
    }

    pub fn into_violations(self) -> Violations {
        self.violations
    }

    /// First violation as a fail-fast result.
    pub fn into_first(self) -> Result<()> {
        match self.violations.into_vec().into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// A rule object over values of type `T`.
///
/// Implementors only write [`check`](Validator::check), visiting their rules
/// in a fixed order and handing each violation to the sink with `?`.
/// Composites call their children's `check` with the same sink.
pub trait Validator<T: ?Sized> {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Run all rules against `value`.
    fn check(&self, value: &T, sink: &mut Sink) -> ControlFlow<()>;

    /// Fail on the first violated rule.
    fn validate(&self, value: &T) -> Result<()> {
        let mut sink = Sink::new(Mode::FailFast);
        let _ = self.check(value, &mut sink);
        sink.into_first()
    }

    /// Report every violated rule.
    fn validate_all(&self, value: &T) -> std::result::Result<(), Violations> {
        self.validate_with(value, Mode::CollectAll)
    }

    /// Validate in the given mode.
    fn validate_with(&self, value: &T, mode: Mode) -> std::result::Result<(), Violations> {
        let mut sink = Sink::new(mode);
        let _ = self.check(value, &mut sink);
        sink.into_violations().into_result()
    }
}

/// Relative and absolute tolerance for float comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub rel: f64,
    pub abs: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rel: 1e-5,
            abs: 1e-8,
        }
    }
}

impl Tolerance {
    /// `|a - b| <= abs + rel * |b|`. NaN is never close to anything.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        (a - b).abs() <= self.abs + self.rel * b.abs()
    }
}
