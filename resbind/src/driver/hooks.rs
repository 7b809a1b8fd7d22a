//! Optional callbacks around a generation run.

use std::fmt;

use super::{GenerationReport, SourceSetInfo};
use crate::error::GenerateError;

/// Callback run after cleaning, before any metadata is resolved.
pub type BeforeHook = Box<dyn Fn(&SourceSetInfo) -> Result<(), String>>;
/// Callback run once the run's outputs have been written.
pub type AfterHook = Box<dyn Fn(&GenerationReport) -> Result<(), String>>;

/// Pre- and post-generation hooks. Both default to no-ops.
#[derive(Default)]
pub struct Hooks {
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

impl Hooks {
    /// Hooks that do nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the pre-generation hook.
    #[must_use]
    pub fn before(mut self, hook: impl Fn(&SourceSetInfo) -> Result<(), String> + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    /// Sets the post-generation hook.
    #[must_use]
    pub fn after(
        mut self,
        hook: impl Fn(&GenerationReport) -> Result<(), String> + 'static,
    ) -> Self {
        self.after = Some(Box::new(hook));
        self
    }

    pub(crate) fn run_before(&self, source_set: &SourceSetInfo) -> Result<(), GenerateError> {
        self.before
            .as_ref()
            .map_or(Ok(()), |hook| hook(source_set).map_err(GenerateError::Hook))
    }

    pub(crate) fn run_after(&self, report: &GenerationReport) -> Result<(), GenerateError> {
        self.after
            .as_ref()
            .map_or(Ok(()), |hook| hook(report).map_err(GenerateError::Hook))
    }
}
