//! Conditional-enablement links between parameters.

use std::fmt;

use crate::graph::id::ParamId;
use crate::types::ParamValue;

/// Predicate over a source parameter's observed value.
pub type EnablePredicate = Box<dyn Fn(&ParamValue) -> bool + Send>;

/// One declared enablement dependency.
///
/// While the predicate over the source's observed value is false, the target
/// is disabled and observes the link's default value. A target governed by
/// several links is enabled only when every predicate holds.
pub struct EnableLink {
    pub(crate) source: ParamId,
    pub(crate) target: ParamId,
    pub(crate) predicate: EnablePredicate,
    pub(crate) default: Option<ParamValue>,
    pub(crate) on_unset: bool,
}

impl EnableLink {
    pub fn new(
        source: ParamId,
        target: ParamId,
        predicate: impl Fn(&ParamValue) -> bool + Send + 'static,
    ) -> Self {
        Self {
            source,
            target,
            predicate: Box::new(predicate),
            default: None,
            on_unset: false,
        }
    }

    /// Value the target observes while this link disables it.
    pub fn with_default(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Predicate result while the source has no observed value yet.
    /// Defaults to false (target disabled until the source is set).
    pub fn with_on_unset(mut self, enabled: bool) -> Self {
        self.on_unset = enabled;
        self
    }

    pub fn source(&self) -> ParamId {
        self.source
    }

    pub fn target(&self) -> ParamId {
        self.target
    }

    pub(crate) fn evaluate(&self, observed: Option<&ParamValue>) -> bool {
        match observed {
            Some(value) => (self.predicate)(value),
            None => self.on_unset,
        }
    }
}

impl fmt::Debug for EnableLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnableLink")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("default", &self.default)
            .field("on_unset", &self.on_unset)
            .finish()
    }
}
