//! Immutable parameter view for worker threads.
//!
//! A snapshot is taken on the interaction thread at dispatch time and moved
//! to the worker; later edits cannot reach it, so a run always computes
//! against one coherent set of values.

use crate::error::{CoreError, Result};
use crate::graph::id::ParamId;
use crate::graph::node::ParamSlot;
use crate::types::{BufferId, ParamKind, ParamValue, Point, Region, Rgba};

#[derive(Debug, Clone)]
struct SnapEntry {
    name: String,
    observed: Option<ParamValue>,
    enabled: bool,
}

/// Frozen copy of every parameter's observed value and readiness.
#[derive(Debug, Clone)]
pub struct ParamSnapshot {
    entries: Vec<SnapEntry>,
}

impl ParamSnapshot {
    pub(crate) fn from_slots(slots: &[ParamSlot]) -> Self {
        Self {
            entries: slots
                .iter()
                .map(|slot| SnapEntry {
                    name: slot.name.clone(),
                    observed: slot.observed().cloned(),
                    enabled: slot.enabled,
                })
                .collect(),
        }
    }

    /// Strict read, mirroring `ParamGraph::value`: compute code must not
    /// consume a disabled or unset parameter.
    pub fn get(&self, id: ParamId) -> Result<&ParamValue> {
        let entry = self.entry(id)?;
        match &entry.observed {
            Some(value) if entry.enabled => Ok(value),
            _ => Err(CoreError::NotReady {
                name: entry.name.clone(),
            }),
        }
    }

    /// Lenient read: the observed value, including a disabled default.
    pub fn observed(&self, id: ParamId) -> Option<&ParamValue> {
        self.entries
            .get(id.index())
            .and_then(|entry| entry.observed.as_ref())
    }

    /// Whether [`ParamSnapshot::get`] would succeed.
    pub fn is_ready(&self, id: ParamId) -> bool {
        self.entries
            .get(id.index())
            .map(|entry| entry.enabled && entry.observed.is_some())
            .unwrap_or(false)
    }

    pub fn is_enabled(&self, id: ParamId) -> bool {
        self.entries
            .get(id.index())
            .map(|entry| entry.enabled)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn number(&self, id: ParamId) -> Result<f64> {
        let value = self.get(id)?;
        value
            .as_number()
            .ok_or_else(|| self.mismatch(id, ParamKind::Number, value))
    }

    pub fn integer(&self, id: ParamId) -> Result<i64> {
        let value = self.get(id)?;
        value
            .as_integer()
            .ok_or_else(|| self.mismatch(id, ParamKind::Integer, value))
    }

    pub fn toggle(&self, id: ParamId) -> Result<bool> {
        let value = self.get(id)?;
        value
            .as_toggle()
            .ok_or_else(|| self.mismatch(id, ParamKind::Toggle, value))
    }

    pub fn choice(&self, id: ParamId) -> Result<usize> {
        let value = self.get(id)?;
        value
            .as_choice()
            .ok_or_else(|| self.mismatch(id, ParamKind::Choice, value))
    }

    pub fn color(&self, id: ParamId) -> Result<Rgba> {
        let value = self.get(id)?;
        value
            .as_color()
            .ok_or_else(|| self.mismatch(id, ParamKind::Color, value))
    }

    pub fn points(&self, id: ParamId) -> Result<&[Point]> {
        let value = self.get(id)?;
        value
            .as_points()
            .ok_or_else(|| self.mismatch(id, ParamKind::Points, value))
    }

    pub fn region(&self, id: ParamId) -> Result<Region> {
        let value = self.get(id)?;
        value
            .as_region()
            .ok_or_else(|| self.mismatch(id, ParamKind::Region, value))
    }

    pub fn image(&self, id: ParamId) -> Result<BufferId> {
        let value = self.get(id)?;
        value
            .as_image()
            .ok_or_else(|| self.mismatch(id, ParamKind::Image, value))
    }

    fn entry(&self, id: ParamId) -> Result<&SnapEntry> {
        self.entries
            .get(id.index())
            .ok_or(CoreError::UnknownParam(id))
    }

    fn mismatch(&self, id: ParamId, expected: ParamKind, got: &ParamValue) -> CoreError {
        CoreError::TypeMismatch {
            name: self
                .entries
                .get(id.index())
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            expected,
            got: got.kind(),
        }
    }
}
