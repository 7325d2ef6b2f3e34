//! Parameter declaration and per-node storage.
//!
//! A [`ParamSpec`] describes one control the application offers (name, value
//! kind, starting value, clamp range). The graph turns specs into internal
//! slots; all later access goes through [`crate::graph::ParamGraph`] by id.

use crate::types::{ParamKind, ParamValue};

/// Declarative description of one parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) kind: ParamKind,
    pub(crate) initial: Option<ParamValue>,
    pub(crate) range: Option<(f64, f64)>,
    pub(crate) label_key: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            initial: None,
            range: None,
            label_key: None,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn toggle(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Toggle)
    }

    pub fn choice(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Choice)
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Color)
    }

    pub fn points(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Points)
    }

    pub fn region(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Region)
    }

    pub fn image(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Image)
    }

    /// Starting value; the parameter is born valid with it.
    pub fn initial(mut self, value: ParamValue) -> Self {
        self.initial = Some(value);
        self
    }

    /// Clamp range for numeric kinds. Out-of-range writes land on the bound.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Key for display-text resolution against a label table.
    pub fn label(mut self, key: impl Into<String>) -> Self {
        self.label_key = Some(key.into());
        self
    }
}

/// Internal storage for one parameter.
#[derive(Debug)]
pub(crate) struct ParamSlot {
    pub name: String,
    pub label_key: Option<String>,
    pub kind: ParamKind,
    pub range: Option<(f64, f64)>,
    /// Last user-set value; `None` = never set.
    pub raw: Option<ParamValue>,
    pub enabled: bool,
    /// Value observed in place of `raw` while disabled.
    pub disabled_default: Option<ParamValue>,
}

impl ParamSlot {
    pub fn from_spec(spec: ParamSpec) -> Self {
        debug_assert!(
            spec.initial
                .as_ref()
                .map(|v| v.kind() == spec.kind)
                .unwrap_or(true),
            "initial value kind does not match parameter kind for '{}'",
            spec.name
        );
        let mut slot = Self {
            name: spec.name,
            label_key: spec.label_key,
            kind: spec.kind,
            range: spec.range,
            raw: None,
            enabled: true,
            disabled_default: None,
        };
        slot.raw = spec.initial.map(|v| slot.clamp(v));
        slot
    }

    /// The externally observed value: the raw value while enabled, the
    /// installed default while disabled.
    pub fn observed(&self) -> Option<&ParamValue> {
        if self.enabled {
            self.raw.as_ref()
        } else {
            self.disabled_default.as_ref()
        }
    }

    /// Whether a strict read would succeed.
    pub fn is_ready(&self) -> bool {
        self.enabled && self.raw.is_some()
    }

    /// Apply the clamp range to numeric values; other kinds pass through.
    pub fn clamp(&self, value: ParamValue) -> ParamValue {
        let Some((min, max)) = self.range else {
            return value;
        };
        match value {
            ParamValue::Number(v) => ParamValue::Number(v.clamp(min, max)),
            ParamValue::Integer(v) => {
                ParamValue::Integer(v.clamp(min.ceil() as i64, max.floor() as i64))
            }
            other => other,
        }
    }
}
