//! Test data builders for wiring small parameter graphs

use liveproc::{EnableLink, ParamGraph, ParamId, ParamSpec, ParamValue};

/// Builder for the most common shape in these tests: a toggle gating a
/// clamped number through one enablement link.
pub struct GatedNumberBuilder {
    toggle_name: String,
    number_name: String,
    range: (f64, f64),
    initial: f64,
    disabled_default: f64,
    toggle_on: bool,
}

impl GatedNumberBuilder {
    pub fn new() -> Self {
        Self {
            toggle_name: "enabled".to_string(),
            number_name: "strength".to_string(),
            range: (0.0, 100.0),
            initial: 50.0,
            disabled_default: 0.0,
            toggle_on: true,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn initial(mut self, value: f64) -> Self {
        self.initial = value;
        self
    }

    pub fn disabled_default(mut self, value: f64) -> Self {
        self.disabled_default = value;
        self
    }

    pub fn toggle_on(mut self, on: bool) -> Self {
        self.toggle_on = on;
        self
    }

    pub fn build(self) -> (ParamGraph, ParamId, ParamId) {
        let mut graph = ParamGraph::new();
        let toggle = graph.add_param(
            ParamSpec::toggle(self.toggle_name).initial(ParamValue::Toggle(self.toggle_on)),
        );
        let number = graph.add_param(
            ParamSpec::number(self.number_name)
                .range(self.range.0, self.range.1)
                .initial(ParamValue::Number(self.initial)),
        );
        graph
            .add_link(
                EnableLink::new(toggle, number, |v| v.as_toggle() == Some(true))
                    .with_default(ParamValue::Number(self.disabled_default)),
            )
            .expect("two-node graph cannot cycle");
        (graph, toggle, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gated_number_builder() {
        let (graph, toggle, number) = GatedNumberBuilder::new()
            .range(0.0, 10.0)
            .initial(4.0)
            .build();

        assert!(graph.is_enabled(toggle));
        assert!(graph.is_enabled(number));
        assert_eq!(graph.observed(number), Some(&ParamValue::Number(4.0)));
    }

    #[test]
    fn test_builder_with_toggle_off_starts_disabled() {
        let (graph, _, number) = GatedNumberBuilder::new()
            .toggle_on(false)
            .disabled_default(1.0)
            .build();

        assert!(!graph.is_enabled(number));
        assert_eq!(graph.observed(number), Some(&ParamValue::Number(1.0)));
    }
}
