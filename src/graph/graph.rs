//! The reactive parameter graph.
//!
//! Parameters live in an arena addressed by [`ParamId`]; enablement links and
//! change subscriptions refer to them by id, so there is no shared mutable
//! aliasing anywhere. All mutation happens through [`ParamGraph`] on the
//! interaction thread; worker threads only ever see immutable snapshots.
//!
//! Propagation is driven by an explicit worklist: an accepted mutation
//! enqueues one change record, and the queue is drained to completion before
//! the mutating call returns. Chained enablement updates therefore run in a
//! bounded loop, never by recursion, and their order is auditable: links are
//! evaluated in declaration order, subscribers in subscription order.

use std::collections::VecDeque;

use crate::error::{CoreError, Result};
use crate::graph::id::{LinkId, ParamId, SubscriptionId};
use crate::graph::link::EnableLink;
use crate::graph::node::{ParamSlot, ParamSpec};
use crate::graph::snapshot::ParamSnapshot;
use crate::labels::{LabelTable, Locale};
use crate::types::ParamValue;

/// One accepted mutation, as delivered to subscribers.
///
/// A disable that also swaps the observed value reports both flags in a
/// single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamChange {
    pub param: ParamId,
    pub value_changed: bool,
    pub enabled_changed: bool,
}

type ChangeCallback = Box<dyn FnMut(&ParamChange) + Send>;

struct Subscriber {
    id: SubscriptionId,
    param: ParamId,
    callback: ChangeCallback,
}

/// Reactive graph of typed parameters with conditional enablement.
pub struct ParamGraph {
    slots: Vec<ParamSlot>,
    links: Vec<EnableLink>,
    subscribers: Vec<Subscriber>,
    queue: VecDeque<ParamChange>,
    next_subscription: u32,
}

impl Default for ParamGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGraph {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            links: Vec::new(),
            subscribers: Vec::new(),
            queue: VecDeque::new(),
            next_subscription: 0,
        }
    }

    /// Declare a parameter. Initial values are clamped but fire no
    /// notification; nothing can be subscribed yet.
    pub fn add_param(&mut self, spec: ParamSpec) -> ParamId {
        let id = ParamId(self.slots.len() as u32);
        self.slots.push(ParamSlot::from_spec(spec));
        id
    }

    /// Declare an enablement link.
    ///
    /// Fails with [`CoreError::CycleDetected`] if the link would make the
    /// target (transitively) govern its own source; the graph must stay a
    /// DAG so propagation terminates. The target's enablement is evaluated
    /// immediately against the new link set.
    pub fn add_link(&mut self, link: EnableLink) -> Result<LinkId> {
        self.check_id(link.source)?;
        self.check_id(link.target)?;
        if link.source == link.target || self.would_create_cycle(link.source, link.target) {
            return Err(CoreError::CycleDetected {
                src: link.source,
                target: link.target,
            });
        }

        let id = LinkId(self.links.len() as u32);
        let target = link.target;
        self.links.push(link);
        self.recompute_enablement(target);
        self.drain();
        Ok(id)
    }

    /// Write a value. Fires one notification, synchronously, only when the
    /// observed value actually changes under the value's equality rule.
    pub fn set_value(&mut self, id: ParamId, value: ParamValue) -> Result<()> {
        self.check_id(id)?;
        let slot = &mut self.slots[id.index()];
        if value.kind() != slot.kind {
            return Err(CoreError::TypeMismatch {
                name: slot.name.clone(),
                expected: slot.kind,
                got: value.kind(),
            });
        }

        let value = slot.clamp(value);
        let prev_observed = slot.observed().cloned();
        slot.raw = Some(value);
        let changed = !option_same(prev_observed.as_ref(), slot.observed());
        if changed {
            self.queue.push_back(ParamChange {
                param: id,
                value_changed: true,
                enabled_changed: false,
            });
            self.drain();
        }
        Ok(())
    }

    /// Manually flip a parameter's enablement.
    ///
    /// While disabled the parameter observes `default` instead of its raw
    /// value; re-enabling restores the raw value. Links governing the same
    /// target re-apply their own verdict on the next source change.
    pub fn set_enabled(
        &mut self,
        id: ParamId,
        enabled: bool,
        default: Option<ParamValue>,
    ) -> Result<()> {
        self.check_id(id)?;
        if self.slots[id.index()].enabled != enabled {
            self.apply_enablement(id, enabled, default);
        } else if !enabled {
            self.update_disabled_default(id, default);
        }
        self.drain();
        Ok(())
    }

    /// Strict read: the stored value, or [`CoreError::NotReady`] when the
    /// parameter is unset or disabled.
    pub fn value(&self, id: ParamId) -> Result<&ParamValue> {
        self.check_id(id)?;
        let slot = &self.slots[id.index()];
        match &slot.raw {
            Some(value) if slot.enabled => Ok(value),
            _ => Err(CoreError::NotReady {
                name: slot.name.clone(),
            }),
        }
    }

    /// Lenient read: the externally observed value (the installed default
    /// while disabled). `None` for unset parameters and unknown ids.
    pub fn observed(&self, id: ParamId) -> Option<&ParamValue> {
        self.slots.get(id.index()).and_then(|slot| slot.observed())
    }

    /// Whether a strict read would succeed.
    pub fn is_ready(&self, id: ParamId) -> bool {
        self.slots
            .get(id.index())
            .map(|slot| slot.is_ready())
            .unwrap_or(false)
    }

    pub fn is_enabled(&self, id: ParamId) -> bool {
        self.slots
            .get(id.index())
            .map(|slot| slot.enabled)
            .unwrap_or(false)
    }

    pub fn name(&self, id: ParamId) -> Option<&str> {
        self.slots.get(id.index()).map(|slot| slot.name.as_str())
    }

    /// Resolve the parameter's display text against a label table. Falls
    /// back to the label key, then to the internal name.
    pub fn display_name<'a>(
        &'a self,
        id: ParamId,
        table: &LabelTable,
        locale: Locale,
    ) -> Result<&'a str> {
        self.check_id(id)?;
        let slot = &self.slots[id.index()];
        let key = slot.label_key.as_deref().unwrap_or(&slot.name);
        Ok(table.resolve_or_key(key, locale))
    }

    /// Register a change callback for one parameter. Callbacks run
    /// synchronously in subscription order; they observe changes but cannot
    /// re-enter the graph.
    pub fn subscribe(
        &mut self,
        param: ParamId,
        callback: impl FnMut(&ParamChange) + Send + 'static,
    ) -> Result<SubscriptionId> {
        self.check_id(param)?;
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            param,
            callback: Box::new(callback),
        });
        Ok(id)
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != subscription);
        self.subscribers.len() != before
    }

    /// Immutable copy of every parameter's observed value and readiness,
    /// for handing to a worker thread.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot::from_slots(&self.slots)
    }

    pub fn param_count(&self) -> usize {
        self.slots.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    fn check_id(&self, id: ParamId) -> Result<()> {
        if id.index() < self.slots.len() {
            Ok(())
        } else {
            Err(CoreError::UnknownParam(id))
        }
    }

    /// DFS from `target` through existing links: if `source` is reachable,
    /// adding source -> target would close a cycle.
    fn would_create_cycle(&self, source: ParamId, target: ParamId) -> bool {
        let mut visited = vec![false; self.slots.len()];
        let mut stack = vec![target];
        while let Some(node) = stack.pop() {
            if node == source {
                return true;
            }
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            for link in &self.links {
                if link.source == node {
                    stack.push(link.target);
                }
            }
        }
        false
    }

    /// Drain the change queue to completion.
    ///
    /// Terminates because the link graph is a DAG and enablement writes are
    /// no-ops when the state already matches.
    fn drain(&mut self) {
        while let Some(change) = self.queue.pop_front() {
            self.evaluate_links_from(change.param);
            self.notify(change);
        }
    }

    /// Re-evaluate every target governed by a link whose source changed,
    /// in link declaration order.
    fn evaluate_links_from(&mut self, source: ParamId) {
        let mut targets: Vec<ParamId> = Vec::new();
        for link in &self.links {
            if link.source == source && !targets.contains(&link.target) {
                targets.push(link.target);
            }
        }
        for target in targets {
            self.recompute_enablement(target);
        }
    }

    /// Combine all links governing `target`: enabled = AND of every
    /// predicate. Among links currently evaluating false, the last-declared
    /// one's default is installed.
    fn recompute_enablement(&mut self, target: ParamId) {
        let mut enabled = true;
        let mut winning_default: Option<ParamValue> = None;
        for link in &self.links {
            if link.target != target {
                continue;
            }
            let observed = self.slots[link.source.index()].observed();
            if !link.evaluate(observed) {
                enabled = false;
                if link.default.is_some() {
                    winning_default = link.default.clone();
                }
            }
        }

        if self.slots[target.index()].enabled != enabled {
            self.apply_enablement(target, enabled, winning_default);
        } else if !enabled {
            self.update_disabled_default(target, winning_default);
        }
    }

    fn apply_enablement(&mut self, id: ParamId, enabled: bool, default: Option<ParamValue>) {
        let slot = &mut self.slots[id.index()];
        let prev_observed = slot.observed().cloned();
        slot.enabled = enabled;
        slot.disabled_default = if enabled { None } else { default };
        let value_changed = !option_same(prev_observed.as_ref(), slot.observed());
        tracing::debug!(param = %id, enabled, value_changed, "enablement changed");
        self.queue.push_back(ParamChange {
            param: id,
            value_changed,
            enabled_changed: true,
        });
    }

    /// A still-disabled target whose governing false link changed may
    /// observe a different default now.
    fn update_disabled_default(&mut self, id: ParamId, default: Option<ParamValue>) {
        let slot = &mut self.slots[id.index()];
        let prev_observed = slot.observed().cloned();
        slot.disabled_default = default;
        if !option_same(prev_observed.as_ref(), slot.observed()) {
            self.queue.push_back(ParamChange {
                param: id,
                value_changed: true,
                enabled_changed: false,
            });
        }
    }

    fn notify(&mut self, change: ParamChange) {
        for sub in self.subscribers.iter_mut() {
            if sub.param == change.param {
                (sub.callback)(&change);
            }
        }
    }
}

fn option_same(a: Option<&ParamValue>, b: Option<&ParamValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.same_as(y),
        _ => false,
    }
}
