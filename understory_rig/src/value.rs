// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar cells, calculated values and modifier chains.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::Scene;
use crate::id::{CalculatedId, NodeId, ValueId};
use crate::node::{Calculated, Input, Modified, Node, Scalar};

/// The arithmetic performed by one modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModifierOp {
    /// `target + modifier`.
    Add,
    /// `target - modifier`.
    Subtract,
    /// `target * modifier`.
    Multiply,
    /// `target` raised to `modifier`.
    Pow,
    /// `target / modifier`, or `0` when `modifier` is zero or NaN.
    Divide,
    /// Truncating remainder, `target % modifier`.
    Remainder,
    /// `modifier`, ignoring `target`.
    Assign,
    /// `floor(target)`.
    Floor,
    /// `ceil(target)`.
    Ceil,
    /// `target` rounded to the nearest integer, halfway cases toward
    /// positive infinity.
    Round,
}

impl ModifierOp {
    /// Whether the operation ignores its modifier operand.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Floor | Self::Ceil | Self::Round)
    }

    /// Applies the operation.
    ///
    /// ```
    /// use understory_rig::ModifierOp;
    ///
    /// assert_eq!(ModifierOp::Divide.apply(10.0, 0.0), 0.0);
    /// assert_eq!(ModifierOp::Round.apply(-2.5, 0.0), -2.0);
    /// assert_eq!(ModifierOp::Remainder.apply(-7.0, 3.0), -1.0);
    /// ```
    #[must_use]
    pub fn apply(self, target: f64, modifier: f64) -> f64 {
        match self {
            Self::Add => target + modifier,
            Self::Subtract => target - modifier,
            Self::Multiply => target * modifier,
            Self::Pow => target.powf(modifier),
            Self::Divide => {
                if modifier == 0.0 || modifier.is_nan() {
                    0.0
                } else {
                    target / modifier
                }
            }
            Self::Remainder => target % modifier,
            Self::Assign => modifier,
            Self::Floor => target.floor(),
            Self::Ceil => target.ceil(),
            Self::Round => {
                let floor = target.floor();
                if target - floor >= 0.5 {
                    floor + 1.0
                } else {
                    floor
                }
            }
        }
    }
}

/// The second operand of a modifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValueSource {
    /// A fixed number. Stored in a fresh scalar cell.
    Constant(f64),
    /// A live node, read every frame after it is computed.
    Value(ValueId),
}

impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<ValueId> for ValueSource {
    fn from(id: ValueId) -> Self {
        Self::Value(id)
    }
}

impl From<CalculatedId> for ValueSource {
    fn from(id: CalculatedId) -> Self {
        Self::Value(id.into())
    }
}

/// Appends modifiers to a calculated value. Created by [`Scene::modify`].
///
/// Every call extends the chain permanently; there is no removal.
#[derive(Debug)]
pub struct ModifierChain<'s> {
    scene: &'s mut Scene,
    calculated: CalculatedId,
}

impl ModifierChain<'_> {
    /// The value being modified.
    #[must_use]
    pub fn id(&self) -> CalculatedId {
        self.calculated
    }

    fn push(self, op: ModifierOp, source: Option<ValueSource>) -> Self {
        self.scene.append_modifier(self.calculated, op, source);
        self
    }

    /// Adds `source`.
    pub fn add(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Add, Some(source.into()))
    }

    /// Subtracts `source`.
    pub fn subtract(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Subtract, Some(source.into()))
    }

    /// Multiplies by `source`.
    pub fn multiply(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Multiply, Some(source.into()))
    }

    /// Raises to the power `source`.
    pub fn pow(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Pow, Some(source.into()))
    }

    /// Divides by `source`, yielding `0` when it is zero.
    pub fn divide(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Divide, Some(source.into()))
    }

    /// Takes the truncating remainder by `source`.
    pub fn remainder(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Remainder, Some(source.into()))
    }

    /// Replaces the running value with `source`.
    pub fn assign(self, source: impl Into<ValueSource>) -> Self {
        self.push(ModifierOp::Assign, Some(source.into()))
    }

    /// Rounds down.
    pub fn floor(self) -> Self {
        self.push(ModifierOp::Floor, None)
    }

    /// Rounds up.
    pub fn ceil(self) -> Self {
        self.push(ModifierOp::Ceil, None)
    }

    /// Rounds to the nearest integer.
    pub fn round(self) -> Self {
        self.push(ModifierOp::Round, None)
    }
}

impl Scene {
    /// Creates a scalar cell holding `value`.
    pub fn scalar(&mut self, value: f64) -> ValueId {
        ValueId(self.alloc(Node::Scalar(Scalar {
            value,
            requirement: None,
        })))
    }

    /// Creates a cell refreshed from `inputs[index]` whenever a list that
    /// contains it is rendered.
    pub fn input(&mut self, index: usize) -> ValueId {
        ValueId(self.alloc(Node::Input(Input { value: 0.0, index })))
    }

    /// Creates a calculated value with base value `base` and no modifiers.
    pub fn calculated(&mut self, base: f64) -> CalculatedId {
        let base_cell = self.scalar(base).0;
        CalculatedId(self.alloc(Node::Calculated(Calculated {
            base: base_cell,
            value: base,
            modifiers: Vec::new(),
        })))
    }

    /// Current value of a node, as of the last render that computed it.
    #[must_use]
    pub fn value(&self, id: impl Into<ValueId>) -> f64 {
        self.node(id.into().0).value()
    }

    /// Overwrites the current value of a cell.
    ///
    /// Meant for scalars and inputs driven by the host. A calculated value
    /// with modifiers recomputes over this on the next render; use
    /// [`Scene::set_base_value`] instead.
    pub fn set_value(&mut self, id: impl Into<ValueId>, value: f64) {
        self.node_mut(id.into().0).set_value(value);
    }

    /// The base value a calculated value's chain starts from.
    #[must_use]
    pub fn base_value(&self, id: CalculatedId) -> f64 {
        match self.node(id.0) {
            Node::Calculated(calculated) => self.node(calculated.base).value(),
            _ => 0.0,
        }
    }

    /// Sets both the base value and the current value of `id`.
    pub fn set_base_value(&mut self, id: CalculatedId, value: f64) {
        let Node::Calculated(calculated) = self.node_mut(id.0) else {
            return;
        };
        calculated.value = value;
        let base = calculated.base;
        self.node_mut(base).set_value(value);
    }

    /// Starts appending modifiers to `id`.
    ///
    /// ```
    /// use understory_rig::Scene;
    ///
    /// let mut scene = Scene::new();
    /// let value = scene.calculated(10.0);
    /// scene.modify(value).add(2.0).multiply(3.0);
    ///
    /// let list = scene.compile(value).unwrap();
    /// scene.render_list(&list, &[], &mut ());
    /// assert_eq!(scene.value(value), 36.0);
    /// ```
    pub fn modify(&mut self, id: CalculatedId) -> ModifierChain<'_> {
        ModifierChain {
            scene: self,
            calculated: id,
        }
    }

    /// Number of modifiers in `id`'s chain.
    #[must_use]
    pub fn modifier_count(&self, id: CalculatedId) -> usize {
        match self.node(id.0) {
            Node::Calculated(calculated) => calculated.modifiers.len(),
            _ => 0,
        }
    }

    pub(crate) fn append_modifier(
        &mut self,
        id: CalculatedId,
        op: ModifierOp,
        source: Option<ValueSource>,
    ) {
        let modifier = source.map(|source| self.source_node(source));
        let target = match self.node(id.0) {
            Node::Calculated(calculated) => calculated
                .modifiers
                .last()
                .copied()
                .unwrap_or(calculated.base),
            _ => return,
        };
        let link = self.alloc(Node::Modified(Modified {
            op,
            target,
            modifier,
            value: 0.0,
        }));
        if let Node::Calculated(calculated) = self.node_mut(id.0) {
            calculated.modifiers.push(link);
        }
    }

    fn source_node(&mut self, source: ValueSource) -> NodeId {
        match source {
            ValueSource::Constant(value) => self.scalar(value).0,
            ValueSource::Value(id) => id.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(scene: &mut Scene, id: CalculatedId) -> f64 {
        let list = scene.compile(id).unwrap();
        scene.render_list(&list, &[], &mut ());
        scene.value(id)
    }

    #[test]
    fn divide_by_zero_is_zero() {
        let mut scene = Scene::new();
        let value = scene.calculated(10.0);
        scene.modify(value).divide(0.0);
        let result = evaluate(&mut scene, value);
        assert_eq!(result, 0.0);
        assert!(result.is_finite());
    }

    #[test]
    fn operations() {
        let cases = [
            (ModifierOp::Add, 7.0, 2.0, 9.0),
            (ModifierOp::Subtract, 7.0, 2.0, 5.0),
            (ModifierOp::Multiply, 7.0, 2.0, 14.0),
            (ModifierOp::Pow, 3.0, 2.0, 9.0),
            (ModifierOp::Divide, 7.0, 2.0, 3.5),
            (ModifierOp::Divide, 7.0, f64::NAN, 0.0),
            (ModifierOp::Remainder, 7.5, 2.0, 1.5),
            (ModifierOp::Remainder, -7.0, 2.0, -1.0),
            (ModifierOp::Assign, 7.0, 2.0, 2.0),
            (ModifierOp::Floor, -1.5, 0.0, -2.0),
            (ModifierOp::Ceil, -1.5, 0.0, -1.0),
            (ModifierOp::Round, 2.5, 0.0, 3.0),
            (ModifierOp::Round, -2.5, 0.0, -2.0),
            (ModifierOp::Round, -2.6, 0.0, -3.0),
        ];
        for (op, target, modifier, expected) in cases {
            assert_eq!(op.apply(target, modifier), expected, "{op:?}({target}, {modifier})");
        }
        assert!(ModifierOp::Remainder.apply(1.0, 0.0).is_nan());
    }

    #[test]
    fn unary_ops_ignore_the_operand() {
        let unary = [ModifierOp::Floor, ModifierOp::Ceil, ModifierOp::Round];
        for op in unary {
            assert!(op.is_unary());
            assert_eq!(op.apply(2.4, 100.0), op.apply(2.4, 0.0));
        }
        for op in [ModifierOp::Add, ModifierOp::Divide, ModifierOp::Assign] {
            assert!(!op.is_unary());
        }
    }

    #[test]
    fn chain_reports_its_value() {
        let mut scene = Scene::new();
        let value = scene.calculated(1.0);
        let chain = scene.modify(value).add(1.0);
        assert_eq!(chain.id(), value);
        assert_eq!(scene.modifier_count(value), 1);
    }

    #[test]
    fn empty_chain_is_its_base() {
        let mut scene = Scene::new();
        let value = scene.calculated(4.0);
        let list = scene.compile(value).unwrap();
        assert!(list.is_empty());

        scene.set_base_value(value, 6.0);
        assert_eq!(scene.value(value), 6.0);
        assert_eq!(scene.base_value(value), 6.0);
    }

    #[test]
    fn chain_runs_in_order() {
        let mut scene = Scene::new();
        let value = scene.calculated(10.0);
        scene.modify(value).subtract(4.0).divide(4.0).round().pow(2.0);
        assert_eq!(scene.modifier_count(value), 4);
        // ((10 - 4) / 4) = 1.5, rounds to 2, squared.
        assert_eq!(evaluate(&mut scene, value), 4.0);
    }

    #[test]
    fn chain_compiles_to_one_command_per_link_plus_assign() {
        let mut scene = Scene::new();
        let value = scene.calculated(1.0);
        scene.modify(value).add(1.0).floor();
        let list = scene.compile(value).unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn base_value_changes_flow_through_chain() {
        let mut scene = Scene::new();
        let value = scene.calculated(1.0);
        scene.modify(value).multiply(10.0);
        let list = scene.compile(value).unwrap();

        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.value(value), 10.0);

        scene.set_base_value(value, 2.0);
        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.value(value), 20.0);
    }

    #[test]
    fn live_modifier_is_computed_first() {
        let mut scene = Scene::new();
        let step = scene.calculated(3.0);
        scene.modify(step).multiply(2.0);
        let value = scene.calculated(1.0);
        scene.modify(value).add(step);

        assert_eq!(evaluate(&mut scene, value), 7.0);
    }

    #[test]
    fn shared_operand_is_evaluated_once() {
        let mut scene = Scene::new();
        let shared = scene.calculated(2.0);
        scene.modify(shared).add(1.0);
        let left = scene.calculated(0.0);
        scene.modify(left).add(shared);
        let right = scene.calculated(0.0);
        scene.modify(right).add(shared).add(left);

        let list = scene.compile(right).unwrap();
        // shared: 1 link + assign; left: 1 link + assign; right: 2 links + assign.
        assert_eq!(list.len(), 7);
        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.value(right), 6.0);
    }

    #[test]
    fn inputs_are_injected_by_index() {
        let mut scene = Scene::new();
        let time = scene.input(1);
        let value = scene.calculated(0.0);
        scene.modify(value).add(time).divide(2.0);
        let list = scene.compile(value).unwrap();

        scene.render_list(&list, &[None, Some(8.0)], &mut ());
        assert_eq!(scene.value(value), 4.0);

        // Missing inputs keep the last injected value.
        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.value(value), 4.0);
    }

    #[test]
    fn mutual_dependency_is_a_cycle() {
        let mut scene = Scene::new();
        let a = scene.calculated(1.0);
        let b = scene.calculated(1.0);
        scene.modify(a).add(b);
        scene.modify(b).add(a);

        let err = scene.compile(a).unwrap_err();
        assert_eq!(err.node, NodeId::from(a));
        assert_eq!(err.path.first(), err.path.last());
    }
}
