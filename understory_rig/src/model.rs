// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Models: parts that compile their own subtree.
//!
//! Inside an enclosing list a model behaves like a part and then replays its
//! own list, compiled in isolation. Input nodes in that subtree are fed from
//! the model's own input sources, so two models can share an input index
//! without seeing each other's values.

use alloc::rc::Rc;

use smallvec::SmallVec;
use understory_render_list::CycleError;

use crate::adapter::DisplayAdapter;
use crate::command::Frame;
use crate::id::{ModelId, NodeId, ValueId};
use crate::node::{CompiledModel, ModelState, Node, Part};
use crate::{Scene, SceneList};

impl Scene {
    /// Creates a detached model with no input sources.
    pub fn model(&mut self) -> ModelId {
        ModelId(self.alloc(Node::Part(Part {
            model: Some(ModelState::default()),
            ..Part::default()
        })))
    }

    /// Feeds input index `index` of `model`'s subtree from `source`.
    ///
    /// The source is read each time the model's list replays.
    pub fn set_render_input_source(
        &mut self,
        model: ModelId,
        index: usize,
        source: impl Into<ValueId>,
    ) {
        let source = source.into().0;
        if let Some(state) = self.node_mut(model.0).model_mut() {
            if state.inputs.len() <= index {
                state.inputs.resize(index + 1, None);
            }
            state.inputs[index] = Some(source);
        }
    }

    /// The source registered for input index `index` of `model`.
    #[must_use]
    pub fn render_input_source(&self, model: ModelId, index: usize) -> Option<ValueId> {
        self.node(model.0)
            .model()
            .and_then(|state| state.inputs.get(index).copied().flatten())
            .map(ValueId)
    }

    /// Compiles `model` and caches the list at the current generation.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the model or its subtree contains a cycle.
    /// The previously cached list, if any, is left in place.
    pub fn compile_model(&mut self, model: ModelId) -> Result<(), CycleError<NodeId>> {
        self.compile_and_cache(model).map(|_| ())
    }

    /// The cached list of `model`, if it is up to date with the scene.
    #[must_use]
    pub fn compiled_model(&self, model: ModelId) -> Option<&SceneList> {
        self.fresh_list(model).map(|compiled| &*compiled.list)
    }

    /// Renders `model` and its subtree, recompiling first when the cached
    /// list is missing or stale.
    ///
    /// ```
    /// use understory_rig::{PartAttribute, Scene};
    ///
    /// let mut scene = Scene::new();
    /// let model = scene.model();
    /// let part = scene.part();
    /// scene.add_child(model, part);
    ///
    /// let time = scene.input(0);
    /// let x = scene.part_attribute(part, PartAttribute::X);
    /// scene.modify(x).add(time);
    /// let clock = scene.scalar(12.0);
    /// scene.set_render_input_source(model, 0, clock);
    ///
    /// scene.render_model(model, &mut ()).unwrap();
    /// assert_eq!(scene.matrix(part).x, 12.0);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if recompiling fails; nothing is rendered.
    pub fn render_model(
        &mut self,
        model: ModelId,
        adapter: &mut dyn DisplayAdapter,
    ) -> Result<(), CycleError<NodeId>> {
        let list = match self.fresh_list(model) {
            Some(compiled) => Rc::clone(&compiled.list),
            None => {
                log::debug!(
                    "model {:?} is stale at generation {}, recompiling",
                    model.0,
                    self.generation()
                );
                self.compile_and_cache(model)?
            }
        };
        let inputs = self.model_inputs(model.0);
        list.render(&mut Frame::new(self, adapter), &inputs);
        Ok(())
    }

    /// Current values of `model`'s input sources, by index.
    pub(crate) fn model_inputs(&self, model: NodeId) -> SmallVec<[Option<f64>; 4]> {
        self.node(model)
            .model()
            .map(|state| {
                state
                    .inputs
                    .iter()
                    .map(|source| source.map(|s| self.node(s).value()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn fresh_list(&self, model: ModelId) -> Option<&CompiledModel> {
        self.node(model.0)
            .model()
            .and_then(|state| state.compiled.as_ref())
            .filter(|compiled| compiled.generation == self.generation())
    }

    fn compile_and_cache(&mut self, model: ModelId) -> Result<Rc<SceneList>, CycleError<NodeId>> {
        let list = Rc::new(self.compile(model)?);
        let generation = self.generation();
        log::debug!(
            "model {:?} compiled at generation {generation}: {} commands",
            model.0,
            list.len()
        );
        if let Some(state) = self.node_mut(model.0).model_mut() {
            state.compiled = Some(CompiledModel {
                generation,
                list: Rc::clone(&list),
            });
        }
        Ok(list)
    }
}
