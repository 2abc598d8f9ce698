// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::{Duration, Instant};

use strata_core::scene::{NodeId, SceneGraph};
use strata_lanes::animation_lane::{apply_tracks, PositionTrack};
use strata_lanes::explosion_lane::{
    DisassemblyTargets, ExplosionLane, ExplosionPlan, ParentCenterLane,
};
use strata_lanes::hierarchy_lane::{HierarchyAnalysis, HierarchyLane, Layer, OriginalTransforms};

use super::animation::{AnimationKind, AnimationRecord, PendingChain};
use super::status::DisassemblyStatus;
use super::undo::{LayerSnapshot, UndoStack};
use crate::config::{validate_explosion_distance, DisassemblyConfig};
use crate::error::ConfigError;
use crate::input::DisassemblyCommand;

/// Owns the disassembly state of one loaded model.
///
/// Commands never fail: a command whose preconditions do not hold returns
/// `false` and changes nothing. At most one animation runs at a time.
pub struct DisassemblyAgent {
    config: DisassemblyConfig,
    explosion_lane: Box<dyn ExplosionLane>,
    analysis: Option<HierarchyAnalysis>,
    plan: ExplosionPlan,
    targets: DisassemblyTargets,
    current_layer: usize,
    undo: UndoStack,
    animation: Option<AnimationRecord>,
    pending_chain: Option<PendingChain>,
}

impl Default for DisassemblyAgent {
    fn default() -> Self {
        Self::with_valid_config(DisassemblyConfig::default())
    }
}

impl DisassemblyAgent {
    /// Creates an agent with no model loaded.
    pub fn new(config: DisassemblyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: DisassemblyConfig) -> Self {
        Self {
            config,
            explosion_lane: Box::new(ParentCenterLane),
            analysis: None,
            plan: ExplosionPlan::default(),
            targets: DisassemblyTargets::default(),
            current_layer: 0,
            undo: UndoStack::default(),
            animation: None,
            pending_chain: None,
        }
    }

    /// Replaces the explosion strategy. Takes effect on the next [`Self::load_model`].
    pub fn with_explosion_lane(mut self, lane: impl ExplosionLane + 'static) -> Self {
        self.explosion_lane = Box::new(lane);
        self
    }

    // --- Model lifecycle ---

    /// Analyzes the model under `root` and plans its targets.
    ///
    /// Any previous model state is dropped without touching the graph; call
    /// [`Self::reset`] first to restore a previously loaded model. A root that
    /// is not in the graph loads an empty model.
    pub fn load_model(&mut self, graph: &SceneGraph, root: NodeId) {
        let analysis = HierarchyLane.analyze(graph, root);
        self.plan = self.explosion_lane.plan(graph, root, analysis.layers());
        self.targets = self.plan.targets(self.config.explosion_distance);
        self.clear_progress();

        log::info!(
            "DisassemblyAgent: loaded model {root} with {} layer(s), {} node(s), strategy {}",
            analysis.layer_count(),
            analysis.originals().len(),
            self.explosion_lane.strategy_name(),
        );
        self.analysis = Some(analysis);
    }

    /// Forgets the loaded model. The graph is not touched.
    pub fn unload_model(&mut self) {
        if let Some(analysis) = self.analysis.take() {
            log::info!("DisassemblyAgent: unloaded model {}", analysis.root());
        }
        self.plan = ExplosionPlan::default();
        self.targets = DisassemblyTargets::default();
        self.clear_progress();
    }

    fn clear_progress(&mut self) {
        self.current_layer = 0;
        self.undo.clear();
        self.animation = None;
        self.pending_chain = None;
    }

    // --- Commands ---

    /// Explodes the next layer. Returns `false` while animating or when every
    /// layer is already exploded.
    pub fn disassemble_next(&mut self, graph: &mut SceneGraph, now: Instant) -> bool {
        self.pending_chain = None;
        self.start_disassemble(graph, now)
    }

    /// Brings the last exploded layer back. Returns `false` while animating or
    /// when nothing is exploded.
    pub fn reassemble_previous(&mut self, graph: &mut SceneGraph, now: Instant) -> bool {
        self.pending_chain = None;
        self.start_reassemble(graph, now)
    }

    /// Animates every node back to its original position at once.
    ///
    /// The layer counter and undo stack are cleared immediately; the graph
    /// reaches the assembled pose when the animation ends.
    pub fn assemble_all(&mut self, graph: &mut SceneGraph, now: Instant) -> bool {
        self.pending_chain = None;
        if self.is_animating() {
            log::trace!("DisassemblyAgent: assemble-all ignored, animation in flight");
            return false;
        }
        if self.current_layer == 0 {
            log::trace!("DisassemblyAgent: assemble-all ignored, already assembled");
            return false;
        }
        let Some(analysis) = &self.analysis else {
            return false;
        };

        let root = analysis.root();
        let tracks: Vec<PositionTrack> = analysis
            .originals()
            .iter()
            .filter(|(id, _)| *id != root)
            .filter_map(|(id, original)| {
                graph
                    .transform(id)
                    .map(|t| PositionTrack::new(id, t.translation, original.translation))
            })
            .collect();

        log::debug!(
            "DisassemblyAgent: assembling {} node(s) from layer {}",
            tracks.len(),
            self.current_layer
        );
        self.undo.clear();
        self.current_layer = 0;
        self.start_animation(AnimationKind::Assemble, now, self.config.assemble_duration(), tracks);
        true
    }

    /// Cancels any animation or chained step and writes every original
    /// transform back. Always succeeds.
    pub fn reset(&mut self, graph: &mut SceneGraph) {
        let mut restored = 0;
        if let Some(analysis) = &self.analysis {
            for (id, original) in analysis.originals().iter() {
                if let Some(transform) = graph.transform_mut(id) {
                    *transform = *original;
                    restored += 1;
                }
            }
        }
        self.clear_progress();
        log::info!("DisassemblyAgent: reset, restored {restored} node(s)");
    }

    /// Dispatches a command. `Reset` always reports `true`.
    pub fn handle_command(
        &mut self,
        command: DisassemblyCommand,
        graph: &mut SceneGraph,
        now: Instant,
    ) -> bool {
        match command {
            DisassemblyCommand::DisassembleNext => self.disassemble_next(graph, now),
            DisassemblyCommand::ReassemblePrevious => self.reassemble_previous(graph, now),
            DisassemblyCommand::AssembleAll => self.assemble_all(graph, now),
            DisassemblyCommand::Reset => {
                self.reset(graph);
                true
            }
        }
    }

    /// Maps a key code through the configured bindings and dispatches it.
    /// Unbound keys return `false`.
    pub fn handle_key(&mut self, key_code: &str, graph: &mut SceneGraph, now: Instant) -> bool {
        match self.config.key_bindings.command_for(key_code) {
            Some(command) => {
                log::debug!("DisassemblyAgent: {key_code} -> {command}");
                self.handle_command(command, graph, now)
            }
            None => {
                log::trace!("DisassemblyAgent: unbound key {key_code}");
                false
            }
        }
    }

    // --- Frame update ---

    /// Advances the running animation and issues a due chained step.
    ///
    /// Does nothing when idle. The frame on which progress reaches 1 writes
    /// the exact target positions and ends the animation.
    pub fn tick(&mut self, graph: &mut SceneGraph, now: Instant) {
        if let Some(record) = &self.animation {
            let progress = record.progress(now);
            let finished = progress >= 1.0;
            let eased = if finished {
                1.0
            } else {
                self.config.easing.apply(progress)
            };
            apply_tracks(graph, &record.tracks, eased);
            log::trace!(
                "DisassemblyAgent: {} at {:.3} (eased {:.3})",
                record.kind,
                progress,
                eased
            );

            if finished {
                let kind = record.kind;
                self.animation = None;
                self.on_animation_finished(kind, now);
            }
            return;
        }

        if let Some(pending) = self.pending_chain {
            if now >= pending.due {
                self.pending_chain = None;
                let started = match pending.command {
                    DisassemblyCommand::DisassembleNext => self.start_disassemble(graph, now),
                    DisassemblyCommand::ReassemblePrevious => self.start_reassemble(graph, now),
                    _ => false,
                };
                log::debug!(
                    "DisassemblyAgent: chained {} {}",
                    pending.command,
                    if started { "started" } else { "skipped" }
                );
            }
        }
    }

    fn on_animation_finished(&mut self, kind: AnimationKind, now: Instant) {
        log::debug!(
            "DisassemblyAgent: {kind} finished at layer {}/{}",
            self.current_layer,
            self.layer_count()
        );
        if !self.config.auto_continue {
            return;
        }
        let next = match kind {
            AnimationKind::Disassemble if self.current_layer < self.layer_count() => {
                Some(DisassemblyCommand::DisassembleNext)
            }
            AnimationKind::Reassemble if self.current_layer > 0 => {
                Some(DisassemblyCommand::ReassemblePrevious)
            }
            _ => None,
        };
        self.pending_chain = next.map(|command| PendingChain {
            command,
            due: now + self.config.chain_delay(),
        });
    }

    fn start_disassemble(&mut self, graph: &SceneGraph, now: Instant) -> bool {
        if self.is_animating() {
            log::trace!("DisassemblyAgent: disassemble ignored, animation in flight");
            return false;
        }
        let Some(layer) = self.layers().get(self.current_layer) else {
            log::trace!("DisassemblyAgent: disassemble ignored, no layer left");
            return false;
        };

        let mut saved = Vec::with_capacity(layer.len());
        let mut tracks = Vec::with_capacity(layer.len());
        for &node in layer.iter() {
            let (Some(transform), Some(target)) = (graph.transform(node), self.targets.get(node))
            else {
                continue;
            };
            saved.push((node, transform.translation));
            tracks.push(PositionTrack::new(node, transform.translation, target));
        }

        log::debug!(
            "DisassemblyAgent: disassembling layer {} ({} node(s))",
            self.current_layer,
            tracks.len()
        );
        self.undo.push(LayerSnapshot::new(saved));
        self.current_layer += 1;
        self.start_animation(
            AnimationKind::Disassemble,
            now,
            self.config.disassemble_duration(),
            tracks,
        );
        true
    }

    fn start_reassemble(&mut self, graph: &SceneGraph, now: Instant) -> bool {
        if self.is_animating() {
            log::trace!("DisassemblyAgent: reassemble ignored, animation in flight");
            return false;
        }
        if self.current_layer == 0 {
            log::trace!("DisassemblyAgent: reassemble ignored, already assembled");
            return false;
        }
        let Some(snapshot) = self.undo.pop() else {
            log::trace!("DisassemblyAgent: reassemble ignored, undo stack empty");
            return false;
        };

        let tracks: Vec<PositionTrack> = snapshot
            .positions()
            .iter()
            .filter_map(|&(node, saved)| {
                graph
                    .transform(node)
                    .map(|t| PositionTrack::new(node, t.translation, saved))
            })
            .collect();

        self.current_layer -= 1;
        log::debug!(
            "DisassemblyAgent: reassembling layer {} ({} node(s))",
            self.current_layer,
            tracks.len()
        );
        self.start_animation(
            AnimationKind::Reassemble,
            now,
            self.config.reassemble_duration(),
            tracks,
        );
        true
    }

    fn start_animation(
        &mut self,
        kind: AnimationKind,
        now: Instant,
        duration: Duration,
        tracks: Vec<PositionTrack>,
    ) {
        self.animation = Some(AnimationRecord {
            kind,
            started: now,
            duration,
            tracks,
        });
    }

    // --- Configuration ---

    /// Changes the explosion distance and re-derives every target.
    ///
    /// Layers already exploded keep their current positions and undo
    /// snapshots; the new distance applies from the next disassemble step.
    pub fn set_explosion_distance(&mut self, distance: f32) -> Result<(), ConfigError> {
        validate_explosion_distance(distance)?;
        self.config.explosion_distance = distance;
        self.targets = self.plan.targets(distance);
        log::info!("DisassemblyAgent: explosion distance set to {distance}");
        Ok(())
    }

    /// Turns chaining on or off. Turning it off drops a pending step.
    pub fn set_auto_continue(&mut self, enabled: bool) {
        self.config.auto_continue = enabled;
        if !enabled {
            self.pending_chain = None;
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DisassemblyConfig {
        &self.config
    }

    // --- Queries ---

    /// A snapshot of the agent's progress.
    pub fn status(&self) -> DisassemblyStatus {
        DisassemblyStatus::new(self.current_layer, self.layer_count(), self.is_animating())
    }

    /// Number of exploded layers.
    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    /// Number of layers of the loaded model.
    pub fn layer_count(&self) -> usize {
        self.layers().len()
    }

    /// `true` while an animation is in flight. A pending chained step does
    /// not count.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// `true` while a chained step waits for its delay.
    pub fn has_pending_chain(&self) -> bool {
        self.pending_chain.is_some()
    }

    /// The running animation, if any.
    pub fn animation(&self) -> Option<&AnimationRecord> {
        self.animation.as_ref()
    }

    /// The undo stack. Its depth always equals [`Self::current_layer`].
    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    /// The layers of the loaded model.
    pub fn layers(&self) -> &[Layer] {
        self.analysis
            .as_ref()
            .map(HierarchyAnalysis::layers)
            .unwrap_or(&[])
    }

    /// Targets at the current explosion distance.
    pub fn targets(&self) -> &DisassemblyTargets {
        &self.targets
    }

    /// Transforms captured when the model was loaded.
    pub fn originals(&self) -> Option<&OriginalTransforms> {
        self.analysis.as_ref().map(HierarchyAnalysis::originals)
    }
}
