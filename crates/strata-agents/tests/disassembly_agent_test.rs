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

use std::collections::HashMap;
use std::time::{Duration, Instant};

use approx::assert_abs_diff_eq;
use strata_agents::disassembly_agent::AnimationKind;
use strata_agents::{ConfigError, DisassemblyAgent, DisassemblyConfig};
use strata_core::lane::{Lane, LaneKind};
use strata_core::math::{Aabb, Mat4, Vec3};
use strata_core::scene::{NodeId, NodeKind, SceneGraph, Transform};
use strata_lanes::explosion_lane::{ExplosionLane, LayerPlan, NodeDisplacement};
use strata_lanes::hierarchy_lane::Layer;

// --- FIXTURE ---

struct Model {
    graph: SceneGraph,
    root: NodeId,
    a: NodeId,
    b: NodeId,
    a1: NodeId,
    a2: NodeId,
    b1: NodeId,
    b2: NodeId,
}

impl Model {
    fn pos(&self, id: NodeId) -> Vec3 {
        self.graph.transform(id).unwrap().translation
    }

    fn all(&self) -> [NodeId; 7] {
        [self.root, self.a, self.b, self.a1, self.a2, self.b1, self.b2]
    }

    fn positions(&self) -> Vec<Vec3> {
        self.all().iter().map(|&id| self.pos(id)).collect()
    }
}

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

/// R holds groups A and B; each group holds two unit-cube leaves.
fn model() -> Model {
    let leaf = NodeKind::leaf(Aabb::from_min_max(
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, 0.5),
    ));
    let mut graph = SceneGraph::new();
    let root = graph.spawn_root("R", NodeKind::Group, Transform::identity());
    let a = graph.spawn_child(root, "A", NodeKind::Group, at(-2.0, 0.0, 0.0)).unwrap();
    let b = graph.spawn_child(root, "B", NodeKind::Group, at(2.0, 0.0, 0.0)).unwrap();
    let a1 = graph.spawn_child(a, "A1", leaf, at(0.0, 0.0, 1.0)).unwrap();
    let a2 = graph.spawn_child(a, "A2", leaf, at(0.0, 0.0, -1.0)).unwrap();
    let b1 = graph.spawn_child(b, "B1", leaf, at(0.0, 1.0, 0.0)).unwrap();
    let b2 = graph.spawn_child(b, "B2", leaf, at(0.0, -1.0, 0.0)).unwrap();
    Model {
        graph,
        root,
        a,
        b,
        a1,
        a2,
        b1,
        b2,
    }
}

fn config(distance: f32) -> DisassemblyConfig {
    DisassemblyConfig {
        explosion_distance: distance,
        ..DisassemblyConfig::default()
    }
}

fn loaded(m: &Model, config: DisassemblyConfig) -> DisassemblyAgent {
    let mut agent = DisassemblyAgent::new(config).unwrap();
    agent.load_model(&m.graph, m.root);
    agent
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn assert_undo_matches_layer(agent: &DisassemblyAgent) {
    assert_eq!(agent.undo_stack().len(), agent.current_layer());
}

// --- SCENARIOS ---

#[test]
fn test_full_round_trip_of_two_group_model() {
    // --- 1. ARRANGE ---
    let mut m = model();
    let original = m.positions();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();
    assert_eq!(agent.layer_count(), 2);
    assert_eq!(agent.layers()[0], Layer::from(vec![m.a, m.b]));

    // --- 2. ACT & ASSERT: first layer ---
    assert!(agent.disassemble_next(&mut m.graph, t0));
    assert!(agent.is_animating());
    assert_eq!(agent.current_layer(), 1);
    assert_undo_matches_layer(&agent);

    agent.tick(&mut m.graph, t0 + ms(600));
    // Quintic easing is exactly one half at the midpoint.
    assert_abs_diff_eq!(m.pos(m.a), Vec3::new(-2.5, 0.0, 0.0));
    assert!(agent.is_animating());

    agent.tick(&mut m.graph, t0 + ms(1200));
    assert!(!agent.is_animating());
    assert_eq!(m.pos(m.a), Vec3::new(-3.0, 0.0, 0.0));
    assert_eq!(m.pos(m.b), Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(m.pos(m.a1), Vec3::new(0.0, 0.0, 1.0));

    // --- second layer ---
    let t1 = t0 + ms(2000);
    assert!(agent.disassemble_next(&mut m.graph, t1));
    agent.tick(&mut m.graph, t1 + ms(1200));
    assert_eq!(agent.current_layer(), 2);
    assert_undo_matches_layer(&agent);
    assert_abs_diff_eq!(m.pos(m.a1), Vec3::new(0.0, 0.0, 2.0));
    assert_abs_diff_eq!(m.pos(m.a2), Vec3::new(0.0, 0.0, -2.0));
    assert_abs_diff_eq!(m.pos(m.b1), Vec3::new(0.0, 2.0, 0.0));
    assert_abs_diff_eq!(m.pos(m.b2), Vec3::new(0.0, -2.0, 0.0));
    for &id in &[m.a1, m.a2, m.b1, m.b2] {
        let moved = m.pos(id).distance(original_of(&agent, id));
        assert_abs_diff_eq!(moved, 1.0, epsilon = 1e-6);
    }
    assert!(agent.status().is_fully_disassembled);

    // --- back to the start ---
    let t2 = t1 + ms(2000);
    assert!(!agent.disassemble_next(&mut m.graph, t2));
    assert!(agent.reassemble_previous(&mut m.graph, t2));
    assert_undo_matches_layer(&agent);
    agent.tick(&mut m.graph, t2 + ms(1000));
    assert_eq!(agent.current_layer(), 1);
    assert_eq!(m.pos(m.a1), Vec3::new(0.0, 0.0, 1.0));

    let t3 = t2 + ms(2000);
    assert!(agent.reassemble_previous(&mut m.graph, t3));
    agent.tick(&mut m.graph, t3 + ms(1000));

    // --- 3. ASSERT ---
    assert_eq!(agent.current_layer(), 0);
    assert!(agent.undo_stack().is_empty());
    assert_eq!(m.positions(), original);
    assert!(agent.status().is_fully_assembled);
}

fn original_of(agent: &DisassemblyAgent, id: NodeId) -> Vec3 {
    agent.originals().unwrap().get(id).unwrap().translation
}

#[test]
fn test_undo_snapshot_holds_pre_step_positions() {
    let mut m = model();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();

    agent.disassemble_next(&mut m.graph, t0);

    let snapshot = agent.undo_stack().peek().unwrap();
    assert_eq!(snapshot.positions().len(), 2);
    assert_eq!(snapshot.get(m.a), Some(Vec3::new(-2.0, 0.0, 0.0)));
    assert_eq!(snapshot.get(m.a1), None);
}

#[test]
fn test_commands_are_rejected_while_animating() {
    let mut m = model();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();

    assert!(agent.disassemble_next(&mut m.graph, t0));
    agent.tick(&mut m.graph, t0 + ms(100));

    assert!(!agent.disassemble_next(&mut m.graph, t0 + ms(100)));
    assert!(!agent.reassemble_previous(&mut m.graph, t0 + ms(100)));
    assert!(!agent.assemble_all(&mut m.graph, t0 + ms(100)));
    assert_eq!(agent.current_layer(), 1);
    assert_undo_matches_layer(&agent);
    let status = agent.status();
    assert!(status.is_animating);
    assert!(!status.can_disassemble);
    assert!(!status.can_reassemble);
}

#[test]
fn test_reassemble_at_start_is_noop() {
    let mut m = model();
    let before = m.positions();
    let mut agent = loaded(&m, config(1.0));

    assert!(!agent.reassemble_previous(&mut m.graph, Instant::now()));
    assert!(!agent.assemble_all(&mut m.graph, Instant::now()));

    assert!(!agent.is_animating());
    assert_eq!(agent.current_layer(), 0);
    assert_eq!(m.positions(), before);
}

#[test]
fn test_tick_when_idle_changes_nothing() {
    let mut m = model();
    let before = m.positions();
    let mut agent = loaded(&m, config(1.0));

    agent.tick(&mut m.graph, Instant::now() + ms(5000));

    assert_eq!(m.positions(), before);
}

#[test]
fn test_reset_mid_animation_restores_originals() {
    // --- 1. ARRANGE ---
    let mut m = model();
    let original = m.positions();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));
    agent.disassemble_next(&mut m.graph, t0 + ms(1300));
    agent.tick(&mut m.graph, t0 + ms(1700));

    // --- 2. ACT ---
    agent.reset(&mut m.graph);

    // --- 3. ASSERT ---
    assert_eq!(m.positions(), original);
    assert_eq!(agent.current_layer(), 0);
    assert!(!agent.is_animating());
    assert!(agent.undo_stack().is_empty());

    // A late tick must not resume the cancelled animation.
    agent.tick(&mut m.graph, t0 + ms(2000));
    assert_eq!(m.positions(), original);

    agent.reset(&mut m.graph);
    assert_eq!(m.positions(), original);
}

#[test]
fn test_reset_restores_rotation_and_scale() {
    let mut m = model();
    let original = *m.graph.transform(m.b1).unwrap();
    let mut agent = loaded(&m, config(1.0));
    if let Some(t) = m.graph.transform_mut(m.b1) {
        t.scale = Vec3::new(3.0, 3.0, 3.0);
        t.translation = Vec3::new(9.0, 9.0, 9.0);
    }

    agent.reset(&mut m.graph);

    assert_eq!(*m.graph.transform(m.b1).unwrap(), original);
}

#[test]
fn test_despawned_node_is_skipped() {
    // --- 1. ARRANGE ---
    let mut m = model();
    let mut agent = loaded(&m, config(1.0));
    m.graph.despawn(m.a1);
    let t0 = Instant::now();

    // --- 2. ACT ---
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));
    agent.disassemble_next(&mut m.graph, t0 + ms(1300));
    let second = agent.animation().unwrap().tracks().len();
    agent.tick(&mut m.graph, t0 + ms(2500));
    agent.reassemble_previous(&mut m.graph, t0 + ms(2600));
    agent.tick(&mut m.graph, t0 + ms(3600));
    agent.reset(&mut m.graph);

    // --- 3. ASSERT ---
    assert_eq!(second, 3);
    assert_eq!(agent.current_layer(), 0);
    assert_eq!(m.pos(m.a2), Vec3::new(0.0, 0.0, -1.0));
    assert!(!m.graph.contains(m.a1));
}

#[test]
fn test_missing_root_loads_empty_model() {
    let mut m = model();
    let ghost = m.root;
    m.graph.despawn(ghost);
    let mut agent = DisassemblyAgent::default();

    agent.load_model(&m.graph, ghost);

    assert_eq!(agent.layer_count(), 0);
    assert!(agent.targets().is_empty());
    assert!(!agent.disassemble_next(&mut m.graph, Instant::now()));
    let status = agent.status();
    assert!(status.is_fully_assembled);
    assert!(!status.is_fully_disassembled);
}

#[test]
fn test_unload_forgets_model() {
    let mut m = model();
    let mut agent = loaded(&m, config(1.0));
    agent.disassemble_next(&mut m.graph, Instant::now());

    agent.unload_model();

    assert_eq!(agent.layer_count(), 0);
    assert_eq!(agent.current_layer(), 0);
    assert!(agent.originals().is_none());
    assert!(!agent.is_animating());
}

#[test]
fn test_assemble_all_returns_every_layer_home() {
    // --- 1. ARRANGE ---
    let mut m = model();
    let original = m.positions();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));
    agent.disassemble_next(&mut m.graph, t0 + ms(1200));
    agent.tick(&mut m.graph, t0 + ms(2400));

    // --- 2. ACT ---
    let t1 = t0 + ms(3000);
    assert!(agent.assemble_all(&mut m.graph, t1));

    // --- 3. ASSERT ---
    assert_eq!(agent.current_layer(), 0);
    assert_undo_matches_layer(&agent);
    assert_eq!(agent.animation().unwrap().kind(), AnimationKind::Assemble);

    agent.tick(&mut m.graph, t1 + ms(750));
    assert_ne!(m.positions(), original);

    agent.tick(&mut m.graph, t1 + ms(1500));
    assert!(!agent.is_animating());
    assert_eq!(m.positions(), original);
}

#[test]
fn test_zero_duration_completes_on_first_tick() {
    let mut m = model();
    let mut agent = loaded(
        &m,
        DisassemblyConfig {
            disassemble_duration_ms: 0,
            ..config(1.0)
        },
    );
    let t0 = Instant::now();

    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0);

    assert!(!agent.is_animating());
    assert_eq!(m.pos(m.b), Vec3::new(3.0, 0.0, 0.0));
}

// --- CHAINING ---

fn chaining_config() -> DisassemblyConfig {
    DisassemblyConfig {
        auto_continue: true,
        ..config(1.0)
    }
}

#[test]
fn test_chain_runs_every_layer_after_delay() {
    // --- 1. ARRANGE ---
    let mut m = model();
    let mut agent = loaded(&m, chaining_config());
    let t0 = Instant::now();

    // --- 2. ACT ---
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));

    // --- 3. ASSERT ---
    assert!(!agent.is_animating());
    assert!(agent.has_pending_chain());

    agent.tick(&mut m.graph, t0 + ms(1300));
    assert_eq!(agent.current_layer(), 1);
    assert!(agent.has_pending_chain());

    agent.tick(&mut m.graph, t0 + ms(1500));
    assert_eq!(agent.current_layer(), 2);
    assert!(agent.is_animating());
    assert!(!agent.has_pending_chain());

    agent.tick(&mut m.graph, t0 + ms(2700));
    assert!(!agent.is_animating());
    assert!(!agent.has_pending_chain());
    assert!(agent.status().is_fully_disassembled);
}

#[test]
fn test_chain_also_runs_backwards() {
    let mut m = model();
    let original = m.positions();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));
    agent.disassemble_next(&mut m.graph, t0 + ms(1200));
    agent.tick(&mut m.graph, t0 + ms(2400));
    agent.set_auto_continue(true);

    let t1 = t0 + ms(3000);
    agent.reassemble_previous(&mut m.graph, t1);
    agent.tick(&mut m.graph, t1 + ms(1000));
    agent.tick(&mut m.graph, t1 + ms(1300));
    agent.tick(&mut m.graph, t1 + ms(2300));

    assert_eq!(agent.current_layer(), 0);
    assert!(!agent.has_pending_chain());
    assert_eq!(m.positions(), original);
}

#[test]
fn test_explicit_command_cancels_pending_chain() {
    let mut m = model();
    let mut agent = loaded(&m, chaining_config());
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));
    assert!(agent.has_pending_chain());

    assert!(agent.reassemble_previous(&mut m.graph, t0 + ms(1250)));
    assert!(!agent.has_pending_chain());
    agent.tick(&mut m.graph, t0 + ms(2250));

    assert_eq!(agent.current_layer(), 0);
    assert!(!agent.has_pending_chain());
}

#[test]
fn test_reset_cancels_pending_chain() {
    let mut m = model();
    let mut agent = loaded(&m, chaining_config());
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));

    agent.reset(&mut m.graph);
    agent.tick(&mut m.graph, t0 + ms(5000));

    assert_eq!(agent.current_layer(), 0);
    assert!(!agent.is_animating());
}

// --- CONFIGURATION & INPUT ---

#[test]
fn test_explosion_distance_retargets_future_steps() {
    let mut m = model();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();
    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));

    agent.set_explosion_distance(2.5).unwrap();
    agent.disassemble_next(&mut m.graph, t0 + ms(1200));
    agent.tick(&mut m.graph, t0 + ms(2400));

    // The first layer stays where it went.
    assert_eq!(m.pos(m.a), Vec3::new(-3.0, 0.0, 0.0));
    assert_abs_diff_eq!(m.pos(m.b1), Vec3::new(0.0, 3.5, 0.0));
    assert_eq!(agent.targets().distance(), 2.5);
    assert_eq!(agent.config().explosion_distance, 2.5);
    assert_eq!(
        agent.undo_stack().peek().unwrap().get(m.b1),
        Some(Vec3::new(0.0, 1.0, 0.0))
    );
}

#[test]
fn test_invalid_explosion_distance_is_rejected() {
    let m = model();
    let mut agent = loaded(&m, config(1.0));

    let err = agent.set_explosion_distance(-0.5).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    assert_eq!(agent.targets().distance(), 1.0);
    assert!(agent.set_explosion_distance(f32::NAN).is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = DisassemblyAgent::new(config(f32::INFINITY));
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_key_bindings_drive_commands() {
    let mut m = model();
    let original = m.positions();
    let mut agent = loaded(&m, config(1.0));
    let t0 = Instant::now();

    assert!(agent.handle_key("KeyE", &mut m.graph, t0));
    assert!(!agent.handle_key("KeyZ", &mut m.graph, t0));
    agent.tick(&mut m.graph, t0 + ms(1200));
    assert_eq!(agent.current_layer(), 1);

    assert!(agent.handle_key("KeyQ", &mut m.graph, t0 + ms(1200)));
    agent.tick(&mut m.graph, t0 + ms(1400));
    assert!(agent.handle_key("KeyR", &mut m.graph, t0 + ms(1400)));

    assert_eq!(agent.current_layer(), 0);
    assert_eq!(m.positions(), original);
}

// --- CUSTOM STRATEGY ---

/// Lifts every node straight up, ignoring geometry.
struct LiftLane;

impl Lane for LiftLane {
    fn strategy_name(&self) -> &'static str {
        "Lift"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Explosion
    }
}

impl ExplosionLane for LiftLane {
    fn plan_layer(
        &self,
        graph: &SceneGraph,
        _root: NodeId,
        layer: &Layer,
        _world: &HashMap<NodeId, Mat4>,
    ) -> LayerPlan {
        LayerPlan::new(
            layer
                .iter()
                .filter_map(|&node| {
                    graph.transform(node).map(|t| NodeDisplacement {
                        node,
                        origin: t.translation,
                        direction: Vec3::Y,
                    })
                })
                .collect(),
        )
    }
}

#[test]
fn test_custom_explosion_lane() {
    let mut m = model();
    let mut agent = DisassemblyAgent::new(config(2.0))
        .unwrap()
        .with_explosion_lane(LiftLane);
    agent.load_model(&m.graph, m.root);
    let t0 = Instant::now();

    agent.disassemble_next(&mut m.graph, t0);
    agent.tick(&mut m.graph, t0 + ms(1200));

    assert_eq!(m.pos(m.a), Vec3::new(-2.0, 2.0, 0.0));
    assert_eq!(m.pos(m.b), Vec3::new(2.0, 2.0, 0.0));
}
