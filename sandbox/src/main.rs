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

// Strata Sandbox
// Drives a full explode/implode cycle of a gearbox on a simulated 60 Hz clock.
//
// Usage: sandbox [config.ron]

use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use strata_agents::{DisassemblyAgent, DisassemblyCommand, DisassemblyConfig};
use strata_core::math::{Aabb, Quaternion, Vec3, FRAC_PI_2};
use strata_core::scene::{NodeId, NodeKind, SceneGraph, Transform};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES_PER_STEP: usize = 10_000;

/// A fixed-step stand-in for the render loop's clock.
struct SimClock {
    now: Instant,
    frames: u64,
}

impl SimClock {
    fn new() -> Self {
        Self {
            now: Instant::now(),
            frames: 0,
        }
    }

    fn advance(&mut self) -> Instant {
        self.now += FRAME;
        self.frames += 1;
        self.now
    }
}

fn boxed(half: Vec3) -> NodeKind {
    NodeKind::leaf(Aabb::from_min_max(-half, half))
}

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

/// Housing with two shafts carrying gears, a cover held by a pass-through
/// pivot and a bare mounting locator that never moves.
fn build_gearbox(graph: &mut SceneGraph) -> Result<NodeId> {
    let root = graph.spawn_root("gearbox", NodeKind::Group, Transform::identity());
    graph.spawn_child(root, "housing", boxed(Vec3::new(2.0, 1.0, 1.5)), Transform::identity())?;

    let input = graph.spawn_child(root, "input_shaft", NodeKind::Group, at(-0.8, 0.2, 0.0))?;
    graph.spawn_child(input, "pinion", boxed(Vec3::new(0.3, 0.3, 0.1)), at(0.0, 0.0, 0.4))?;
    graph.spawn_child(input, "input_bearing", boxed(Vec3::new(0.2, 0.2, 0.1)), at(0.0, 0.0, -0.6))?;

    let output = graph.spawn_child(
        root,
        "output_shaft",
        NodeKind::Group,
        at(0.8, -0.2, 0.0).with_rotation(Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2)),
    )?;
    graph.spawn_child(output, "crown_gear", boxed(Vec3::new(0.6, 0.6, 0.1)), at(0.3, 0.0, 0.0))?;
    graph.spawn_child(output, "output_bearing", boxed(Vec3::new(0.2, 0.2, 0.1)), at(-0.5, 0.0, 0.0))?;

    let pivot = graph.spawn_child(root, "cover_pivot", NodeKind::PassThrough, at(0.0, 1.1, 0.0))?;
    let cover = graph.spawn_child(pivot, "cover", boxed(Vec3::new(2.0, 0.1, 1.5)), Transform::identity())?;
    for (i, x) in [-1.5f32, 1.5].into_iter().enumerate() {
        graph.spawn_child(cover, format!("bolt_{i}"), boxed(Vec3::new(0.05, 0.2, 0.05)), at(x, 0.1, 0.0))?;
    }

    graph.spawn_child(root, "mount_locator", NodeKind::PassThrough, at(0.0, -1.0, 0.0))?;
    Ok(root)
}

/// Ticks until the agent has neither an animation nor a chained step left.
fn run_until_idle(agent: &mut DisassemblyAgent, graph: &mut SceneGraph, clock: &mut SimClock) -> Result<()> {
    for _ in 0..MAX_FRAMES_PER_STEP {
        if !agent.is_animating() && !agent.has_pending_chain() {
            return Ok(());
        }
        let now = clock.advance();
        agent.tick(graph, now);
    }
    anyhow::bail!("agent still busy after {MAX_FRAMES_PER_STEP} frames")
}

fn press(
    command: DisassemblyCommand,
    agent: &mut DisassemblyAgent,
    graph: &mut SceneGraph,
    clock: &mut SimClock,
) -> Result<bool> {
    let key = agent.config().key_bindings.key_for(command).to_owned();
    let accepted = agent.handle_key(&key, graph, clock.now);
    if accepted {
        run_until_idle(agent, graph, clock)?;
        log::info!("{key} ({command}): {}", agent.status());
    }
    Ok(accepted)
}

fn assert_restored(agent: &DisassemblyAgent, graph: &SceneGraph) -> Result<()> {
    let originals = agent.originals().context("no model loaded")?;
    for (id, original) in originals.iter() {
        let current = graph.transform(id).context("node vanished from the graph")?;
        ensure!(
            current.translation.distance(original.translation) < 1e-5,
            "node {id} is at {:?}, expected {:?}",
            current.translation,
            original.translation
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DisassemblyConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => DisassemblyConfig::default(),
    };
    let chaining = config.auto_continue;

    let mut graph = SceneGraph::new();
    let root = build_gearbox(&mut graph)?;
    let mut agent = DisassemblyAgent::new(config).context("invalid disassembly config")?;
    agent.load_model(&graph, root);
    let mut clock = SimClock::new();

    // Explode layer by layer. With chaining on, one press runs every layer.
    while agent.status().can_disassemble {
        press(DisassemblyCommand::DisassembleNext, &mut agent, &mut graph, &mut clock)?;
        if chaining {
            break;
        }
    }
    ensure!(agent.status().is_fully_disassembled, "gearbox did not fully explode");

    while agent.status().can_reassemble {
        press(DisassemblyCommand::ReassemblePrevious, &mut agent, &mut graph, &mut clock)?;
        if chaining {
            break;
        }
    }
    assert_restored(&agent, &graph)?;

    // Half-explode, then bring everything home at once.
    press(DisassemblyCommand::DisassembleNext, &mut agent, &mut graph, &mut clock)?;
    agent.set_explosion_distance(agent.config().explosion_distance * 2.0)?;
    if !agent.status().is_fully_disassembled {
        press(DisassemblyCommand::DisassembleNext, &mut agent, &mut graph, &mut clock)?;
    }
    press(DisassemblyCommand::AssembleAll, &mut agent, &mut graph, &mut clock)?;
    assert_restored(&agent, &graph)?;

    press(DisassemblyCommand::Reset, &mut agent, &mut graph, &mut clock)?;
    log::info!(
        "Sandbox finished after {} simulated frames ({:.1} s)",
        clock.frames,
        clock.frames as f64 * FRAME.as_secs_f64()
    );
    Ok(())
}
