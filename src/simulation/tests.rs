use super::*;
use crate::solver::{SolverConfig, ThermalConfig};

fn quiet_config() -> SolverConfig {
    // Thermal coupling off so motion assertions only see gravity.
    SolverConfig {
        thermal: ThermalConfig {
            convection_rate: 0.0,
            floor_heat_min: 0.0,
            floor_heat_max: 0.0,
            cooling_rate: 0.0,
            ..ThermalConfig::default()
        },
        ..SolverConfig::default()
    }
}

#[test]
fn from_config_json_builds_and_rejects() {
    let ok = r#"{ "gravity": { "x": 0.0, "y": 800.0 }, "substeps": 3 }"#;
    assert!(SimulationCore::from_config_json(ok).is_ok());
    let bad = r#"{ "gravity": { "x": 0.0, "y": 800.0 }, "substeps": 0 }"#;
    assert!(SimulationCore::from_config_json(bad).is_err());
    // Gravity has no default.
    assert!(SimulationCore::from_config_json("{}").is_err());
    assert!(SimulationCore::from_config_json("{").is_err());
}

#[test]
fn step_advances_frame_and_moves_particles() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_emitted(0.0);
    let y0 = sim.particles()[0].position.y;
    for _ in 0..10 {
        sim.step();
    }
    assert_eq!(sim.frame(), 10);
    assert_ne!(sim.particles()[0].position.y, y0);
}

#[test]
fn advance_runs_whole_fixed_ticks_and_banks_remainder() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_emitted(0.0);
    let dt = sim.dt() as f64;
    // 2.5 ticks worth of time: 2 ticks now, half a tick banked.
    assert_eq!(sim.advance(dt * 2.5), 2);
    assert_eq!(sim.frame(), 2);
    // The banked half tick completes with another half.
    assert_eq!(sim.advance(dt * 0.5), 1);
    assert_eq!(sim.frame(), 3);
}

#[test]
fn advance_clamps_oversized_elapsed_time() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_emitted(0.0);
    // A minute of "background tab" time must not replay a minute of ticks.
    let ticks = sim.advance(60.0);
    assert!(ticks as f64 <= 0.25 / sim.dt() as f64 + 1.0);
}

#[test]
fn spawn_chain_creates_static_endpoints_and_links() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_chain(Vec2::new(400.0, 500.0), Vec2::new(600.0, 500.0), 21, 16.0)
        .unwrap();
    assert_eq!(sim.particle_count(), 21);
    assert_eq!(sim.link_count(), 20);
    assert!(sim.particles()[0].is_static);
    assert!(sim.particles()[20].is_static);
    assert!(sim.particles()[1..20].iter().all(|p| !p.is_static));
}

#[test]
fn chain_endpoints_hold_under_gravity() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    let from = Vec2::new(300.0, 400.0);
    let to = Vec2::new(500.0, 400.0);
    sim.spawn_chain(from, to, 11, 22.0).unwrap();
    for _ in 0..120 {
        sim.step();
    }
    assert_eq!(sim.particles()[0].position, from);
    assert_eq!(sim.particles()[10].position, to);
    // The middle sags below the endpoints.
    assert!(sim.particles()[5].position.y > 400.0);
}

#[test]
fn spawn_chain_rejects_degenerate_count() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    assert!(sim.spawn_chain(Vec2::zero(), Vec2::new(10.0, 0.0), 1, 16.0).is_err());
}

#[test]
fn add_link_checks_bounds() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_random();
    sim.spawn_random();
    assert!(sim.add_link(0, 1, 16.0).is_ok());
    assert!(sim.add_link(0, 5, 16.0).is_err());
    assert!(sim.add_link(0, 0, 16.0).is_err());
}

#[test]
fn clear_resets_the_scene() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    for _ in 0..10 {
        sim.spawn_random();
    }
    sim.add_link(0, 1, 16.0).unwrap();
    sim.step();
    sim.clear();
    assert_eq!(sim.particle_count(), 0);
    assert_eq!(sim.link_count(), 0);
    assert_eq!(sim.frame(), 0);
}

#[test]
fn render_buffers_mirror_particle_state() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    for i in 0..5 {
        sim.spawn_emitted(i as f64 * 0.1);
    }
    let count = sim.sync_render_buffers();
    assert_eq!(count, 5);
    assert_eq!(sim.positions_len(), 10);
    assert_eq!(sim.radii_len(), 5);
    assert_eq!(sim.colors_len(), 5);
    assert_eq!(sim.temperatures_len(), 5);

    let p0 = sim.particles()[0];
    let positions =
        unsafe { std::slice::from_raw_parts(sim.positions_ptr(), sim.positions_len()) };
    assert_eq!(positions[0], p0.position.x);
    assert_eq!(positions[1], p0.position.y);
    let colors = unsafe { std::slice::from_raw_parts(sim.colors_ptr(), sim.colors_len()) };
    assert_eq!(colors[0], p0.color);
}

#[test]
fn emitter_anchor_comes_from_config() {
    let config = SolverConfig {
        emitter_position: Vec2::new(50.0, 60.0),
        ..quiet_config()
    };
    let mut sim = SimulationCore::new(config).unwrap();
    sim.spawn_emitted(0.0);
    assert_eq!(sim.particles()[0].position, Vec2::new(50.0, 60.0));

    let json = r#"{ "gravity": { "x": 0.0, "y": 800.0 },
                    "emitter_position": { "x": 10.0, "y": 20.0 } }"#;
    let mut sim = SimulationCore::from_config_json(json).unwrap();
    sim.spawn_emitted(0.0);
    assert_eq!(sim.particles()[0].position, Vec2::new(10.0, 20.0));
}

#[test]
fn perf_stats_stay_zero_while_disabled() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.spawn_random();
    sim.step();
    let stats = sim.get_perf_stats();
    assert_eq!(stats.step_ms, 0.0);
    assert_eq!(stats.particle_count, 0);
}

#[test]
fn perf_stats_populate_when_enabled() {
    let mut sim = SimulationCore::new(quiet_config()).unwrap();
    sim.enable_perf_metrics(true);
    for _ in 0..20 {
        sim.spawn_random();
    }
    sim.step();
    let stats = sim.get_perf_stats();
    assert!(stats.step_ms >= 0.0);
    assert_eq!(stats.particle_count, 20);
}

#[test]
fn same_seed_simulations_agree() {
    let run = |seed: u32| {
        let mut sim = SimulationCore::with_seed(SolverConfig::default(), seed).unwrap();
        for i in 0..30 {
            sim.spawn_emitted(i as f64 / 60.0);
            sim.step();
        }
        sim.particles()
            .iter()
            .map(|p| (p.position.x, p.position.y, p.temperature))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(7), run(7));
}
