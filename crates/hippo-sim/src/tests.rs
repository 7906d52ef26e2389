//! Scenario tests for the models running inside the headless engine.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use hippo_core::components::JointVelocityCmd;
use hippo_core::config::{RangeSensorConfig, TargetSpec, ThrusterConfig};
use hippo_core::enums::{PropellerDirection, TurningDirection};
use hippo_core::messages::{Payload, Published};
use hippo_core::types::Pose;

use crate::engine::{SimConfig, SimulationEngine};
use crate::host::WorldAccess;
use crate::range_sensor::geometry::{self, ViewLimits};
use crate::thruster::ThrusterDynamicsModel;
use crate::world_setup::{spawn_target, spawn_vehicle};

fn scenario_thruster_config(index: usize) -> ThrusterConfig {
    ThrusterConfig {
        link: format!("thruster_{index}"),
        joint: format!("thruster_joint_{index}"),
        constant_coeff: 0.0,
        linear_coeff: 0.0,
        quadratic_coeff: 1.0,
        torque_coeff: 0.1,
        rpm_scaler: 1.0,
        maximum_rpm: TAU,
        turning_direction: TurningDirection::Ccw,
        propeller_direction: PropellerDirection::Ccw,
        thruster_number: index as u32,
        ..Default::default()
    }
}

fn target(id: i32, name: &str) -> TargetSpec {
    TargetSpec {
        id,
        name: name.into(),
        link: "base_link".into(),
        active: true,
    }
}

fn ranges(published: &[Published]) -> Vec<&Published> {
    published
        .iter()
        .filter(|p| matches!(p.payload, Payload::Ranges(_)))
        .collect()
}

// ---- Thruster scenarios ----

#[test]
fn test_thruster_steady_state_one_rev_per_sec() {
    let mut model = ThrusterDynamicsModel::new(&scenario_thruster_config(0));
    model.set_velocity_setpoint(TAU);
    for _ in 0..1000 {
        model.update(0.004);
    }
    let force = model.force();
    let torque = model.torque();
    assert!((force.x - 1.0).abs() < 1e-6, "force={force:?}");
    assert_eq!(force.y, 0.0);
    assert_eq!(force.z, 0.0);
    assert!((torque.x.abs() - 0.1).abs() < 1e-7, "torque={torque:?}");
}

#[test]
fn test_thruster_6_28_rad_per_sec_just_under_one_newton() {
    let mut model = ThrusterDynamicsModel::new(&scenario_thruster_config(0));
    model.set_velocity_setpoint(6.28);
    for _ in 0..1000 {
        model.update(0.004);
    }
    let expected = (6.28 / TAU).powi(2);
    assert!(expected < 1.0);
    assert!((model.force().x - expected).abs() < 1e-9, "force={:?}", model.force());
    assert!((model.torque().x.abs() - 0.1 * expected).abs() < 1e-10);
}

#[test]
fn test_engine_thruster_pushes_vehicle_forward() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    let throttle = engine.add_thruster("boat", scenario_thruster_config(0)).unwrap();
    assert!(engine.thrusters()[0].is_resolved());

    for _ in 0..250 {
        throttle.send(1.0);
        engine.tick();
    }

    let world = engine.world();
    let prop = world.find_link("boat", "thruster_0").unwrap();
    let hull = world.find_link("boat", "base_link").unwrap();
    let force = engine.pending_wrench(prop).unwrap().force;
    let torque = engine.pending_wrench(hull).unwrap().torque;
    assert!((force - DVec3::X).length() < 1e-6, "force={force:?}");
    assert!((torque - DVec3::new(-0.1, 0.0, 0.0)).length() < 1e-7, "torque={torque:?}");
}

#[test]
fn test_two_thrusters_accumulate_on_parent() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 2);
    let a = engine.add_thruster("boat", scenario_thruster_config(0)).unwrap();
    let b = engine.add_thruster(
        "boat",
        ThrusterConfig {
            turning_direction: TurningDirection::Cw,
            propeller_direction: PropellerDirection::Cw,
            ..scenario_thruster_config(1)
        },
    ).unwrap();
    for _ in 0..250 {
        a.send(1.0);
        b.send(1.0);
        engine.tick();
    }
    let hull = engine.world().find_link("boat", "base_link").unwrap();
    // ccw/ccw: -1 * +1 * (+1) * 0.1; cw/cw: +1 * -1 * (-1) * 0.1
    let torque = engine.pending_wrench(hull).unwrap().torque;
    assert!((torque.x - (-0.1 + 0.1)).abs() < 1e-7);
}

#[test]
fn test_rotated_vehicle_rotates_wrench() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let yaw = DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2);
    spawn_vehicle(engine.world_mut(), "boat", Pose::new(DVec3::ZERO, yaw), 1);
    let throttle = engine.add_thruster("boat", scenario_thruster_config(0)).unwrap();
    for _ in 0..250 {
        throttle.send(1.0);
        engine.tick();
    }
    let prop = engine.world().find_link("boat", "thruster_0").unwrap();
    let force = engine.pending_wrench(prop).unwrap().force;
    assert!((force - DVec3::Y).length() < 1e-6, "force={force:?}");
}

#[test]
fn test_thruster_stops_when_commands_stop() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    let throttle = engine.add_thruster("boat", scenario_thruster_config(0)).unwrap();
    throttle.send(1.0);
    // 2 s without further commands, far beyond the 0.3 s timeout.
    for _ in 0..500 {
        engine.tick();
    }
    assert_eq!(throttle.setpoint(), 0.0);
    assert!(engine.thrusters()[0].dynamics().rotor_velocity().abs() < 1e-6);
}

#[test]
fn test_thruster_telemetry_rate() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    engine.add_thruster(
        "boat",
        ThrusterConfig {
            publish_rate: 50.0,
            ..scenario_thruster_config(0)
        },
    ).unwrap();
    let mut rpm = 0;
    // 1 s at 250 Hz
    for _ in 0..250 {
        rpm += engine
            .tick()
            .iter()
            .filter(|p| p.topic == "/boat/rpm_0")
            .count();
    }
    assert!((49..=51).contains(&rpm), "rpm messages: {rpm}");
}

#[test]
fn test_unresolved_thruster_is_inert() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    let throttle = engine.add_thruster(
        "boat",
        ThrusterConfig {
            link: "missing".into(),
            ..scenario_thruster_config(0)
        },
    ).unwrap();
    assert!(!engine.thrusters()[0].is_resolved());
    throttle.send(1.0);
    for _ in 0..10 {
        engine.tick();
    }
    let hull = engine.world().find_link("boat", "base_link").unwrap();
    // The joint resolved, so it is still commanded; no wrench is applied.
    assert_eq!(engine.pending_wrench(hull), None);
}

#[test]
fn test_engine_rejects_zero_rpm_scaler() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    let result = engine.add_thruster(
        "boat",
        ThrusterConfig {
            rpm_scaler: 0.0,
            ..scenario_thruster_config(0)
        },
    );
    assert!(result.is_err());
    assert!(engine.thrusters().is_empty());

    engine.tick();
    let joint = engine.world().find_joint("boat", "thruster_joint_0").unwrap();
    let cmd = engine.world().get::<&JointVelocityCmd>(joint).map(|c| c.0.clone());
    if let Ok(cmd) = cmd {
        assert!(cmd.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_engine_rejects_unrepresentable_timeout() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "boat", Pose::IDENTITY, 1);
    let result = engine.add_thruster(
        "boat",
        ThrusterConfig {
            command_timeout_secs: 1e30,
            ..scenario_thruster_config(0)
        },
    );
    assert!(result.is_err());
}

// ---- Range sensor scenarios ----

#[test]
fn test_sensor_geometry_scenario() {
    let limits = ViewLimits::from_config(&RangeSensorConfig {
        fov_angle: 90.0,
        max_viewing_angle: 140.0,
        max_detection_distance: 5.0,
        ..Default::default()
    });
    let ahead = Pose::from_translation(DVec3::new(3.0, 0.0, 0.0));
    let behind = Pose::from_translation(DVec3::new(-3.0, 0.0, 0.0));
    assert_eq!(geometry::evaluate(&Pose::IDENTITY, &ahead, &limits), Some(3.0));
    assert_eq!(geometry::evaluate(&Pose::IDENTITY, &behind, &limits), None);
}

#[test]
fn test_engine_range_batches() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "rov", Pose::IDENTITY, 0);
    spawn_target(engine.world_mut(), "buoy_ahead", DVec3::new(3.0, 0.0, 0.0));
    spawn_target(engine.world_mut(), "buoy_behind", DVec3::new(-3.0, 0.0, 0.0));
    spawn_target(engine.world_mut(), "buoy_far", DVec3::new(8.0, 0.0, 0.0));
    engine
        .add_range_sensor(
            "rov",
            RangeSensorConfig {
                drop_probability: 0.0,
                range_noise_stddev: 0.0,
                target_models: vec![
                    target(0, "buoy_ahead"),
                    target(1, "buoy_behind"),
                    target(2, "buoy_far"),
                ],
                ..Default::default()
            },
        )
        .unwrap();

    let mut batches = Vec::new();
    for _ in 0..250 {
        let published = engine.tick();
        for p in ranges(&published) {
            assert_eq!(p.topic, "/rov/ranges");
            if let Payload::Ranges(batch) = &p.payload {
                batches.push(batch.clone());
            }
        }
    }
    // 10 Hz over 1 s
    assert!((9..=11).contains(&batches.len()), "batches: {}", batches.len());
    for batch in &batches {
        let values: Vec<_> = batch.measurements.iter().map(|m| (m.id, m.range)).collect();
        assert_eq!(values, vec![(0, Some(3.0)), (1, None), (2, None)]);
    }
}

#[test]
fn test_engine_determinism_same_seed() {
    let run = |seed: u64| {
        let mut engine = SimulationEngine::new(SimConfig {
            seed,
            ..Default::default()
        });
        spawn_vehicle(engine.world_mut(), "rov", Pose::IDENTITY, 0);
        spawn_target(engine.world_mut(), "buoy", DVec3::new(4.0, 0.5, 0.0));
        engine
            .add_range_sensor(
                "rov",
                RangeSensorConfig {
                    update_rate: 0.0,
                    range_noise_stddev: 0.1,
                    drop_probability: 0.6,
                    drop_probability_exp: 1.0,
                    target_models: vec![target(0, "buoy")],
                    ..Default::default()
                },
            )
            .unwrap();
        let mut out = Vec::new();
        for _ in 0..200 {
            out.extend(engine.tick());
        }
        serde_json::to_string(&out).unwrap()
    };
    assert_eq!(run(12345), run(12345));
    assert_ne!(run(111), run(222));
}

#[test]
fn test_sensor_instances_are_uncorrelated() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "rov", Pose::IDENTITY, 0);
    spawn_target(engine.world_mut(), "buoy", DVec3::new(2.0, 0.0, 0.0));
    let config = RangeSensorConfig {
        update_rate: 0.0,
        range_noise_stddev: 0.1,
        drop_probability: 0.0,
        target_models: vec![target(0, "buoy")],
        ..Default::default()
    };
    engine.add_range_sensor("rov", config.clone()).unwrap();
    engine.add_range_sensor("rov", config).unwrap();

    let published = engine.tick();
    let values: Vec<f64> = ranges(&published)
        .iter()
        .filter_map(|p| match &p.payload {
            Payload::Ranges(batch) => batch.measurements[0].range,
            _ => None,
        })
        .collect();
    assert_eq!(values.len(), 2);
    assert_ne!(values[0], values[1]);
}

#[test]
fn test_moving_target_leaves_range() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_vehicle(engine.world_mut(), "rov", Pose::IDENTITY, 0);
    let buoy = spawn_target(engine.world_mut(), "buoy", DVec3::new(4.0, 0.0, 0.0));
    engine
        .add_range_sensor(
            "rov",
            RangeSensorConfig {
                update_rate: 0.0,
                drop_probability: 0.0,
                target_models: vec![target(0, "buoy")],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(engine.range_sensors()[0].true_range(engine.world(), 0), Some(4.0));

    engine
        .world_mut()
        .get::<&mut hippo_core::components::WorldPose>(buoy)
        .unwrap()
        .0 = Pose::from_translation(DVec3::new(6.0, 0.0, 0.0));
    assert_eq!(engine.range_sensors()[0].true_range(engine.world(), 0), None);

    engine.world_mut().despawn(buoy).unwrap();
    let published = engine.tick();
    match &ranges(&published)[0].payload {
        Payload::Ranges(batch) => assert_eq!(batch.measurements[0].range, None),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_sim_config_partial_json() {
    let config: SimConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.tick_rate, hippo_core::constants::TICK_RATE);
}
