//! Minimal tick loop: a zero policy commands the nominal standing pose.
//!
//! Run with `cargo run -p ambler-control --example stand_still`.

use ambler_control::prelude::*;
use ambler_core::config::ControllerConfig;
use ambler_core::msgs::{FootForces, SensorSnapshot, VelocityGoal};
use ambler_core::types::JOINT_COUNT;
use ambler_policy::prelude::*;

fn main() {
    let config = ControllerConfig::default();
    let mut controller =
        NeuralController::new(config, Box::new(ZeroPolicy::new(JOINT_COUNT)))
            .expect("default config is valid");

    let goal = VelocityGoal::default();
    let mut snapshot = SensorSnapshot::default();
    snapshot.foot_force = FootForces {
        front_right: 80,
        front_left: 80,
        rear_right: 80,
        rear_left: 80,
    };

    for tick in 0..5 {
        snapshot.tick_us = tick * 20_000; // 50 Hz
        let out = controller
            .step(&goal, &snapshot)
            .expect("tick failed");
        println!(
            "tick {tick}: targets[0..3] = {:?}, kp = {}, kd = {}",
            &out.command.targets[0..3],
            out.command.kp,
            out.command.kd
        );
    }
    println!("policy: {}", controller.policy_name());
}
