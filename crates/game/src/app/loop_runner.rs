use std::process::ExitCode;
use std::time::Duration;

use tracing::{info, warn};

use super::bootstrap::AppWiring;

/// Pacing knobs for the headless simulation loop.
#[derive(Debug, Clone)]
pub(crate) struct SimConfig {
    pub(crate) target_tps: u32,
    pub(crate) frame_dt: Duration,
    pub(crate) max_frame_delta: Duration,
    pub(crate) max_ticks_per_frame: u32,
    pub(crate) max_sim_seconds: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            frame_dt: Duration::from_millis(33),
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            max_sim_seconds: 120,
        }
    }
}

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    let target_tps = app.config.target_tps.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / f64::from(target_tps));
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let max_ticks_per_frame = app.config.max_ticks_per_frame.max(1);
    let tick_budget = app.config.max_sim_seconds.saturating_mul(u64::from(target_tps));

    info!(
        target_tps,
        max_ticks_per_frame,
        entity_count = app.world.entity_count(),
        "sim_loop_started"
    );

    let mut accumulator = Duration::ZERO;
    let mut ticks_run = 0u64;

    while app.sim.has_pending_movement() {
        if ticks_run >= tick_budget {
            warn!(ticks_run, "sim_budget_exhausted");
            return ExitCode::FAILURE;
        }

        let frame_dt = clamp_frame_delta(app.config.frame_dt, app.config.max_frame_delta);
        accumulator = accumulator.saturating_add(frame_dt);

        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
        for _ in 0..step_plan.ticks_to_run {
            app.sim.tick(&mut app.world, fixed_dt_seconds);
            ticks_run = ticks_run.saturating_add(1);
        }
        accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }
    }

    if let Some(player_id) = app.player_id {
        if let Some(player) = app.world.find_entity(player_id) {
            info!(
                x = player.position.x,
                y = player.position.y,
                roof_visible = app.sim.roof_visible(),
                "player_settled"
            );
        }
    }
    info!(ticks_run, "sim_loop_finished");
    ExitCode::SUCCESS
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        let dropped_backlog = accumulator;
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}
