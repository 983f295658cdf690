// src/main.rs

//! Demo binary: runs one full enable/confirm/disable cycle against a
//! simulated display and hardware channel.

use anyhow::{Context, Result};
use hbm_coordinator::channel::{ChannelError, HardwareModeChannel};
use hbm_coordinator::config::CONFIG;
use hbm_coordinator::coordinator::actor::CoordinatorActor;
use hbm_coordinator::display::mock::MockDisplaySource;
use hbm_coordinator::display::{DisplayId, DisplaySnapshot, PowerState};
use log::info;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Hardware channel that drives the simulated display: after a short delay
/// it ramps the refresh rate to peak (on) or back to the idle rate (off) and
/// emits a change event, mimicking asynchronous hardware confirmation.
struct SimulatedHbmChannel {
    source: Arc<MockDisplaySource>,
    idle_rate: f32,
    peak_rate: f32,
    ramp_delay: Duration,
}

impl SimulatedHbmChannel {
    fn ramp_to(&self, display: DisplayId, rate: f32) {
        let source = self.source.clone();
        let delay = self.ramp_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            info!("SimulatedHbmChannel: display {} now at {} Hz", display, rate);
            source.set_refresh_rate(display, rate);
            source.notify_changed(display);
        });
    }
}

impl HardwareModeChannel for SimulatedHbmChannel {
    fn request_on(&self, display: DisplayId) -> Result<(), ChannelError> {
        info!("SimulatedHbmChannel: mode-on requested for display {}", display);
        self.ramp_to(display, self.peak_rate);
        Ok(())
    }

    fn request_off(&self, display: DisplayId) -> Result<(), ChannelError> {
        info!("SimulatedHbmChannel: mode-off requested for display {}", display);
        self.ramp_to(display, self.idle_rate);
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting hbm-coordinator demo...");

    let sim = &CONFIG.simulation;
    let display_id = sim.display_id;
    let peak_rate = sim
        .supported_refresh_rates
        .iter()
        .copied()
        .fold(0.0, f32::max);

    let source = Arc::new(MockDisplaySource::new());
    source.add_display(
        display_id,
        DisplaySnapshot {
            power: PowerState::On,
            refresh_rate: sim.initial_refresh_rate,
            supported_refresh_rates: sim.supported_refresh_rates.clone(),
        },
    );

    let channel = Arc::new(SimulatedHbmChannel {
        source: source.clone(),
        idle_rate: sim.initial_refresh_rate,
        peak_rate,
        ramp_delay: Duration::from_millis(sim.ramp_delay_ms),
    });

    let actor = CoordinatorActor::spawn(
        display_id,
        source.clone(),
        Some(channel as Arc<dyn HardwareModeChannel>),
    )
    .context("Failed to start coordinator")?;
    let handle = actor.handle();

    let (activated_tx, activated_rx) = mpsc::channel();
    handle.enable(Some(Box::new(move || {
        let _ = activated_tx.send(());
    })))?;

    activated_rx
        .recv_timeout(Duration::from_secs(5))
        .context("Timed out waiting for mode activation")?;
    info!("Mode active; holding briefly before teardown");
    thread::sleep(Duration::from_millis(100));

    let (deactivated_tx, deactivated_rx) = mpsc::channel();
    handle.disable(Some(Box::new(move || {
        let _ = deactivated_tx.send(());
    })))?;

    deactivated_rx
        .recv_timeout(Duration::from_secs(5))
        .context("Timed out waiting for mode teardown")?;
    info!("Cycle complete, shutting down");

    drop(actor);
    Ok(())
}
