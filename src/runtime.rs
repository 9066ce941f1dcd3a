//! Live tick loop: one scheduler task owns the engine, everyone else reads
//! snapshots and sends commands.
//!
//! Commands are drained at the top of each tick, so a tick never observes a
//! half-applied toggle or trade. Published state travels as immutable `Arc`
//! snapshots over a watch channel; the ambient refresher runs on its own slow
//! cadence and can never stall the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::ambient::{self, AmbientReading};
use crate::sim::engine::{Engine, EngineSnapshot};
use crate::sim::market::TradeSide;
use crate::weather::WeatherClient;

/// A mutation request from the collaborator layer, applied between ticks.
#[derive(Debug, Clone)]
pub enum Command {
    /// Flip one device's on/off flag.
    ToggleDevice(String),
    /// Execute a trade against the carbon market.
    Trade { amount: f64, side: TradeSide },
}

/// Handle used by readers: latest snapshot plus the command queue.
#[derive(Clone)]
pub struct SimHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<EngineSnapshot>>,
}

impl SimHandle {
    /// The most recently published snapshot.
    pub fn latest(&self) -> Arc<EngineSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Queues a device toggle. Returns `false` if the scheduler is gone.
    pub fn toggle_device(&self, id: &str) -> bool {
        self.commands
            .send(Command::ToggleDevice(id.to_string()))
            .is_ok()
    }

    /// Queues a trade. Returns `false` if the scheduler is gone.
    pub fn trade(&self, amount: f64, side: TradeSide) -> bool {
        self.commands.send(Command::Trade { amount, side }).is_ok()
    }
}

/// Spawns the scheduler task (and the ambient refresher, when a weather
/// client is given) and returns the reader handle.
///
/// The scheduler stops on its own once every handle clone is dropped.
pub fn spawn(
    mut engine: Engine,
    tick_interval: Duration,
    weather: Option<WeatherClient>,
) -> (SimHandle, JoinHandle<()>) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (snap_tx, snap_rx) = watch::channel(Arc::new(engine.snapshot()));
    let (ambient_tx, mut ambient_rx) = watch::channel(engine.ambient().clone());

    if let Some(client) = weather {
        tokio::spawn(refresh_ambient(client, ambient_tx));
    } else {
        // no refresher; the engine keeps its configured ambient value
        drop(ambient_tx);
    }

    let scheduler = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(?tick_interval, "scheduler started");

        loop {
            interval.tick().await;

            // apply queued commands atomically with respect to this tick
            while let Ok(cmd) = cmd_rx.try_recv() {
                apply_command(&mut engine, cmd);
            }

            if ambient_rx.has_changed().unwrap_or(false) {
                let reading = ambient_rx.borrow_and_update().clone();
                debug!(temperature_c = reading.temperature_c, "ambient refreshed");
                engine.set_ambient(reading);
            }

            engine.step();

            if snap_tx.send(Arc::new(engine.snapshot())).is_err() {
                info!("all readers dropped, scheduler stopping");
                break;
            }
        }
    });

    (
        SimHandle {
            commands: cmd_tx,
            snapshots: snap_rx,
        },
        scheduler,
    )
}

fn apply_command(engine: &mut Engine, cmd: Command) {
    match cmd {
        Command::ToggleDevice(id) => {
            engine.toggle_device(&id);
        }
        Command::Trade { amount, side } => {
            engine.trade(amount, side);
        }
    }
}

/// Publishes a fresh ambient reading every refresh period, starting with one
/// immediate fetch. Each attempt falls back to the last published value on
/// failure.
async fn refresh_ambient(client: WeatherClient, tx: watch::Sender<AmbientReading>) {
    let mut interval =
        tokio::time::interval(Duration::from_secs(ambient::REFRESH_CADENCE_TICKS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let last_known = tx.borrow().clone();
        let next = client.fetch_or_fallback(&last_known).await;
        if tx.send(next).is_err() {
            // scheduler is gone
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceRegistry;
    use crate::sim::types::SimConfig;

    fn test_engine() -> Engine {
        Engine::new(SimConfig::new(10, 12, 42), DeviceRegistry::default_home())
    }

    #[tokio::test]
    async fn scheduler_publishes_fresh_snapshots() {
        let (handle, scheduler) = spawn(test_engine(), Duration::from_millis(5), None);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = handle.latest();
        assert!(snap.tick >= 1, "expected at least one tick, got {}", snap.tick);
        assert!(!snap.history.is_empty());
        drop(handle);
        let _ = scheduler.await;
    }

    #[tokio::test]
    async fn toggle_command_lands_before_a_following_tick() {
        let (handle, scheduler) = spawn(test_engine(), Duration::from_millis(5), None);
        assert!(handle.toggle_device("2"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = handle.latest();
        let ev = snap.devices.iter().find(|d| d.id == "2");
        assert!(ev.map(|d| d.is_on).unwrap_or(false));
        drop(handle);
        let _ = scheduler.await;
    }

    #[tokio::test]
    async fn rejected_trade_leaves_the_ledger_unchanged() {
        let (handle, scheduler) = spawn(test_engine(), Duration::from_millis(5), None);
        assert!(handle.trade(10.0, TradeSide::Buy)); // 134.20 > 24.50 wallet
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = handle.latest();
        assert_eq!(snap.market.wallet_balance, 24.50);
        drop(handle);
        let _ = scheduler.await;
    }

    #[tokio::test]
    async fn scheduler_stops_when_readers_are_gone() {
        let (handle, scheduler) = spawn(test_engine(), Duration::from_millis(5), None);
        drop(handle);
        let joined = tokio::time::timeout(Duration::from_secs(2), scheduler).await;
        assert!(joined.is_ok(), "scheduler should stop after readers drop");
    }
}
