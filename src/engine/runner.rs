//! Tick loop
//!
//! Drains queued commands, reads the latest hand detection, advances the
//! scene one frame and hands the result to a [`FrameSink`].

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use super::{Command, Detection, Scene};
use crate::output::FrameSink;
use crate::tracking::HandFrame;
use crate::ServiceHub;

/// Snapshot refresh period when nothing else changed
const SNAPSHOT_EVERY: u64 = 30;

/// Source of frame times. `None` ends the loop.
pub trait FrameTicker: Send {
    fn next_frame(&mut self) -> impl Future<Output = Option<Duration>> + Send;
}

/// Real-time ticker at a fixed rate
pub struct IntervalTicker {
    interval: Interval,
    start: Instant,
    limit: Option<u64>,
    ticks: u64,
}

impl IntervalTicker {
    pub fn new(fps: u32, limit: Option<u64>) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            interval,
            start: Instant::now(),
            limit,
            ticks: 0,
        }
    }
}

impl FrameTicker for IntervalTicker {
    async fn next_frame(&mut self) -> Option<Duration> {
        if self.limit.is_some_and(|limit| self.ticks >= limit) {
            return None;
        }
        self.interval.tick().await;
        self.ticks += 1;
        Some(self.start.elapsed())
    }
}

/// Simulated clock advancing a fixed step per frame, without sleeping
pub struct FixedTicker {
    step: Duration,
    now: Duration,
    remaining: u64,
}

impl FixedTicker {
    pub fn new(step: Duration, frames: u64) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            remaining: frames,
        }
    }
}

impl FrameTicker for FixedTicker {
    async fn next_frame(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.now += self.step;
        Some(self.now)
    }
}

/// Channels feeding the tick loop
pub struct LoopInputs {
    pub commands: mpsc::Receiver<Command>,
    /// Latest hand detection, absent when tracking is off
    pub hands: Option<watch::Receiver<HandFrame>>,
}

/// Run the scene until the ticker ends or a quit command arrives.
/// Returns the number of frames presented.
pub async fn run_loop<T, S>(
    scene: &mut Scene,
    ticker: &mut T,
    sink: &mut S,
    mut inputs: LoopInputs,
    hub: Option<&ServiceHub>,
) -> u64
where
    T: FrameTicker,
    S: FrameSink + ?Sized,
{
    let mut frames = 0;

    while let Some(now) = ticker.next_frame().await {
        let commands = drain_commands(&mut inputs.commands);
        let detection = read_detection(&mut inputs.hands);

        let report = scene.tick(now, detection, commands);

        sink.present(&scene.output());
        scene.mark_uploaded();
        frames += 1;

        for update in &report.status_updates {
            debug!("Status: {} ({})", update.text, update.state);
        }

        if let Some(hub) = hub {
            let changed = report.state_changed || !report.status_updates.is_empty();
            for update in report.status_updates {
                hub.publish_status(update);
            }
            if changed || scene.frame() % SNAPSHOT_EVERY == 0 {
                hub.set_snapshot(scene.snapshot()).await;
            }
        }

        if report.quit {
            info!("Quit requested");
            break;
        }
    }

    frames
}

fn drain_commands(rx: &mut mpsc::Receiver<Command>) -> Vec<Command> {
    let mut commands = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(command) => commands.push(command),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
    commands
}

/// Take the newest hand frame if one arrived since the last tick
fn read_detection(hands: &mut Option<watch::Receiver<HandFrame>>) -> Detection {
    let Some(rx) = hands.as_mut() else {
        return Detection::Unchanged;
    };

    match rx.has_changed() {
        Ok(true) => {
            let frame = rx.borrow_and_update().clone();
            if frame.sequence == 0 {
                Detection::Unchanged
            } else {
                Detection::from_hand(frame.hand)
            }
        }
        Ok(false) => Detection::Unchanged,
        Err(_) => {
            debug!("Hand frame channel closed");
            *hands = None;
            Detection::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gesture::landmarks::fixtures::hand_with_spread;
    use crate::gesture::HandLandmarks;
    use crate::output::headless::HeadlessSink;
    use crate::state::AppState;
    use crate::status::StatusLabel;
    use glam::Vec3;
    use steedfield_fx::particles::Silhouette;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn scene() -> Scene {
        let mut config = Config::default();
        config.particles.count = Some(200);
        let silhouette = Silhouette::new(vec![Vec3::ONE], vec![Vec3::Y]);
        Scene::new(&config, silhouette)
    }

    fn inputs() -> (mpsc::Sender<Command>, LoopInputs) {
        let (tx, commands) = mpsc::channel(16);
        (tx, LoopInputs { commands, hands: None })
    }

    #[tokio::test]
    async fn test_runs_until_ticker_ends() {
        let mut scene = scene();
        let mut sink = HeadlessSink::new(1000);
        let (_tx, inputs) = inputs();

        let frames = run_loop(
            &mut scene,
            &mut FixedTicker::new(FRAME, 10),
            &mut sink,
            inputs,
            None,
        )
        .await;

        assert_eq!(frames, 10);
        assert_eq!(sink.presented(), 10);
        assert_eq!(scene.frame(), 10);
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let mut scene = scene();
        let mut sink = HeadlessSink::new(1000);
        let (tx, inputs) = inputs();
        tx.send(Command::Quit).await.unwrap();

        let frames = run_loop(
            &mut scene,
            &mut FixedTicker::new(FRAME, 100),
            &mut sink,
            inputs,
            None,
        )
        .await;
        assert_eq!(frames, 1);
    }

    #[tokio::test]
    async fn test_publishes_status_and_snapshot() {
        let (hub, commands) = ServiceHub::new(Config::default());
        let mut status_rx = hub.subscribe_status();
        hub.send_command(Command::Toggle).await;

        let mut scene = scene();
        let mut sink = HeadlessSink::new(1000);
        let inputs = LoopInputs { commands, hands: None };

        run_loop(
            &mut scene,
            &mut FixedTicker::new(FRAME, 1),
            &mut sink,
            inputs,
            Some(hub.as_ref()),
        )
        .await;

        let update = status_rx.recv().await.unwrap();
        assert_eq!(update.label, StatusLabel::Fist);
        assert_eq!(update.state, "forming");

        let snapshot = hub.get_snapshot().await;
        assert_eq!(snapshot.state, AppState::Forming);
        assert!(snapshot.manual);
        assert_eq!(snapshot.frame, 1);
    }

    #[test]
    fn test_read_detection() {
        let (tx, rx) = watch::channel(HandFrame::default());
        let mut hands = Some(rx);

        assert_eq!(read_detection(&mut hands), Detection::Unchanged);

        let hand = HandLandmarks::from_points(&hand_with_spread(0.2)).unwrap();
        tx.send_replace(HandFrame {
            sequence: 1,
            hand: Some(hand.clone()),
        });
        assert_eq!(read_detection(&mut hands), Detection::Hand(hand));
        assert_eq!(read_detection(&mut hands), Detection::Unchanged);

        tx.send_replace(HandFrame {
            sequence: 2,
            hand: None,
        });
        assert_eq!(read_detection(&mut hands), Detection::NoHand);

        drop(tx);
        assert_eq!(read_detection(&mut hands), Detection::Unchanged);
        assert!(hands.is_none());
    }

    #[test]
    fn test_drain_keeps_arrival_order() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.try_send(Command::Toggle).unwrap();
        tx.try_send(Command::ToggleMute).unwrap();
        assert_eq!(
            drain_commands(&mut rx),
            vec![Command::Toggle, Command::ToggleMute]
        );
        assert!(drain_commands(&mut rx).is_empty());
    }
}
