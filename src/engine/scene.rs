//! Scene context: everything the tick loop mutates

use glam::Vec2;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use steedfield_fx::effects::{Bloom, Dimmer};
use steedfield_fx::particles::{FieldMode, ParticleField, Silhouette};
use steedfield_fx::EffectChain;

use super::{Command, Detection};
use crate::audio::CuePlayer;
use crate::config::Config;
use crate::gallery::{CameraView, GalleryEngine, RenderHandle};
use crate::gesture::GestureInterpreter;
use crate::output::FrameOutput;
use crate::state::{AppState, SideEffect, StateMachine, Trigger};
use crate::status::{StatusLabel, StatusUpdate, MANUAL_FALLBACK_NOTICE};

/// Camera orbit per frame while no photo is focused
const AUTO_ROTATE_STEP: f32 = std::f32::consts::TAU / 3600.0 * 2.0;

/// Hand tracker availability as seen by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    Pending,
    Connected,
    Unavailable,
}

/// Outcome of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Status changes in the order they happened
    pub status_updates: Vec<StatusUpdate>,
    /// Set when the state changed this tick
    pub state_changed: bool,
    pub quit: bool,
}

/// Serializable summary of the scene for status consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub state: AppState,
    pub status: StatusLabel,
    pub status_text: String,
    pub manual: bool,
    pub muted: bool,
    pub tracker: TrackerStatus,
    pub focused: Option<u32>,
    pub photos: usize,
    pub gallery_visible: bool,
    pub bloom_strength: f32,
    pub dimmer_opacity: f32,
    pub auto_rotate: bool,
    pub residual: f32,
    pub frame: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            state: AppState::Scattered,
            status: StatusLabel::Scattered,
            status_text: StatusLabel::Scattered.text().to_string(),
            manual: false,
            muted: true,
            tracker: TrackerStatus::Pending,
            focused: None,
            photos: 0,
            gallery_visible: false,
            bloom_strength: 0.0,
            dimmer_opacity: 0.0,
            auto_rotate: true,
            residual: 0.0,
            frame: 0,
            notice: None,
        }
    }
}

/// Owns all mutable animation state. Only the tick loop touches it.
pub struct Scene {
    machine: StateMachine,
    interpreter: GestureInterpreter,
    field: ParticleField,
    gallery: GalleryEngine,
    effects: EffectChain,
    camera: CameraView,
    cues: CuePlayer,
    status: StatusLabel,
    tracker: TrackerStatus,
    notice: Option<String>,
    time: f32,
    time_step: f32,
    settle_distance: f32,
    frame: u64,
}

impl Scene {
    pub fn new(config: &Config, silhouette: Silhouette) -> Self {
        let count = config.particle_count();
        let field = ParticleField::new(
            count,
            silhouette,
            config.particles.scatter_extent,
            config.particles.seed,
        );

        let mut bloom = Bloom::new(config.bloom_strength());
        bloom.focused_strength = config.effects.bloom_focused;
        bloom.radius = config.effects.bloom_radius;
        bloom.threshold = config.effects.bloom_threshold;

        let mut effects = EffectChain::new();
        effects.push(Box::new(bloom));
        effects.push(Box::new(Dimmer::new(config.effects.dimmer_opacity)));

        info!(
            "Scene ready: {} particles ({} body, {} aura), {} photo slots",
            field.len(),
            field.body_count(),
            field.aura_count(),
            config.gallery.photo_count
        );

        Self {
            machine: StateMachine::new(Duration::from_millis(config.animation.explode_delay_ms)),
            interpreter: GestureInterpreter::new(&config.gesture),
            field,
            gallery: GalleryEngine::new(&config.gallery),
            effects,
            camera: CameraView::default(),
            cues: CuePlayer::default(),
            status: StatusLabel::Scattered,
            tracker: TrackerStatus::Pending,
            notice: None,
            time: 0.0,
            time_step: config.animation.time_step,
            settle_distance: config.animation.settle_distance,
            frame: 0,
        }
    }

    pub fn state(&self) -> AppState {
        self.machine.state()
    }

    pub fn status(&self) -> StatusLabel {
        self.status
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn gallery(&self) -> &GalleryEngine {
        &self.gallery
    }

    pub fn camera(&self) -> &CameraView {
        &self.camera
    }

    pub fn cues_mut(&mut self) -> &mut CuePlayer {
        &mut self.cues
    }

    pub fn is_manual(&self) -> bool {
        self.machine.is_manual()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Animation time, advanced a fixed step per tick
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Camera auto-rotation pauses while a photo is focused
    pub fn auto_rotate(&self) -> bool {
        self.gallery.focused().is_none()
    }

    pub fn bloom_strength(&self) -> f32 {
        self.effects
            .find::<Bloom>()
            .map(|b| b.strength)
            .unwrap_or_default()
    }

    /// Advance one frame at scene time `now`.
    ///
    /// Order: commands, time, gestures, delayed transition, particles,
    /// photos, effects, camera.
    pub fn tick(
        &mut self,
        now: Duration,
        detection: Detection,
        commands: impl IntoIterator<Item = Command>,
    ) -> TickReport {
        let mut report = TickReport::default();
        let before = self.machine.state();

        for command in commands {
            self.handle_command(command, now, &mut report);
        }

        self.frame += 1;
        self.time += self.time_step;

        if !self.machine.is_manual() {
            let signal = match &detection {
                Detection::Unchanged => None,
                Detection::NoHand => self.interpreter.observe(None, self.machine.state()),
                Detection::Hand(hand) => self.interpreter.observe(Some(hand), self.machine.state()),
            };
            if let Some(signal) = signal {
                let effects = self.machine.apply(signal.trigger(), now);
                self.apply_effects(effects, &mut report);
            }
        }

        let effects = self.machine.poll_timer(now);
        self.apply_effects(effects, &mut report);

        let mode = field_mode(self.machine.state());
        self.field.update(mode, self.time);
        if self.machine.state() == AppState::Forming && self.field.residual() < self.settle_distance {
            self.machine.apply(Trigger::Settled, now);
        }

        self.gallery.update(self.machine.state(), self.time, &self.camera);
        self.effects.step();

        if self.auto_rotate() {
            self.camera.orbit_y(AUTO_ROTATE_STEP);
        }

        report.state_changed = self.machine.state() != before;
        report
    }

    fn handle_command(&mut self, command: Command, now: Duration, report: &mut TickReport) {
        match command {
            Command::Toggle => {
                self.machine.enable_manual_mode();
                let effects = self.machine.apply(Trigger::ManualToggle, now);
                self.apply_effects(effects, report);
            }
            Command::Pick(ndc) => self.pick(ndc, report),
            Command::CloseFocus => {
                if self.gallery.focused().is_some() {
                    self.unfocus();
                    self.set_status(StatusLabel::Palm, report);
                }
            }
            Command::ToggleMute => {
                self.cues.toggle_mute();
            }
            Command::TrackerReady => {
                self.tracker = TrackerStatus::Connected;
                self.set_status(self.status, report);
            }
            Command::TrackerFailed(reason) => {
                warn!("Hand tracking unavailable: {}", reason);
                self.tracker = TrackerStatus::Unavailable;
                self.machine.enable_manual_mode();
                self.notice = Some(MANUAL_FALLBACK_NOTICE.to_string());
                self.set_status(self.status, report);
            }
            Command::PhotoResolved(photo) => {
                let handle = RenderHandle(u64::from(photo.id));
                self.gallery.insert(photo.id, photo.source, handle);
            }
            Command::Quit => report.quit = true,
        }
    }

    fn pick(&mut self, ndc: Vec2, report: &mut TickReport) {
        if self.machine.state() != AppState::Gallery {
            debug!("Ignoring pick in {}", self.machine.state());
            return;
        }

        let ray = self.camera.ray(ndc);
        match self.gallery.pick(&ray) {
            Some(id) => {
                self.gallery.focus(id);
                self.effects.set_focused(true);
                self.set_status(StatusLabel::Viewing, report);
            }
            None if self.gallery.focused().is_some() => {
                self.unfocus();
                self.set_status(StatusLabel::Palm, report);
            }
            None => {}
        }
    }

    fn unfocus(&mut self) {
        self.gallery.unfocus();
        self.effects.set_focused(false);
    }

    fn apply_effects(&mut self, effects: Vec<SideEffect>, report: &mut TickReport) {
        for effect in effects {
            match effect {
                SideEffect::Cue(cue) => {
                    self.cues.play(cue);
                }
                SideEffect::Status(label) => self.set_status(label, report),
                SideEffect::ClearFocus => {
                    if self.gallery.focused().is_some() {
                        self.unfocus();
                    }
                }
            }
        }
    }

    fn set_status(&mut self, label: StatusLabel, report: &mut TickReport) {
        self.status = label;
        let mut update = StatusUpdate::new(label, self.machine.state().as_str());
        if let Some(notice) = &self.notice {
            update = update.with_notice(notice.clone());
        }
        report.status_updates.push(update);
    }

    /// Borrowed view of this frame for the renderer
    pub fn output(&self) -> FrameOutput<'_> {
        FrameOutput {
            frame: self.frame,
            state: self.machine.state(),
            positions: self.field.positions_flat(),
            positions_dirty: self.field.is_dirty(),
            photos: self.gallery.photos(),
            gallery_visible: self.gallery.is_visible(),
            effects: self.effects.params(),
            camera: &self.camera,
            auto_rotate: self.auto_rotate(),
        }
    }

    /// Called once the renderer has consumed [`Scene::output`]
    pub fn mark_uploaded(&mut self) {
        self.field.mark_uploaded();
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let dimmer_opacity = self
            .effects
            .find::<Dimmer>()
            .map(|d| d.opacity)
            .unwrap_or_default();

        SceneSnapshot {
            state: self.machine.state(),
            status: self.status,
            status_text: self.status.text().to_string(),
            manual: self.machine.is_manual(),
            muted: self.cues.is_muted(),
            tracker: self.tracker,
            focused: self.gallery.focused(),
            photos: self.gallery.photos().len(),
            gallery_visible: self.gallery.is_visible(),
            bloom_strength: self.bloom_strength(),
            dimmer_opacity,
            auto_rotate: self.auto_rotate(),
            residual: self.field.residual(),
            frame: self.frame,
            notice: self.notice.clone(),
        }
    }
}

/// Particle target formula for each phase
pub fn field_mode(state: AppState) -> FieldMode {
    match state {
        AppState::Scattered | AppState::Gallery => FieldMode::Drift,
        AppState::Forming | AppState::Formed => FieldMode::Silhouette,
        AppState::Exploding => FieldMode::Burst,
    }
}
