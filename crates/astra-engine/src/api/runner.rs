// api/runner.rs
//
// The engine orchestrator. Owns every subsystem and drives the fixed
// frame order: scene, game, effects, particles, global clock, gui, draw.
// The host loop calls `tick` with wall-clock timestamps and executes the
// resulting draw list.

use std::panic::{catch_unwind, AssertUnwindSafe};

use glam::Vec2;

use crate::api::game::{EngineError, FrameEvents, Game, SceneNav, StepContext};
use crate::api::options::EngineOptions;
use crate::api::types::EngineEvent;
use crate::assets::audio::{AudioRegistry, NullAudio};
use crate::assets::localization::Localization;
use crate::assets::preloader::Preloader;
use crate::assets::registry::SpriteTable;
use crate::core::clock::{ClockTicks, GlobalClock};
use crate::core::graph::StepOutput;
use crate::core::rng::Rng;
use crate::core::scene::SceneCollection;
use crate::core::scheduler::{FrameScheduler, TickDecision};
use crate::input::controller::InputController;
use crate::input::keys::{self, KeyCode};
use crate::input::router::Notification;
use crate::render::{DrawCmd, DrawList};
use crate::systems::effects::EffectsCollection;
use crate::systems::particles::ParticleCollection;

/// Frames-per-second counter over one-second windows.
#[derive(Debug)]
struct FpsCounter {
    frames: u32,
    fps: u32,
    window_start_ms: f64,
}

impl FpsCounter {
    fn new(now_ms: f64) -> Self {
        Self {
            frames: 0,
            fps: 0,
            window_start_ms: now_ms,
        }
    }

    fn frame(&mut self, now_ms: f64) {
        self.frames += 1;
        if now_ms - self.window_start_ms >= 1000.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start_ms = now_ms;
        }
    }

    fn fps(&self) -> u32 {
        self.fps
    }
}

/// The engine: a game plus every runtime subsystem it steps.
pub struct Engine<G: Game> {
    pub game: G,
    pub options: EngineOptions,
    pub scenes: SceneCollection,
    pub particles: ParticleCollection,
    pub effects: EffectsCollection,
    pub sprites: SpriteTable,
    pub strings: Localization,
    pub audio: Box<dyn AudioRegistry>,
    pub preloader: Preloader,
    input: InputController,
    scheduler: FrameScheduler,
    global_clock: GlobalClock,
    rng: Rng,
    draw_list: DrawList,
    pending_notifications: Vec<Notification>,
    /// Timer expiries and global ticks not yet seen by the game,
    /// accumulated across paused frames.
    pending_clock_due: Vec<String>,
    pending_ticks: ClockTicks,
    pending_events: Vec<EngineEvent>,
    external: Option<Box<dyn FnMut(&EngineEvent)>>,
    loaded: bool,
    announce_loaded: bool,
    fps: FpsCounter,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G, now_ms: f64) -> Result<Self, EngineError> {
        Self::with_options_overlay(game, now_ms, None)
    }

    /// Build the engine, optionally overlaying host-provided JSON on the
    /// game's options. A malformed overlay is logged and ignored.
    pub fn with_options_overlay(
        mut game: G,
        now_ms: f64,
        overlay_json: Option<&str>,
    ) -> Result<Self, EngineError> {
        let mut options = game.options();
        if let Some(json) = overlay_json {
            if let Err(err) = options.merge_json(json) {
                log::warn!("options overlay rejected: {}", err);
            }
        }
        if options.viewport_width <= 0.0 || options.viewport_height <= 0.0 {
            return Err(EngineError::InvalidViewport {
                width: options.viewport_width,
                height: options.viewport_height,
            });
        }

        let mut scenes = SceneCollection::new();
        let mut sprites = SpriteTable::new();
        let mut strings = Localization::new(options.default_language.clone());
        game.init(&mut scenes, &mut sprites, &mut strings);
        if scenes.is_empty() {
            return Err(EngineError::NoScenes);
        }

        let viewport = Vec2::new(options.viewport_width, options.viewport_height);
        Ok(Self {
            game,
            particles: ParticleCollection::new(viewport.x as usize, viewport.y as usize),
            effects: EffectsCollection::new(),
            sprites,
            strings,
            audio: Box::new(NullAudio),
            preloader: Preloader::new(now_ms),
            input: InputController::new(viewport),
            scheduler: FrameScheduler::new(options.frame_interval_ms, now_ms),
            global_clock: GlobalClock::new(),
            rng: Rng::new(42),
            draw_list: DrawList::new(),
            pending_notifications: Vec::new(),
            pending_clock_due: Vec::new(),
            pending_ticks: ClockTicks::default(),
            pending_events: Vec::new(),
            external: None,
            loaded: false,
            announce_loaded: false,
            fps: FpsCounter::new(now_ms),
            options,
            scenes,
        })
    }

    /// Register the host callback for lifecycle events. Events queued
    /// during a tick are delivered at the start of the following tick,
    /// never mid-step and never in the tick that produced them.
    pub fn set_event_callback(&mut self, callback: Box<dyn FnMut(&EngineEvent)>) {
        self.external = Some(callback);
    }

    pub fn set_audio(&mut self, audio: Box<dyn AudioRegistry>) {
        self.audio = audio;
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    pub fn is_halted(&self) -> bool {
        self.scheduler.is_halted()
    }

    pub fn unhalt(&mut self, now_ms: f64) {
        self.scheduler.unhalt(now_ms);
    }

    /// One iteration of the host loop. Runs at most one frame and tells
    /// the host when to call back.
    pub fn tick(&mut self, now_ms: f64) -> TickDecision {
        // Deliver what the previous tick queued before doing anything
        // else this tick.
        self.dispatch_events();
        if !self.loaded && self.preloader.ready(now_ms) {
            self.loaded = true;
            self.announce_loaded = true;
            self.pending_events.push(EngineEvent::Loaded);
        }
        let decision = self.scheduler.tick(now_ms);
        if let TickDecision::Frame { dt, .. } = decision {
            self.frame(dt, now_ms);
        }
        decision
    }

    fn frame(&mut self, dt_ms: f32, now_ms: f64) {
        let paused = self.scheduler.is_paused();
        let mut out = StepOutput::new();
        let mut nav = None;

        if !paused {
            if let Some(scene) = self.scenes.current_mut() {
                scene.step(dt_ms, now_ms, &mut self.rng, &mut out);
            }

            let events = FrameEvents {
                notifications: std::mem::take(&mut self.pending_notifications),
                tracker_events: std::mem::take(&mut out.tracker_events),
                clock_due: std::mem::take(&mut self.pending_clock_due),
                global_ticks: std::mem::take(&mut self.pending_ticks),
                just_loaded: std::mem::take(&mut self.announce_loaded),
            };
            let scene_index = self.scenes.current_index();
            if let Some(scene) = self.scenes.current_mut() {
                let mut ctx = StepContext {
                    scene,
                    scene_index,
                    particles: &mut self.particles,
                    effects: &mut self.effects,
                    audio: self.audio.as_mut(),
                    sprites: &self.sprites,
                    strings: &self.strings,
                    options: &self.options,
                    rng: &mut self.rng,
                    dt_ms,
                    now_ms,
                    events: &events,
                    nav: &mut nav,
                };
                self.game.step(&mut ctx);
            }
            if let Some(nav) = nav {
                let event = match nav {
                    SceneNav::Set(index) => self.scenes.set_scene(index),
                    SceneNav::Advance => self.scenes.advance_scene(),
                    SceneNav::Back => self.scenes.go_back_scene(),
                };
                if let Some(event) = event {
                    self.pending_events.push(event);
                }
            }

            self.effects.step(dt_ms);
            for spawn in out.particle_spawns.drain(..) {
                self.particles.add_spawn(spawn);
            }
            self.particles.step(dt_ms);
        }

        // Clocks keep running through pause; the game sees expiries and
        // ticks merged on its next step.
        if let Some(scene) = self.scenes.current_mut() {
            self.pending_clock_due.extend(scene.step_clock(dt_ms));
        }
        let ticks = self.global_clock.step(dt_ms);
        self.pending_ticks.half_second |= ticks.half_second;
        self.pending_ticks.second |= ticks.second;
        self.pending_ticks.five_seconds |= ticks.five_seconds;

        if let Some(scene) = self.scenes.current_mut() {
            scene.gui.step(dt_ms);
        }

        self.render(now_ms);
    }

    fn render(&mut self, now_ms: f64) {
        self.fps.frame(now_ms);
        self.draw_list.clear();
        if let Some(scene) = self.scenes.current() {
            scene.draw(&mut self.draw_list, &self.options);
        }
        self.effects.draw(&mut self.draw_list);
        self.particles.draw(&mut self.draw_list);
        if let Some(scene) = self.scenes.current() {
            scene.gui.draw(&mut self.draw_list);
        }
        if self.scheduler.is_paused() {
            self.draw_list.push(DrawCmd::HudText {
                text: self.strings.text("paused").to_string(),
                pos: Vec2::new(
                    self.options.viewport_width / 2.0,
                    self.options.viewport_height / 2.0,
                ),
            });
        }
        if self.options.show_fps {
            self.draw_list.push(DrawCmd::HudText {
                text: format!("{} fps", self.fps.fps()),
                pos: Vec2::new(8.0, 8.0),
            });
        }
    }

    fn dispatch_events(&mut self) {
        if self.pending_events.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending_events);
        let Some(callback) = self.external.as_mut() else {
            return;
        };
        for event in &events {
            // A panicking host callback must not take the loop down.
            let result = catch_unwind(AssertUnwindSafe(|| callback(event)));
            if result.is_err() {
                log::error!("event callback panicked on {:?}", event);
            }
        }
    }

    /// Host key-down. Auto-repeat while held is dropped; reserved keys
    /// (pause, halt, fps) are consumed before scene routing.
    pub fn key_down(&mut self, key: KeyCode, now_ms: f64) {
        if !self.input.mark_pressed(key) {
            return;
        }
        if self.handle_reserved_key(key, now_ms) {
            return;
        }
        let paused = self.scheduler.is_paused();
        if let Some(scene) = self.scenes.current_mut() {
            let notes = self
                .input
                .record_press(key, now_ms, &mut scene.input, paused);
            self.pending_notifications.extend(notes);
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.input.key_up(key);
    }

    /// Host click/tap in page coordinates.
    pub fn click(&mut self, page_pos: Vec2, now_ms: f64) {
        let paused = self.scheduler.is_paused();
        if let Some(scene) = self.scenes.current_mut() {
            let notes = self.input.click(page_pos, now_ms, &mut scene.input, paused);
            self.pending_notifications.extend(notes);
        }
    }

    pub fn notify_resize(&mut self, canvas_size: Vec2, canvas_offset: Vec2, now_ms: f64) {
        self.input.notify_resize(canvas_size, canvas_offset, now_ms);
    }

    pub fn notify_scroll(&mut self, scroll_offset: Vec2) {
        self.input.notify_scroll(scroll_offset);
    }

    /// The host window lost focus.
    pub fn window_blur(&mut self) {
        if self.options.pause_on_focus_loss {
            self.scheduler.pause();
        }
    }

    /// Toggle pause. Entering pause always works; leaving it is refused
    /// while the current scene is not playable.
    pub fn toggle_pause(&mut self) {
        if self.scheduler.is_paused() {
            let playable = self.scenes.current().map(|s| s.playable).unwrap_or(false);
            self.scheduler.try_unpause(playable);
        } else {
            self.scheduler.pause();
        }
    }

    fn handle_reserved_key(&mut self, key: KeyCode, now_ms: f64) -> bool {
        match key {
            keys::P if self.options.allow_pause => {
                self.toggle_pause();
                true
            }
            keys::ESC if self.options.allow_halt => {
                if self.scheduler.is_halted() {
                    self.scheduler.unhalt(now_ms);
                } else {
                    self.scheduler.halt();
                    // Leave a fresh frame on screen while the loop sleeps.
                    self.render(now_ms);
                }
                true
            }
            keys::F if self.options.allow_fps_key => {
                self.options.show_fps = !self.options.show_fps;
                true
            }
            _ => false,
        }
    }
}
