//! Glue between the session, the terminal scene and persisted settings.

use std::{path::PathBuf, time::Duration};

use log::warn;
use maze_run_core::{Event, MoveRejection};
use maze_run_rendering::{FrameInput, Scene};
use maze_run_system_progression::Session;

use crate::settings::Settings;

/// Interactive game driven frame by frame by a rendering backend.
pub(crate) struct Game {
    session: Session,
    clock: Duration,
    settings: Settings,
    settings_path: PathBuf,
}

impl Game {
    pub(crate) fn new(session: Session, settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            session,
            clock: Duration::ZERO,
            settings,
            settings_path,
        }
    }

    /// Applies stored preferences, loads the first level and captures its scene.
    pub(crate) fn start(&mut self, level: u32) -> Scene {
        let mut events = Vec::new();
        if let Some(enabled) = self.settings.hint_enabled {
            events.extend(self.session.set_hint(enabled));
        }
        events.extend(self.session.new_level(level));

        let mut scene = Scene::new(&self.session.renderable_state(), self.session.hint_path());
        self.observe(&events, &mut scene);
        scene
    }

    /// Advances the game by one frame.
    pub(crate) fn update(&mut self, delta: Duration, input: FrameInput, scene: &mut Scene) {
        self.clock += delta;
        if !input.is_idle() {
            scene.notice = None;
        }

        let mut events = Vec::new();
        if input.restart {
            events.extend(self.session.restart());
        }
        if input.toggle_hint {
            events.extend(self.session.toggle_hint());
        }
        if let Some(direction) = input.movement {
            let attempt = self.session.request_move(direction, self.clock);
            scene.bumped = attempt.iter().any(|event| {
                matches!(
                    event,
                    Event::MoveRejected {
                        reason: MoveRejection::Blocked,
                        ..
                    }
                )
            });
            events.extend(attempt);
        }
        events.extend(self.session.tick(self.clock));

        self.observe(&events, scene);
        scene.refresh(&self.session.renderable_state(), self.session.hint_path());
    }

    fn observe(&mut self, events: &[Event], scene: &mut Scene) {
        let mut dirty = false;
        for event in events {
            match *event {
                Event::LevelStarted { level, .. } => {
                    scene.bumped = false;
                    dirty |= self.settings.record_level(level);
                }
                Event::HintToggled { enabled } => {
                    dirty |= self.settings.hint_enabled != Some(enabled);
                    self.settings.hint_enabled = Some(enabled);
                }
                Event::LevelWon { level } => {
                    scene.notice = Some(format!("Level {level} complete!"));
                }
                Event::LevelLost { level, .. } => {
                    scene.notice = Some(format!("Caught on level {level}. Try again."));
                }
                _ => {}
            }
        }

        if dirty && self.settings.remember_progress {
            if let Err(error) = self.settings.save(&self.settings_path) {
                warn!("{error}");
            }
        }
    }
}
