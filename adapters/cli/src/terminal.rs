//! Line-oriented terminal backend.
//!
//! Every key typed on a line becomes one turn: a frame carrying the input
//! followed by idle frames, so consecutive keys clear the move debounce and
//! the obstacle keeps its pace. An empty line plays a single idle turn.

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use maze_run_core::Direction;
use maze_run_rendering::{render_ascii, FrameInput, RenderingBackend, Scene};

/// Simulated frame length.
pub(crate) const FRAME: Duration = Duration::from_millis(16);

const HELP: &str = "keys: w/a/s/d move, h hint, r restart, q quit; several keys per line are fine";

/// Backend reading keys from `input` and drawing frames to `output`.
pub(crate) struct TerminalBackend<I, O> {
    input: I,
    output: O,
    frames_per_input: u32,
}

impl<I, O> TerminalBackend<I, O> {
    pub(crate) fn new(input: I, output: O, frames_per_input: u32) -> Self {
        Self {
            input,
            output,
            frames_per_input: frames_per_input.max(1),
        }
    }
}

impl<I: BufRead, O: Write> TerminalBackend<I, O> {
    fn turn<F>(&self, input: FrameInput, scene: &mut Scene, update_scene: &mut F)
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        update_scene(FRAME, input, scene);
        for _ in 1..self.frames_per_input {
            update_scene(FRAME, FrameInput::default(), scene);
        }
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        writeln!(self.output, "{}", scene.status_line())?;
        if let Some(notice) = &scene.notice {
            writeln!(self.output, "{notice}")?;
        }
        write!(self.output, "{}> ", render_ascii(scene))?;
        self.output.flush().context("failed to flush terminal output")
    }
}

impl<I: BufRead, O: Write> RenderingBackend for TerminalBackend<I, O> {
    fn run<F>(mut self, mut scene: Scene, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        writeln!(self.output, "{HELP}")?;
        self.present(&scene)?;

        let mut line = String::new();
        'session: loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read player input")?;
            if read == 0 {
                break;
            }

            let inputs = match parse_line(&line) {
                Ok(inputs) => inputs,
                Err(key) => {
                    writeln!(self.output, "unknown key {key:?}; {HELP}")?;
                    self.present(&scene)?;
                    continue;
                }
            };

            if inputs.is_empty() {
                self.turn(FrameInput::default(), &mut scene, &mut update_scene);
            }
            for input in inputs {
                if input.quit {
                    break 'session;
                }
                self.turn(input, &mut scene, &mut update_scene);
            }
            self.present(&scene)?;
        }

        writeln!(self.output)?;
        Ok(())
    }
}

/// Translates a typed line into frame inputs, reporting the first unknown key.
pub(crate) fn parse_line(line: &str) -> Result<Vec<FrameInput>, char> {
    line.chars()
        .filter(|key| !key.is_whitespace())
        .map(|key| match key.to_ascii_lowercase() {
            'w' => Ok(FrameInput::movement(Direction::North)),
            'd' => Ok(FrameInput::movement(Direction::East)),
            's' => Ok(FrameInput::movement(Direction::South)),
            'a' => Ok(FrameInput::movement(Direction::West)),
            'h' => Ok(FrameInput {
                toggle_hint: true,
                ..FrameInput::default()
            }),
            'r' => Ok(FrameInput {
                restart: true,
                ..FrameInput::default()
            }),
            'q' => Ok(FrameInput {
                quit: true,
                ..FrameInput::default()
            }),
            _ => Err(key),
        })
        .collect()
}
