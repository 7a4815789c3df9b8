//! Stepped playback: a traversal the user walks through by hand or lets auto-advance.
//!
//! ```text
//! Idle --load--> Loaded --play--> Playing <--pause/play--> Paused
//!                   |                 |                       |
//!                   +------step-------+--- last step shown ---+--> Finished
//! ```
//!
//! `clear_traversal` returns to `Idle` from any state. Playing ignores manual steps; the timer owns
//! the index while it runs. Reaching the end stops the timer and disables the controls until a new
//! sequence is loaded.

use std::time::Duration;

use log::{debug, trace};

use crate::highlight::{Instruction, Mark};
use crate::sequencer::Step;
use crate::timeline::{Generation, Timeline};

/// Where the stepper is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepperState {
    /// No sequence loaded.
    Idle,
    /// Sequence loaded, nothing shown yet.
    Loaded,
    /// Auto-advancing on a timer.
    Playing,
    /// Timer stopped, position kept.
    Paused,
    /// Every step has been shown.
    Finished,
}

/// Plays a loaded traversal by hand or on a timer.
#[derive(Debug)]
pub struct Stepper {
    interval: Duration,
    timeline: Timeline<()>,
    generation: Generation,
    steps: Vec<Step>,
    index: usize,
    state: StepperState,
    instructions: Vec<Instruction>,
}

impl Stepper {
    /// An idle stepper that auto-advances every `interval` while playing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeline: Timeline::default(),
            generation: Generation::default(),
            steps: Vec::new(),
            index: 0,
            state: StepperState::Idle,
            instructions: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StepperState {
        self.state
    }

    /// Index of the next step to show.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Number of loaded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether play/pause/step do anything right now.
    pub fn controls_enabled(&self) -> bool {
        matches!(
            self.state,
            StepperState::Loaded | StepperState::Playing | StepperState::Paused
        )
    }

    /// Replaces whatever was loaded. An empty sequence leaves the stepper idle.
    pub fn load(&mut self, steps: Vec<Step>) {
        self.clear_traversal();
        if steps.is_empty() {
            return;
        }
        debug!("stepper loaded {} steps", steps.len());
        self.steps = steps;
        self.state = StepperState::Loaded;
    }

    /// Shows the next step right away, then keeps advancing every interval. Returns `false`, doing
    /// nothing, unless the stepper is loaded or paused.
    pub fn play(&mut self) -> bool {
        if !matches!(self.state, StepperState::Loaded | StepperState::Paused) {
            return false;
        }
        self.state = StepperState::Playing;
        self.advance();
        self.schedule_next();
        true
    }

    /// Stops auto-advancing, keeping the position.
    pub fn pause(&mut self) -> bool {
        if self.state != StepperState::Playing {
            return false;
        }
        self.generation = self.generation.next();
        self.state = StepperState::Paused;
        debug!("stepper paused at {}/{}", self.index, self.steps.len());
        true
    }

    /// Shows the next step by hand.
    pub fn step(&mut self) -> bool {
        if !matches!(self.state, StepperState::Loaded | StepperState::Paused) {
            return false;
        }
        self.state = StepperState::Paused;
        self.advance();
        true
    }

    /// Unloads the sequence and clears all marks.
    pub fn clear_traversal(&mut self) {
        self.generation = self.generation.next();
        self.timeline.cancel_all();
        self.steps.clear();
        self.index = 0;
        self.state = StepperState::Idle;
        self.instructions.push(Instruction::ClearAll);
    }

    /// Advances the clock by `dt`, taking every timed step that comes due.
    pub fn tick(&mut self, dt: Duration) {
        let until = self.timeline.now().saturating_add(dt);
        while let Some((generation, ())) = self.timeline.pop_due(until) {
            if generation != self.generation || self.state != StepperState::Playing {
                trace!("dropping stale stepper timer from {generation:?}");
                continue;
            }
            self.advance();
            self.schedule_next();
        }
        self.timeline.settle(until);
    }

    /// Time until the next pending timer.
    pub fn until_next(&self) -> Option<Duration> {
        self.timeline.until_next()
    }

    /// Takes every instruction queued since the last call, oldest first.
    pub fn drain_instructions(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.instructions)
    }

    fn schedule_next(&mut self) {
        if self.state == StepperState::Playing {
            self.timeline.schedule(self.interval, self.generation, ());
        }
    }

    fn advance(&mut self) {
        let Some(step) = self.steps.get(self.index).copied() else {
            return;
        };
        self.instructions.push(Instruction::ClearAll);
        self.instructions.push(Instruction::MarkNode {
            node: step.node,
            mark: Mark::Traversal,
        });
        if let Some(parent) = step.parent {
            self.instructions.push(Instruction::AnimateEdge {
                parent,
                child: step.node,
                mark: Mark::Traversal,
                duration: self.interval,
                ticket: None,
            });
        }
        self.index += 1;

        if self.index == self.steps.len() {
            self.generation = self.generation.next();
            self.state = StepperState::Finished;
            debug!("stepper finished");
        }
    }
}
