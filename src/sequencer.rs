//! Auto-advancing playback of traversals and search paths.
//!
//! A [`Sequencer`] turns an ordered list of [`Step`]s into a timed series of [`Instruction`]s
//! with exactly one node active at a time. Every step clears all marks, marks its node and, when
//! the node has a parent edge, animates that edge.
//!
//! Pacing differs per [`Mode`]:
//!
//! - [`Mode::Traversal`] is edge driven. A step with a parent edge hands out an [`EdgeTicket`] and
//!   only moves on once that ticket comes back through [`Sequencer::transition_finished`]. The
//!   root waits a plain step duration.
//! - [`Mode::Search`] is timer driven with shorter steps, and leaves the finished path up for a
//!   moment before clearing it.
//!
//! Starting any run supersedes the current one by bumping the [`Generation`]. Timers and tickets
//! from older generations still arrive but do nothing.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use bst_viz::sequencer::{Sequencer, Step};
//! use bst_viz::{AnimationConfig, Instruction, Tree};
//!
//! let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
//! let mut sequencer = Sequencer::new(AnimationConfig::default());
//! sequencer.run_traversal(Step::from_nodes(&tree.preorder()));
//!
//! // The root goes up straight away and holds for a full step.
//! let first = sequencer.drain_instructions();
//! assert_eq!(first[0], Instruction::ClearAll);
//!
//! sequencer.tick(Duration::from_millis(1000));
//! let second = sequencer.drain_instructions();
//! let Some(Instruction::AnimateEdge { ticket: Some(ticket), .. }) = second.last() else {
//!     panic!("a child step animates its edge");
//! };
//!
//! // Nothing moves until the edge transition is reported done.
//! sequencer.tick(Duration::from_millis(5000));
//! assert!(sequencer.drain_instructions().is_empty());
//! sequencer.transition_finished(*ticket);
//! assert!(!sequencer.drain_instructions().is_empty());
//! ```

use std::time::Duration;

use log::{debug, trace};

use crate::config::{scale, AnimationConfig};
use crate::highlight::{EdgeTicket, Instruction, Mark};
use crate::timeline::{Generation, Timeline};
use crate::tree::{NodeId, NodeRef};

/// Which kind of run is playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every node of a traversal, edge driven.
    Traversal,
    /// A search path, timer driven and faster.
    Search,
}

impl Mode {
    fn mark(self) -> Mark {
        match self {
            Mode::Traversal => Mark::Traversal,
            Mode::Search => Mark::SearchPath,
        }
    }
}

/// One node to present, with the parent whose edge leads into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Node to mark.
    pub node: NodeId,
    /// Upper end of the edge to animate, if any.
    pub parent: Option<NodeId>,
}

impl Step {
    /// Captures each node's current parent. Works for traversal output and search paths alike.
    pub fn from_nodes<T>(nodes: &[NodeRef<'_, T>]) -> Vec<Step> {
        nodes
            .iter()
            .map(|n| Step {
                node: n.id(),
                parent: n.parent().map(|p| p.id()),
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
enum Continuation {
    /// Move to the next step of the current run.
    Advance,
    /// Clear a finished search path.
    Linger,
    /// Take the insert flash down.
    EndFlash,
}

#[derive(Debug)]
struct Run {
    mode: Mode,
    steps: Vec<Step>,
    index: usize,
    step_duration: Duration,
    edge_duration: Duration,
    awaiting: Option<EdgeTicket>,
}

/// Plays one run at a time and queues the resulting [`Instruction`]s.
#[derive(Debug)]
pub struct Sequencer {
    config: AnimationConfig,
    timeline: Timeline<Continuation>,
    generation: Generation,
    flash_generation: Generation,
    run: Option<Run>,
    instructions: Vec<Instruction>,
}

impl Sequencer {
    /// An idle sequencer paced by `config`.
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            timeline: Timeline::default(),
            generation: Generation::default(),
            flash_generation: Generation::default(),
            run: None,
            instructions: Vec::new(),
        }
    }

    /// The pacing in use.
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Generation of the newest run. Bumped by every `run` and `cancel`.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Starts presenting `steps` from the first one, superseding any run in flight.
    ///
    /// `step_duration` is the traversal step and edge length, or the search step length. Search
    /// edges are scaled from it by [`AnimationConfig::search_edge_ratio`].
    pub fn run(&mut self, mode: Mode, steps: Vec<Step>, step_duration: Duration) -> Generation {
        self.generation = self.generation.next();
        if let Some(old) = self.run.take() {
            debug!(
                "{:?} run superseded at step {}/{}",
                old.mode,
                old.index,
                old.steps.len()
            );
        }
        let edge_duration = match mode {
            Mode::Traversal => step_duration,
            Mode::Search => {
                scale(step_duration, self.config.search_edge_ratio()).unwrap_or(step_duration)
            }
        };
        debug!(
            "starting {mode:?} run {:?} over {} steps",
            self.generation,
            steps.len()
        );
        self.run = Some(Run {
            mode,
            steps,
            index: 0,
            step_duration,
            edge_duration,
            awaiting: None,
        });
        self.present();
        self.generation
    }

    /// Plays a traversal at the configured step length.
    pub fn run_traversal(&mut self, steps: Vec<Step>) -> Generation {
        let step = self.config.traversal_step();
        self.run(Mode::Traversal, steps, step)
    }

    /// Plays a search path at the configured search step length.
    pub fn run_search(&mut self, steps: Vec<Step>) -> Generation {
        let step = self.config.search_step();
        self.run(Mode::Search, steps, step)
    }

    /// Abandons the current run and clears all marks. Pending timers are left to expire.
    pub fn cancel(&mut self) {
        self.generation = self.generation.next();
        if self.run.take().is_some() {
            debug!("run cancelled");
        }
        self.instructions.push(Instruction::ClearAll);
    }

    /// Briefly highlights `node`, replacing any earlier flash. Independent of runs.
    pub fn flash(&mut self, node: NodeId) {
        self.flash_generation = self.flash_generation.next();
        self.instructions
            .push(Instruction::ClearMarks(Mark::Highlighted));
        self.instructions.push(Instruction::MarkNode {
            node,
            mark: Mark::Highlighted,
        });
        self.timeline
            .schedule(self.config.flash(), self.flash_generation, Continuation::EndFlash);
    }

    /// Advances the clock by `dt`, firing every continuation that comes due on the way.
    pub fn tick(&mut self, dt: Duration) {
        let until = self.timeline.now().saturating_add(dt);
        while let Some((generation, continuation)) = self.timeline.pop_due(until) {
            self.fire(generation, continuation);
        }
        self.timeline.settle(until);
    }

    /// Reports that the edge transition behind `ticket` ended. Tickets from superseded runs, or
    /// ones not currently awaited, are ignored.
    pub fn transition_finished(&mut self, ticket: EdgeTicket) {
        let awaited = self.run.as_ref().and_then(|run| run.awaiting);
        if ticket.generation != self.generation || awaited != Some(ticket) {
            trace!("ignoring stale edge ticket for step {}", ticket.step);
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.awaiting = None;
            run.index += 1;
        }
        self.present();
    }

    /// Time until the next pending timer, stale ones included.
    pub fn until_next(&self) -> Option<Duration> {
        self.timeline.until_next()
    }

    /// Whether a run is presenting steps or holding a finished search path.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Mode and index of the step currently on screen.
    pub fn current(&self) -> Option<(Mode, usize)> {
        self.run
            .as_ref()
            .filter(|run| run.index < run.steps.len())
            .map(|run| (run.mode, run.index))
    }

    /// Takes every instruction queued since the last call, oldest first.
    pub fn drain_instructions(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.instructions)
    }

    fn fire(&mut self, generation: Generation, continuation: Continuation) {
        let current = match continuation {
            Continuation::EndFlash => self.flash_generation,
            Continuation::Advance | Continuation::Linger => self.generation,
        };
        if generation != current {
            trace!("dropping stale {continuation:?} from {generation:?}");
            return;
        }
        match continuation {
            Continuation::Advance => {
                if let Some(run) = self.run.as_mut() {
                    run.index += 1;
                }
                self.present();
            }
            Continuation::Linger => {
                self.instructions.push(Instruction::ClearAll);
                self.run = None;
                debug!("search run finished");
            }
            Continuation::EndFlash => {
                self.instructions
                    .push(Instruction::ClearMarks(Mark::Highlighted));
            }
        }
    }

    /// Shows the step at the run's current index, or wraps up once past the last one.
    fn present(&mut self) {
        let generation = self.generation;
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let Some(step) = run.steps.get(run.index).copied() else {
            self.finish();
            return;
        };

        let mark = run.mode.mark();
        self.instructions.push(Instruction::ClearAll);
        self.instructions.push(Instruction::MarkNode {
            node: step.node,
            mark,
        });

        match (run.mode, step.parent) {
            (Mode::Traversal, Some(parent)) => {
                let ticket = EdgeTicket {
                    generation,
                    step: run.index,
                };
                run.awaiting = Some(ticket);
                self.instructions.push(Instruction::AnimateEdge {
                    parent,
                    child: step.node,
                    mark,
                    duration: run.step_duration,
                    ticket: Some(ticket),
                });
            }
            (Mode::Traversal, None) => {
                self.timeline
                    .schedule(run.step_duration, generation, Continuation::Advance);
            }
            (Mode::Search, parent) => {
                if let Some(parent) = parent {
                    self.instructions.push(Instruction::AnimateEdge {
                        parent,
                        child: step.node,
                        mark,
                        duration: run.edge_duration,
                        ticket: None,
                    });
                }
                self.timeline
                    .schedule(run.step_duration, generation, Continuation::Advance);
            }
        }
    }

    fn finish(&mut self) {
        let Some(mode) = self.run.as_ref().map(|run| run.mode) else {
            return;
        };
        match mode {
            Mode::Traversal => {
                self.instructions.push(Instruction::ClearAll);
                self.run = None;
                debug!("traversal run finished");
            }
            Mode::Search => {
                self.timeline.schedule(
                    self.config.search_linger(),
                    self.generation,
                    Continuation::Linger,
                );
            }
        }
    }
}
