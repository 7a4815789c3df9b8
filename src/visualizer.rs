//! A teaching session: one tree of integers plus the playback machinery around it.
//!
//! The front end calls in with user actions and [`Visualizer::tick`]s the clock. Everything a
//! renderer needs comes back out as the tree itself, its [`DisplayNode`] hierarchy and the current
//! [`HighlightSet`].

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Config;
use crate::display::{render_highlighted, DisplayNode};
use crate::error::{InputError, TreeError};
use crate::highlight::HighlightSet;
use crate::sequencer::{Sequencer, Step};
use crate::stepper::{Stepper, StepperState};
use crate::tree::{NodeId, Order, Tree};

/// What a search found, ready to show the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// The value searched for.
    pub target: i64,
    /// Whether the tree holds it.
    pub found: bool,
    /// Values visited from the root down.
    pub path: Vec<i64>,
}

impl SearchReport {
    /// e.g. `Searching for 35: 50 → 25 → 35 (3 steps)`.
    pub fn text(&self) -> String {
        let verb = if self.found { "Searching for" } else { "Not found" };
        format!(
            "{verb} {}: {} ({} steps)",
            self.target,
            join_path(&self.path),
            self.path.len()
        )
    }
}

fn join_path(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One tree and the playback state around it.
pub struct Visualizer {
    tree: Tree<i64>,
    sequencer: Sequencer,
    stepper: Stepper,
    highlights: HighlightSet,
    last_search: Option<SearchReport>,
    last_traversal: Option<String>,
}

impl Visualizer {
    /// Starts a session with `config.seed` inserted in order.
    pub fn new(config: Config) -> Self {
        let mut tree = Tree::new();
        for &value in &config.seed {
            if tree.insert(value).is_err() {
                warn!("seed value {value} repeats, skipping it");
            }
        }
        info!("session started with {} nodes", tree.len());

        Self {
            tree,
            sequencer: Sequencer::new(config.animation),
            stepper: Stepper::new(config.animation.stepper_interval()),
            highlights: HighlightSet::new(),
            last_search: None,
            last_traversal: None,
        }
    }

    /// Parses user entry the way the input box does.
    pub fn parse_value(input: &str) -> Result<i64, InputError> {
        input
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidNumber(input.trim().to_string()))
    }

    /// The tree being shown.
    pub fn tree(&self) -> &Tree<i64> {
        &self.tree
    }

    /// Marks currently on screen.
    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// The tree for a layout engine, or `None` when empty.
    pub fn hierarchy(&self) -> Option<DisplayNode<i64>> {
        self.tree.to_display_hierarchy()
    }

    /// The tree as text, with current marks.
    pub fn render(&self) -> String {
        render_highlighted(&self.tree, &self.highlights)
    }

    /// Report of the most recent search.
    pub fn last_search(&self) -> Option<&SearchReport> {
        self.last_search.as_ref()
    }

    /// Printed sequence of the most recent traversal.
    pub fn last_traversal(&self) -> Option<&str> {
        self.last_traversal.as_deref()
    }

    /// State of stepped playback.
    pub fn stepper_state(&self) -> StepperState {
        self.stepper.state()
    }

    /// Whether an auto run or a playing stepper still has steps to show.
    pub fn is_animating(&self) -> bool {
        self.sequencer.is_running() || self.stepper.state() == StepperState::Playing
    }

    /// Inserts `value` and flashes the new node. Playback in progress is stopped since its steps
    /// describe the old shape.
    pub fn insert(&mut self, value: i64) -> Result<NodeId, TreeError> {
        let id = self.tree.insert(value)?;
        self.stop_playback();
        self.sequencer.flash(id);
        self.sync();
        Ok(id)
    }

    /// Deletes `value`, stops any playback and clears all marks, so nothing stays marked on
    /// the node that left the tree.
    pub fn delete(&mut self, value: i64) -> Result<NodeId, TreeError> {
        let removed = self.tree.delete(&value)?;
        self.stop_playback();
        self.sync();
        Ok(removed)
    }

    /// Empties the tree and resets all playback.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.stop_playback();
        self.last_search = None;
        self.last_traversal = None;
        self.sync();
    }

    /// Searches for `value` and, when found, plays the path back.
    pub fn search(&mut self, value: i64) -> SearchReport {
        let result = self.tree.search(&value);
        let report = SearchReport {
            target: value,
            found: result.found,
            path: result.values().into_iter().copied().collect(),
        };
        if result.found {
            let steps = Step::from_nodes(&result.path);
            self.stepper.clear_traversal();
            self.sequencer.run_search(steps);
        }
        debug!("{}", report.text());
        self.last_search = Some(report.clone());
        self.sync();
        report
    }

    /// Searches for the value of a node picked on screen. `None` if the id is gone.
    pub fn select(&mut self, id: NodeId) -> Option<SearchReport> {
        let value = *self.tree.node(id)?.value();
        Some(self.search(value))
    }

    /// Runs a traversal, starts its playback and returns the printed sequence, e.g.
    /// `INORDER: 15 → 25 → 35`.
    pub fn traverse(&mut self, order: Order) -> String {
        let nodes = self.tree.traverse(order);
        let values: Vec<i64> = nodes.iter().map(|n| *n.value()).collect();
        let steps = Step::from_nodes(&nodes);
        self.stepper.clear_traversal();
        self.sequencer.run_traversal(steps);

        let output = format!("{}: {}", order.label(), join_path(&values));
        self.last_traversal = Some(output.clone());
        self.sync();
        output
    }

    /// Loads a traversal into the stepper without playing it. Returns the number of steps.
    pub fn load_stepper(&mut self, order: Order) -> usize {
        let steps = Step::from_nodes(&self.tree.traverse(order));
        self.sequencer.cancel();
        self.stepper.load(steps);
        self.sync();
        self.stepper.len()
    }

    /// Starts or resumes stepped playback.
    pub fn play(&mut self) -> bool {
        let started = self.stepper.play();
        self.sync();
        started
    }

    /// Pauses stepped playback.
    pub fn pause(&mut self) -> bool {
        self.stepper.pause()
    }

    /// Shows the next stepped-playback node.
    pub fn step(&mut self) -> bool {
        let stepped = self.stepper.step();
        self.sync();
        stepped
    }

    /// Unloads stepped playback and clears its marks.
    pub fn clear_traversal(&mut self) {
        self.stepper.clear_traversal();
        self.sync();
    }

    /// Advances the session clock by `dt`. The interval is cut at every timer and transition end
    /// inside it so each event happens at its own time.
    pub fn tick(&mut self, dt: Duration) {
        let mut remaining = dt;
        loop {
            let next = [
                self.sequencer.until_next(),
                self.stepper.until_next(),
                self.highlights.until_next_transition(),
            ]
            .into_iter()
            .flatten()
            .min()
            .filter(|d| *d <= remaining);
            let step = next.unwrap_or(remaining);

            let finished = self.highlights.tick(step);
            self.sequencer.tick(step);
            self.stepper.tick(step);
            for ticket in finished {
                self.sequencer.transition_finished(ticket);
            }
            self.sync();

            remaining -= step;
            if next.is_none() {
                break;
            }
        }
    }

    fn stop_playback(&mut self) {
        self.sequencer.cancel();
        self.stepper.clear_traversal();
    }

    /// Applies queued instructions. The stepper's go first: starting an auto run resets the
    /// stepper, and that reset must not wipe the run's first step.
    fn sync(&mut self) {
        for instruction in self
            .stepper
            .drain_instructions()
            .into_iter()
            .chain(self.sequencer.drain_instructions())
        {
            self.highlights.apply(&instruction);
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Mark;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_seeded() {
        let viz = Visualizer::default();

        assert_eq!(viz.tree().len(), 15);
        assert_eq!(viz.hierarchy().unwrap().value, 50);
    }

    #[test]
    fn test_repeated_seed_values_are_skipped() {
        let config = Config {
            seed: vec![2, 1, 2],
            ..Config::default()
        };

        assert_eq!(Visualizer::new(config).tree().len(), 2);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(Visualizer::parse_value(" 42 "), Ok(42));
        assert_eq!(
            Visualizer::parse_value("forty"),
            Err(InputError::InvalidNumber("forty".to_string()))
        );
    }

    #[test]
    fn test_insert_flashes() {
        let mut viz = Visualizer::default();
        let id = viz.insert(55).unwrap();

        assert_eq!(viz.highlights().node_marks(id), [Mark::Highlighted]);
        viz.tick(ms(799));
        assert_eq!(viz.highlights().node_marks(id), [Mark::Highlighted]);
        viz.tick(ms(1));
        assert!(viz.highlights().is_clear());

        assert_eq!(viz.insert(55), Err(TreeError::DuplicateValue));
    }

    #[test]
    fn test_search_report_text() {
        let mut viz = Visualizer::default();
        let report = viz.search(35);

        assert!(report.found);
        assert_eq!(report.text(), "Searching for 35: 50 → 25 → 35 (3 steps)");
        assert!(viz.is_animating());

        let miss = viz.search(36);
        assert!(!miss.found);
        assert_eq!(miss.path, [50, 25, 35, 40]);
        assert_eq!(viz.last_search(), Some(&miss));
    }

    #[test]
    fn test_select_searches_by_node_value() {
        let mut viz = Visualizer::default();
        let id = viz.tree().find(&70).unwrap().id();
        let report = viz.select(id).unwrap();

        assert_eq!(report.path, [50, 75, 65, 70]);
        assert_eq!(
            viz.highlights().marked_nodes(Mark::SearchPath),
            [viz.tree().root().unwrap().id()]
        );
    }

    #[test]
    fn test_traverse_output() {
        let mut viz = Visualizer::new(Config {
            seed: vec![50, 25, 75, 15, 35],
            ..Config::default()
        });

        assert_eq!(viz.traverse(Order::In), "INORDER: 15 → 25 → 35 → 50 → 75");
        assert_eq!(viz.traverse(Order::Pre), "PREORDER: 50 → 25 → 15 → 35 → 75");
        assert_eq!(viz.traverse(Order::Post), "POSTORDER: 15 → 35 → 25 → 75 → 50");
        assert_eq!(viz.last_traversal(), Some("POSTORDER: 15 → 35 → 25 → 75 → 50"));
    }

    #[test]
    fn test_delete_clears_marks() {
        let mut viz = Visualizer::default();
        let id = viz.insert(11).unwrap();
        let removed = viz.delete(11).unwrap();

        assert_eq!(id, removed);
        assert!(viz.highlights().is_clear());
        assert_eq!(viz.delete(11), Err(TreeError::ValueNotFound));
    }

    #[test]
    fn test_insert_unloads_stepper() {
        let mut viz = Visualizer::default();
        viz.load_stepper(Order::In);
        viz.step();
        let id = viz.insert(11).unwrap();

        assert_eq!(viz.stepper_state(), StepperState::Idle);
        assert!(viz.highlights().marked_nodes(Mark::Traversal).is_empty());
        assert_eq!(viz.highlights().node_marks(id), [Mark::Highlighted]);
    }

    #[test]
    fn test_failed_mutation_keeps_playback() {
        let mut viz = Visualizer::default();
        viz.traverse(Order::Pre);

        assert_eq!(viz.insert(50), Err(TreeError::DuplicateValue));
        assert_eq!(viz.delete(1000), Err(TreeError::ValueNotFound));
        assert!(viz.is_animating());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut viz = Visualizer::default();
        viz.traverse(Order::In);
        viz.search(35);
        viz.clear();
        viz.clear();

        assert!(viz.tree().is_empty());
        assert!(viz.hierarchy().is_none());
        assert!(viz.highlights().is_clear());
        assert!(!viz.is_animating());
        assert_eq!(viz.last_traversal(), None);
        assert_eq!(viz.traverse(Order::In), "INORDER: ");
    }
}
