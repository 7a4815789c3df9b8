use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use bst_viz::display::render_to_string;
use bst_viz::{Config, ConfigError, InputError, Order, Visualizer};

/// bst-viz - drive a binary search tree and its traversal animations from the terminal
///
/// Reads one command per line from stdin. Type `help` for the list.
#[derive(Parser)]
#[command(name = "bst-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML file with seed values and animation timings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start from an empty tree instead of the seed values
    #[arg(long)]
    empty: bool,

    /// Print the tree as a JSON hierarchy instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const HELP: &str = "\
commands:
  insert N | delete N | search N
  inorder | preorder | postorder   play a traversal
  load ORDER | play | pause | step   stepped traversal
  tick MS                          advance the animation clock
  show | clear | help | quit
";

#[derive(Debug, PartialEq)]
enum Command {
    Insert(String),
    Delete(String),
    Search(String),
    Traverse(Order),
    Load(Order),
    Play,
    Pause,
    Step,
    Tick(String),
    Show,
    Clear,
    Help,
    Quit,
    Nothing,
}

impl Command {
    fn parse(line: &str) -> Result<Self, InputError> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Command::Nothing);
        };
        let arg = words.collect::<Vec<_>>().join(" ");

        let command = match word.to_ascii_lowercase().as_str() {
            "insert" | "i" => Command::Insert(arg),
            "delete" | "d" => Command::Delete(arg),
            "search" | "s" => Command::Search(arg),
            "load" => Command::Load(arg.parse()?),
            "play" => Command::Play,
            "pause" => Command::Pause,
            "step" => Command::Step,
            "tick" | "t" => Command::Tick(arg),
            "show" => Command::Show,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Traverse(
                other
                    .parse::<Order>()
                    .map_err(|_| InputError::UnknownCommand(other.to_string()))?,
            ),
        };
        Ok(command)
    }
}

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.empty {
            config.seed.clear();
        }
        let mut viz = Visualizer::new(config);

        let stdin = io::stdin();
        let mut out = io::stdout().lock();
        self.print_tree(&viz, &mut out)?;

        for line in stdin.lock().lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(&mut viz, command, &mut out)?,
                Err(e) => writeln!(out, "{e}")?,
            }
            out.flush()?;
        }

        Ok(())
    }

    fn execute(
        &self,
        viz: &mut Visualizer,
        command: Command,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        match command {
            Command::Insert(arg) => match Visualizer::parse_value(&arg) {
                Ok(value) => match viz.insert(value) {
                    Ok(_) => self.print_tree(viz, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Delete(arg) => match Visualizer::parse_value(&arg) {
                Ok(value) => match viz.delete(value) {
                    Ok(_) => self.print_tree(viz, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Search(arg) => match Visualizer::parse_value(&arg) {
                Ok(value) => writeln!(out, "{}", viz.search(value).text())?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Traverse(order) => writeln!(out, "{}", viz.traverse(order))?,
            Command::Load(order) => {
                let steps = viz.load_stepper(order);
                writeln!(out, "loaded {} steps ({})", steps, order.label())?;
            }
            Command::Play => {
                if !viz.play() {
                    writeln!(out, "nothing to play")?;
                }
                write!(out, "{}", viz.render())?;
            }
            Command::Pause => {
                if !viz.pause() {
                    writeln!(out, "not playing")?;
                }
            }
            Command::Step => {
                if !viz.step() {
                    writeln!(out, "nothing to step")?;
                }
                write!(out, "{}", viz.render())?;
            }
            Command::Tick(arg) => match arg.trim().parse::<u64>() {
                Ok(ms) => {
                    viz.tick(Duration::from_millis(ms));
                    write!(out, "{}", viz.render())?;
                }
                Err(_) => writeln!(out, "{}", InputError::InvalidNumber(arg))?,
            },
            Command::Show => write!(out, "{}", viz.render())?,
            Command::Clear => {
                viz.clear();
                self.print_tree(viz, out)?;
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit | Command::Nothing => {}
        }
        Ok(())
    }

    fn print_tree(&self, viz: &Visualizer, out: &mut impl Write) -> Result<(), CliError> {
        if self.json {
            serde_json::to_writer_pretty(&mut *out, &viz.hierarchy())?;
            writeln!(out)?;
        } else {
            write!(out, "{}", render_to_string(viz.tree()))?;
        }
        Ok(())
    }
}
