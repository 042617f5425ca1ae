use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::commentary::{Analyst, CommentaryError};
use crate::config::Config;
use crate::driver::{Driver, Snapshot};
use crate::grid::{pattern_blinker, pattern_block, pattern_glider, Grid};
use crate::store;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Start,
    Stop,
    Step,
    Speed(u64),
    Random,
    Clear,
    Toggle(usize, usize),
    Pattern(&'static str),
    Save,
    Load,
    Show,
    Analyze,
    Help,
    Quit,
}

/// Parse a command line. Bounds and numeric validation happen here, since
/// the core assumes valid indices and the UI is the gatekeeper.
fn parse_command(line: &str) -> Result<Action, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Action::Show);
    };
    let action = match head {
        "start" | "run" => Action::Start,
        "stop" | "pause" => Action::Stop,
        "step" => Action::Step,
        "speed" => {
            let arg = words.next().ok_or("usage: speed <ms>")?;
            let ms: u64 = arg.parse().map_err(|_| format!("not a number: {arg}"))?;
            Action::Speed(ms)
        }
        "random" => Action::Random,
        "clear" => Action::Clear,
        "toggle" => {
            let r = words.next().ok_or("usage: toggle <row> <col>")?;
            let c = words.next().ok_or("usage: toggle <row> <col>")?;
            let r: usize = r.parse().map_err(|_| format!("not a number: {r}"))?;
            let c: usize = c.parse().map_err(|_| format!("not a number: {c}"))?;
            Action::Toggle(r, c)
        }
        "pattern" => {
            let name = words.next().ok_or("usage: pattern <glider|blinker|block>")?;
            match name {
                "glider" => Action::Pattern("glider"),
                "blinker" => Action::Pattern("blinker"),
                "block" => Action::Pattern("block"),
                other => return Err(format!("unknown pattern: {other}")),
            }
        }
        "save" => Action::Save,
        "load" => Action::Load,
        "show" => Action::Show,
        "analyze" => Action::Analyze,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(action)
}

/// Render a snapshot as an ASCII frame with a status header.
fn render(snapshot: &Snapshot) -> String {
    let grid = &snapshot.grid;
    let status = if snapshot.running { "running" } else { "stopped" };
    let mut out = format!(
        "gen {} | pop {} | {} | {} ms\n",
        snapshot.generation,
        grid.population(),
        status,
        snapshot.interval.as_millis(),
    );
    out.push_str(&"-".repeat(grid.cols()));
    out.push('\n');
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            out.push(if grid.get(r, c) { 'O' } else { '.' });
        }
        out.push('\n');
    }
    out
}

const HELP: &str = "\
Commands:
  start | stop        run / pause the simulation
  step                advance one generation
  speed <ms>          set tick interval (20-1000 ms)
  random              randomize the grid
  clear               kill every cell and stop
  toggle <row> <col>  flip one cell
  pattern <name>      place glider, blinker, or block at the center
  save | load         persist / restore the grid
  show                redraw the grid
  analyze             ask the AI service about the current pattern
  help                this text
  quit                exit";

/// Interactive front end wiring the driver, store, and commentary together.
pub struct App {
    driver: Driver,
    config: Config,
    analyst: Option<Analyst>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let analyst = Analyst::from_config(&config);
        if analyst.is_none() {
            log::info!("commentary service disabled (no API key configured)");
        }
        let driver = Driver::spawn(Grid::empty_default(), config.interval);
        Self {
            driver,
            config,
            analyst,
        }
    }

    /// Read commands from stdin until quit or EOF.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        println!("{HELP}");
        print!("> ");
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            if !self.handle_line(&line) {
                break;
            }
            print!("> ");
            stdout.flush()?;
        }
        Ok(())
    }

    /// Execute one line. Returns `false` when the app should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Err(msg) => println!("{msg}"),
            Ok(Action::Quit) => return false,
            Ok(Action::Help) => println!("{HELP}"),
            Ok(action) => {
                self.apply(action);
                // Brief grace period so driver commands land before the redraw.
                std::thread::sleep(Duration::from_millis(10));
                println!("{}", render(&self.driver.snapshot()));
            }
        }
        true
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Start => self.driver.start(),
            Action::Stop => self.driver.stop(),
            Action::Step => self.driver.step(),
            Action::Speed(ms) => self.driver.set_interval(Duration::from_millis(ms)),
            Action::Random => self.driver.randomize(),
            Action::Clear => self.driver.clear(),
            Action::Toggle(r, c) => {
                let snapshot = self.driver.snapshot();
                if r < snapshot.grid.rows() && c < snapshot.grid.cols() {
                    self.driver.toggle_cell(r, c);
                } else {
                    println!(
                        "cell ({r}, {c}) is outside the {}x{} grid",
                        snapshot.grid.rows(),
                        snapshot.grid.cols()
                    );
                }
            }
            Action::Pattern(name) => {
                let offsets = match name {
                    "glider" => pattern_glider(),
                    "blinker" => pattern_blinker(),
                    _ => pattern_block(),
                };
                let mut grid = self.driver.snapshot().grid;
                grid.place_pattern(&offsets, None);
                self.driver.set_grid(grid);
            }
            Action::Save => {
                let snapshot = self.driver.snapshot();
                match store::save_grid(&self.config.state_path, &snapshot.grid) {
                    Ok(()) => println!("state saved to {}", self.config.state_path.display()),
                    Err(e) => {
                        log::error!("save failed: {e}");
                        println!("{e}");
                    }
                }
            }
            Action::Load => match store::load_grid(&self.config.state_path) {
                // The grid is only replaced on success; a bad file leaves
                // the current simulation untouched.
                Ok(grid) => {
                    self.driver.set_grid(grid);
                    println!("state loaded");
                }
                Err(e) => {
                    log::warn!("load failed: {e}");
                    println!("{e}");
                }
            },
            Action::Analyze => {
                let snapshot = self.driver.snapshot();
                if snapshot.grid.is_empty_of_life() {
                    // No point in a network round trip for a lifeless grid.
                    println!("{}", CommentaryError::EmptyGrid);
                    return;
                }
                match &self.analyst {
                    None => println!("API key is not set. Please configure GEMINI_API_KEY."),
                    Some(analyst) => match analyst.analyze(&snapshot.grid) {
                        Ok(text) => println!("{text}"),
                        Err(e) => {
                            log::warn!("analysis failed: {e}");
                            println!("{e}");
                        }
                    },
                }
            }
            Action::Show | Action::Help | Action::Quit => {}
        }
    }
}
