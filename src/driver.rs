use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::engine;
use crate::grid::Grid;

/// Bounds for the tick interval, matching the UI's speed slider range.
pub const MIN_INTERVAL: Duration = Duration::from_millis(20);
pub const MAX_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Clamp an interval into the supported range.
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// Commands accepted by the driver thread.
enum Command {
    Start,
    Stop,
    Step,
    SetInterval(Duration),
    Randomize,
    Clear,
    ToggleCell(usize, usize),
    SetGrid(Grid),
    Shutdown,
}

/// Point-in-time view of the simulation for display.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub grid: Grid,
    pub generation: u64,
    pub running: bool,
    pub interval: Duration,
}

struct Shared {
    grid: Grid,
    generation: u64,
    running: bool,
    interval: Duration,
}

/// Handle to the simulation driver thread.
///
/// The driver owns the grid and is the only writer to it, so the engine is
/// always invoked from a single scheduling context. Ticking is a re-armed
/// single-shot wait: while running, the thread blocks in `recv_timeout`
/// with the current interval, and a timeout is the tick. Any command wakes
/// the wait, takes effect, and the next wait re-reads the run flag and
/// interval fresh, so there is never more than one pending tick and an
/// interval change applies from the very next reschedule.
pub struct Driver {
    tx: Sender<Command>,
    shared: Arc<Mutex<Shared>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Driver {
    /// Spawn a driver around an initial grid, stopped, at the given interval.
    pub fn spawn(grid: Grid, interval: Duration) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            grid,
            generation: 0,
            running: false,
            interval: clamp_interval(interval),
        }));
        let (tx, rx) = mpsc::channel::<Command>();

        let thread_shared = Arc::clone(&shared);
        let thread = thread::spawn(move || {
            loop {
                let (running, interval) = {
                    let s = thread_shared.lock().unwrap();
                    (s.running, s.interval)
                };

                let command = if running {
                    match rx.recv_timeout(interval) {
                        Ok(cmd) => Some(cmd),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                } else {
                    match rx.recv() {
                        Ok(cmd) => Some(cmd),
                        Err(_) => break,
                    }
                };

                let mut s = thread_shared.lock().unwrap();
                match command {
                    // Timer fired: one generation.
                    None => {
                        s.grid = engine::advance(&s.grid);
                        s.generation += 1;
                    }
                    Some(Command::Start) => s.running = true,
                    Some(Command::Stop) => s.running = false,
                    Some(Command::Step) => {
                        s.grid = engine::advance(&s.grid);
                        s.generation += 1;
                    }
                    Some(Command::SetInterval(i)) => s.interval = clamp_interval(i),
                    Some(Command::Randomize) => {
                        s.grid = Grid::random(
                            s.grid.rows(),
                            s.grid.cols(),
                            crate::grid::DEFAULT_FILL,
                            &mut rand::thread_rng(),
                        );
                        s.generation = 0;
                    }
                    Some(Command::Clear) => {
                        s.grid = Grid::empty(s.grid.rows(), s.grid.cols());
                        s.generation = 0;
                        s.running = false;
                    }
                    Some(Command::ToggleCell(r, c)) => {
                        if r < s.grid.rows() && c < s.grid.cols() {
                            s.grid.toggle(r, c);
                        } else {
                            log::warn!("toggle ({r}, {c}) out of bounds, ignored");
                        }
                    }
                    Some(Command::SetGrid(grid)) => {
                        s.grid = grid;
                        s.generation = 0;
                        s.running = false;
                    }
                    Some(Command::Shutdown) => break,
                }
            }
        });

        Self {
            tx,
            shared,
            thread: Some(thread),
        }
    }

    /// Spawn with the default empty 30×30 grid and default interval.
    pub fn spawn_default() -> Self {
        Self::spawn(Grid::empty_default(), DEFAULT_INTERVAL)
    }

    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Advance exactly one generation (works while stopped).
    pub fn step(&self) {
        self.send(Command::Step);
    }

    /// Change the tick cadence; takes effect on the next reschedule.
    pub fn set_interval(&self, interval: Duration) {
        self.send(Command::SetInterval(interval));
    }

    /// Replace the grid with a fresh random fill; resets the generation.
    pub fn randomize(&self) {
        self.send(Command::Randomize);
    }

    /// Kill every cell, reset the generation, and stop.
    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    /// Flip one cell. Out-of-bounds coordinates are logged and ignored.
    pub fn toggle_cell(&self, r: usize, c: usize) {
        self.send(Command::ToggleCell(r, c));
    }

    /// Replace the grid (e.g. a loaded save); resets the generation and stops.
    pub fn set_grid(&self, grid: Grid) {
        self.send(Command::SetGrid(grid));
    }

    /// Clone the current state for display.
    pub fn snapshot(&self) -> Snapshot {
        let s = self.shared.lock().unwrap();
        Snapshot {
            grid: s.grid.clone(),
            generation: s.generation,
            running: s.running,
            interval: s.interval,
        }
    }

    fn send(&self, command: Command) {
        // The thread only exits on Shutdown/drop, so send failures are
        // limited to teardown races and safe to ignore.
        let _ = self.tx.send(command);
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
