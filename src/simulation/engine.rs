//! Background simulation worker and its control surface

use super::events::{EventBus, GridEvent};
use super::speed::Speed;
use crate::error::GridError;
use crate::game_of_life::{Grid, GridDocument, Rules};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

/// Rule and speed parameters the engine starts with
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub rules: Rules,
    pub speed: Speed,
}

/// One complete published generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Generations committed since the grid was created or last replaced
    pub generation: u64,
    pub grid: Grid,
}

#[derive(Debug)]
struct Control {
    running: bool,
    shutdown: bool,
    rules: Rules,
    speed: Speed,
}

#[derive(Debug)]
struct Shared {
    current: RwLock<Arc<Snapshot>>,
    // Serialises every writer so edits and step commits never overwrite each other
    writer: Mutex<()>,
    control: Mutex<Control>,
    wake: Condvar,
    events: EventBus,
}

/// Advances a [`Grid`] on a dedicated worker thread
///
/// Readers get immutable [`Snapshot`]s; the worker evolves the current
/// snapshot into a fresh grid without holding the read lock and publishes it
/// with a single pointer swap, so a reader never sees a half-computed
/// generation. Painting calls go through the same writer path as the commit.
#[derive(Debug)]
pub struct SimulationEngine {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl SimulationEngine {
    /// Wrap `grid` and spawn the worker, initially paused
    pub fn new(grid: Grid, config: SimulationConfig) -> Self {
        let shared = Arc::new(Shared {
            current: RwLock::new(Arc::new(Snapshot { generation: 0, grid })),
            writer: Mutex::new(()),
            control: Mutex::new(Control {
                running: false,
                shutdown: false,
                rules: config.rules,
                speed: config.speed,
            }),
            wake: Condvar::new(),
            events: EventBus::default(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || run_worker(worker_shared));

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Build an engine around a fresh dead grid
    pub fn with_dimensions(
        width: usize,
        height: usize,
        config: SimulationConfig,
    ) -> Result<Self, GridError> {
        Ok(Self::new(Grid::new(width, height)?, config))
    }

    pub fn start(&self) {
        if self.shared.set_running(true) {
            info!("simulation started");
            self.shared.events.publish(GridEvent::Started);
        }
    }

    /// Pause the worker. A generation already being computed still commits.
    pub fn stop(&self) {
        if self.shared.set_running(false) {
            info!("simulation stopped");
            self.shared.events.publish(GridEvent::Stopped);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.control().running
    }

    /// Commit exactly one generation and return its number
    ///
    /// Works whether or not the worker is running.
    pub fn step(&self) -> u64 {
        let generation = self.shared.step();
        debug!(generation, "manual step");
        generation
    }

    /// The latest complete generation
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    pub fn get_cell(&self, x: i64, y: i64) -> u32 {
        self.snapshot().grid.get(x, y)
    }

    pub fn set_cell(&self, x: i64, y: i64, value: u32) {
        self.shared.edit(|grid| grid.set(x, y, value));
    }

    pub fn fill(&self, value: u32) {
        self.shared.edit(|grid| grid.fill(value));
    }

    pub fn clear(&self) {
        self.shared.edit(Grid::clear);
    }

    /// Swap in a different grid and restart the generation count
    pub fn replace_grid(&self, grid: Grid) {
        let (width, height) = (grid.width(), grid.height());
        {
            let _writer = self.shared.lock_writer();
            self.shared.publish(Snapshot {
                generation: 0,
                grid,
            });
        }
        info!(width, height, "grid replaced");
        self.shared
            .events
            .publish(GridEvent::Replaced { width, height });
    }

    /// Replace the grid with a loaded document
    ///
    /// A malformed document is rejected before anything is published.
    pub fn load(&self, document: &GridDocument) -> Result<(), GridError> {
        let grid = document.to_grid().map_err(|e| {
            warn!(error = %e, "rejected grid document");
            e
        })?;
        self.replace_grid(grid);
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        self.shared.control().rules
    }

    pub fn set_rules(&self, rules: Rules) {
        self.shared.update(|control| control.rules = rules);
    }

    pub fn set_thresholds(&self, overpopulation_threshold: u8, starvation_threshold: u8) {
        self.set_rules(Rules::new(overpopulation_threshold, starvation_threshold));
    }

    pub fn speed(&self) -> Speed {
        self.shared.control().speed
    }

    pub fn set_speed(&self, speed: Speed) {
        self.shared.update(|control| control.speed = speed);
    }

    pub fn set_speed_divider(&self, speed_divider: f64) {
        self.shared
            .update(|control| control.speed.speed_divider = speed_divider);
    }

    pub fn set_full_speed(&self, full_speed: bool) {
        self.shared
            .update(|control| control.speed.full_speed = full_speed);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.shared.update(|control| control.speed.delay_ms = delay_ms);
    }

    /// Receive a [`GridEvent`] for every change from now on
    pub fn subscribe(&self) -> Receiver<GridEvent> {
        self.shared.events.subscribe()
    }

    /// Stop the worker and wait for it to exit
    pub fn shutdown(mut self) {
        self.join_worker();
    }

    fn join_worker(&mut self) {
        self.shared.update(|control| control.shutdown = true);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("simulation worker panicked");
            }
        }
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.join_worker();
    }
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a control change and wake the worker
    fn update(&self, change: impl FnOnce(&mut Control)) {
        change(&mut *self.control());
        self.wake.notify_all();
    }

    /// Returns whether the flag actually changed
    fn set_running(&self, running: bool) -> bool {
        let changed = {
            let mut control = self.control();
            let changed = control.running != running;
            control.running = running;
            changed
        };
        self.wake.notify_all();
        changed
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    fn publish(&self, snapshot: Snapshot) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(snapshot);
    }

    fn step(&self) -> u64 {
        let rules = self.control().rules;
        let generation = {
            let _writer = self.lock_writer();
            let current = self.snapshot();
            let next = rules.evolve(&current.grid);
            let generation = current.generation + 1;
            self.publish(Snapshot {
                generation,
                grid: next,
            });
            generation
        };
        self.events.publish(GridEvent::Stepped { generation });
        generation
    }

    fn edit(&self, change: impl FnOnce(&mut Grid)) {
        let generation = {
            let _writer = self.lock_writer();
            let current = self.snapshot();
            let mut grid = current.grid.clone();
            change(&mut grid);
            self.publish(Snapshot {
                generation: current.generation,
                grid,
            });
            current.generation
        };
        self.events.publish(GridEvent::Edited { generation });
    }

    /// Block while paused. Returns false once shutdown is requested.
    fn wait_until_running(&self) -> bool {
        let control = self
            .wake
            .wait_while(self.control(), |c| !c.running && !c.shutdown)
            .unwrap_or_else(PoisonError::into_inner);
        !control.shutdown
    }

    /// Sleep out the speed delay, waking early on stop or shutdown.
    /// Returns false once shutdown is requested.
    fn pause_between_steps(&self) -> bool {
        let control = self.control();
        let delay = control.speed.step_delay();
        if delay.is_zero() {
            return !control.shutdown;
        }

        let (control, _) = self
            .wake
            .wait_timeout_while(control, delay, |c| c.running && !c.shutdown)
            .unwrap_or_else(PoisonError::into_inner);
        !control.shutdown
    }
}

fn run_worker(shared: Arc<Shared>) {
    debug!("simulation worker started");
    while shared.wait_until_running() {
        let generation = shared.step();
        trace!(generation, "generation committed");
        if !shared.pause_between_steps() {
            break;
        }
    }
    info!("simulation worker shut down");
}
