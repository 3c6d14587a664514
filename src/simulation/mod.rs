//! Background generation stepping with run/pause/step/speed control

pub mod engine;
pub mod events;
pub mod speed;

pub use engine::{SimulationConfig, SimulationEngine, Snapshot};
pub use events::{GridEvent, EVENT_QUEUE_CAPACITY};
pub use speed::Speed;
