pub mod clock;
pub mod engine;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod simulation;

pub use clock::{unix_millis, SimulationClock, DEFAULT_TICK_INTERVAL};
pub use engine::SimEngine;
pub use simulation::{Simulation, TickReport};
