//! Core module - event plumbing shared by ingestion, dispatch and fan-out

mod event_bus;

pub use event_bus::{EventBus, SensorEvent};
