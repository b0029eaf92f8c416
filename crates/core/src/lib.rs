#![forbid(unsafe_code)]

pub mod error;
pub mod gate;
pub mod model;
pub mod progress;
pub mod scorm;
pub mod time;

pub use error::Error;
pub use gate::PlaybackGate;
pub use time::Clock;
