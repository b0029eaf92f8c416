mod bridge;
mod registry;

pub use bridge::ScormBridge;
pub use registry::{API_GLOBAL_NAMES, InMemoryHost, ScormHost, ScormMount, ScormRegistry};
