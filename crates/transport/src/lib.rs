#![forbid(unsafe_code)]

pub mod http;
pub mod memory;
pub mod port;

pub use http::{HttpProgressConfig, HttpProgressTransport};
pub use memory::InMemoryTransport;
pub use port::{ProgressTransport, TransportError};
