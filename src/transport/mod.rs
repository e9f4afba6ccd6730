//! HTTP transport.

mod http;

pub use http::{tool_transport, HttpTransport, TransportError};
