//! Value types flowing through the graph: requests, responses, bodies,
//! traces, contexts, and container records.

mod body;
mod container;
mod context;
mod request;
mod response;
mod trace;

pub use body::{BodySink, BodyWriter, BufferedBody};
pub use container::{Container, ContainerId, Edge};
pub use context::RequestContext;
pub use request::Request;
pub use response::Response;
pub use trace::Trace;
