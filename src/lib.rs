//! # switchyard
//!
//! An HTTP intermediary core: requests traverse a directed graph of
//! typed node containers, and the node kind found in each container
//! decides how traversal continues.
//!
//! ## Architecture
//!
//! A [`Graph`] is an arena of containers, each holding one [`Node`] and
//! its wiring. The [`Pipeline`] dispatches on the node kind: handlers
//! chain, diverters pick one child, replicators fan out over detached
//! branches, responders settle the lineage. Errors climb the traversal
//! path through per-container fuses and exception handlers, then the
//! [`App`]-wide catchers, then the default fallback. [`exchange`] is the
//! transport-facing edge of the whole assembly.

pub mod app;
pub mod boundary;
#[cfg(test)]
mod boundary_test;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod router;
pub mod types;

pub use app::{App, Phases};
pub use boundary::{exchange, InboundRequest, OutboundResponse};
pub use dispatch::{Outcome, Pipeline};
pub use error::{PipelineError, WiringError};
pub use graph::{Graph, GraphBuilder};
pub use node::Node;
pub use router::PathRouter;
pub use types::{Request, RequestContext, Response};
