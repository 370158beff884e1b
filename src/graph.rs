//! Arena graph of containers plus the validating builder.

use tracing::debug;

use crate::error::WiringError;
use crate::node::Node;
use crate::types::{Container, ContainerId, Edge};

/// Immutable, validated container graph.
///
/// Containers live in an arena; all wiring is by [`ContainerId`]. Shared
/// subtrees are legal, cycles along execution edges are not.
#[derive(Debug, Clone)]
pub struct Graph {
  containers: Vec<Container>,
}

impl Graph {
  pub fn builder() -> GraphBuilder {
    GraphBuilder::new()
  }

  pub fn container(&self, id: ContainerId) -> &Container {
    &self.containers[id.index()]
  }

  pub fn contains(&self, id: ContainerId) -> bool {
    id.index() < self.containers.len()
  }

  pub fn len(&self) -> usize {
    self.containers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.containers.is_empty()
  }
}

/// Assembly surface for a graph.
///
/// The loader resolves `(module, name)` pairs to node instances out of
/// scope of this crate and hands them over fully built; `finish` runs the
/// validation pass and freezes the graph before the first request.
#[derive(Debug, Default)]
pub struct GraphBuilder {
  containers: Vec<Container>,
}

impl GraphBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a container with no wiring and returns its id.
  pub fn add(
    &mut self,
    module: impl Into<String>,
    name: impl Into<String>,
    node: Node,
  ) -> ContainerId {
    let id = ContainerId(self.containers.len());
    self.containers.push(Container {
      module: module.into(),
      name: name.into(),
      node,
      next: Edge::None,
      fuses: Vec::new(),
      handlers: Vec::new(),
    });
    id
  }

  /// Wires the single continuation of a non-fan-out container.
  pub fn set_next(&mut self, from: ContainerId, to: ContainerId) -> Result<(), WiringError> {
    self.check(from)?;
    self.check(to)?;
    let container = &mut self.containers[from.index()];
    if container.node.fans_out() {
      return Err(WiringError::EdgeShape {
        container: container.label(),
        detail: format!("a {} takes children, not a single next", container.node.kind()),
      });
    }
    container.next = Edge::Single(to);
    Ok(())
  }

  /// Appends a child lane to a diverter or replicator.
  pub fn add_child(&mut self, from: ContainerId, child: ContainerId) -> Result<(), WiringError> {
    self.check(from)?;
    self.check(child)?;
    let container = &mut self.containers[from.index()];
    if !container.node.fans_out() {
      return Err(WiringError::EdgeShape {
        container: container.label(),
        detail: format!("a {} takes a single next, not children", container.node.kind()),
      });
    }
    match &mut container.next {
      Edge::Many(ids) => ids.push(child),
      next => *next = Edge::Many(vec![child]),
    }
    Ok(())
  }

  /// Appends a local fuse; fuses are tried in order, before handlers.
  pub fn add_fuse(&mut self, at: ContainerId, fuse: ContainerId) -> Result<(), WiringError> {
    self.check(at)?;
    self.check(fuse)?;
    let target = &self.containers[fuse.index()];
    if !matches!(target.node, Node::Fuse(_)) {
      return Err(WiringError::NotAFuse {
        container: target.label(),
        kind: target.node.kind(),
      });
    }
    self.containers[at.index()].fuses.push(fuse);
    Ok(())
  }

  /// Appends a local exception handler; tried in order, after fuses.
  pub fn add_handler(&mut self, at: ContainerId, handler: ContainerId) -> Result<(), WiringError> {
    self.check(at)?;
    self.check(handler)?;
    let target = &self.containers[handler.index()];
    if !matches!(target.node, Node::ExceptionHandler(_)) {
      return Err(WiringError::NotAHandler {
        container: target.label(),
        kind: target.node.kind(),
      });
    }
    self.containers[at.index()].handlers.push(handler);
    Ok(())
  }

  /// Validates acyclicity along execution edges and freezes the graph.
  pub fn finish(self) -> Result<Graph, WiringError> {
    detect_cycles(&self.containers)?;
    debug!(containers = self.containers.len(), "graph validated");
    Ok(Graph {
      containers: self.containers,
    })
  }

  fn check(&self, id: ContainerId) -> Result<(), WiringError> {
    if id.index() >= self.containers.len() {
      return Err(WiringError::UnknownContainer(id));
    }
    Ok(())
  }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
  Unvisited,
  OnPath,
  Done,
}

/// Depth-first cycle check over next edges, fuses, and handlers.
fn detect_cycles(containers: &[Container]) -> Result<(), WiringError> {
  let mut marks = vec![Mark::Unvisited; containers.len()];
  for id in 0..containers.len() {
    visit(containers, id, &mut marks)?;
  }
  Ok(())
}

fn visit(containers: &[Container], id: usize, marks: &mut [Mark]) -> Result<(), WiringError> {
  match marks[id] {
    Mark::OnPath => {
      return Err(WiringError::Cycle {
        container: containers[id].label(),
      });
    }
    Mark::Done => return Ok(()),
    Mark::Unvisited => {}
  }
  marks[id] = Mark::OnPath;
  let container = &containers[id];
  let mut out: Vec<usize> = Vec::new();
  match &container.next {
    Edge::None => {}
    Edge::Single(next) => out.push(next.index()),
    Edge::Many(ids) => out.extend(ids.iter().map(|i| i.index())),
  }
  out.extend(container.fuses.iter().map(|i| i.index()));
  out.extend(container.handlers.iter().map(|i| i.index()));
  for next in out {
    visit(containers, next, marks)?;
  }
  marks[id] = Mark::Done;
  Ok(())
}
