//! CLI: Send one request through a demo gateway graph.
//!
//! The graph wires a header-stamping pre and post chain, a path router
//! with a constrained param route, a legacy prefix rescued by a
//! path-rewrite fuse, an always-failing route, and a JSON error catcher.
//!
//! Usage: `run_request [OPTIONS] <target>`
//! Example: run_request /items/42
//!
//! Set RUST_LOG=switchyard=trace for TRACE-level span enter/exit and events.

use async_trait::async_trait;
use clap::Parser;
use std::process;
use switchyard::error::PipelineError;
use switchyard::node::{RequestHandler, Responder};
use switchyard::nodes::{
  ErrorResponder, PathRewrite, SetRequestHeader, SetResponseHeader, StaticResponder,
};
use switchyard::{
  exchange, App, Graph, InboundRequest, Node, PathRouter, Phases, Request, Response, WiringError,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Send one request through the demo gateway graph.
#[derive(Parser, Debug)]
#[command(name = "run_request")]
#[command(
  after_help = r#"Routes:
  /hello              greeting
  /items/{id:[0-9]+}  echoes the captured id
  /old/**             failing legacy handler rescued by a path-rewrite fuse
  /fail               always fails; settled by the JSON error catcher

Examples:
  run_request /items/42
  run_request --method POST --header x-tenant:acme /items/42"#
)]
struct Args {
  /// Request method
  #[arg(long, default_value = "GET")]
  method: String,

  /// Request header as NAME:VALUE; repeatable
  #[arg(long, value_name = "NAME:VALUE")]
  header: Vec<String>,

  /// Origin-form request target, e.g. /items/42?verbose=1
  #[arg(value_name = "target")]
  target: String,
}

struct ItemResponder;

#[async_trait]
impl Responder for ItemResponder {
  async fn respond(&self, req: &mut Request) -> Result<Response, PipelineError> {
    let id = req.param("id").unwrap_or("?").to_string();
    let mut res = req.respond();
    res.set_header("content-type", "text/plain");
    res.write(format!("item {id}\n")).await?;
    Ok(res)
  }
}

struct LegacyUpstream;

#[async_trait]
impl RequestHandler for LegacyUpstream {
  async fn handle(&self, _req: &mut Request) -> Result<(), PipelineError> {
    Err(PipelineError::status(502, "legacy upstream is gone"))
  }
}

struct AlwaysFail;

#[async_trait]
impl RequestHandler for AlwaysFail {
  async fn handle(&self, _req: &mut Request) -> Result<(), PipelineError> {
    Err(PipelineError::status(500, "simulated failure"))
  }
}

fn build_app() -> Result<App, WiringError> {
  let mut g = Graph::builder();

  let hello = g.add(
    "demo",
    "hello",
    Node::responder(StaticResponder::new(200, "hello from switchyard\n")),
  );
  let item = g.add("demo", "item", Node::responder(ItemResponder));
  let legacy = g.add("demo", "legacy", Node::handler(LegacyUpstream));
  let fail = g.add("demo", "always-fail", Node::handler(AlwaysFail));

  let mut router = PathRouter::new();
  router.mount("/hello", hello)?;
  router.mount("/items/{id:[0-9]+}", item)?;
  router.mount("/old/**", legacy)?;
  router.mount("/fail", fail)?;
  let route = g.add("demo", "router", Node::diverter(router));
  for child in [hello, item, legacy, fail] {
    g.add_child(route, child)?;
  }

  let rescue = g.add("demo", "rescue", Node::fuse(PathRewrite::new("/hello")));
  g.set_next(rescue, hello)?;
  g.add_fuse(legacy, rescue)?;

  let pre = g.add(
    "demo",
    "stamp-request",
    Node::global_pre(SetRequestHeader::new("x-gateway", "switchyard")),
  );
  let post = g.add(
    "demo",
    "stamp-response",
    Node::global_post(SetResponseHeader::new("x-gateway", "switchyard")),
  );
  let catcher = g.add("demo", "errors", Node::exception_handler(ErrorResponder::new()));

  App::new(
    g.finish()?,
    route,
    Phases {
      pre: Some(pre),
      post: Some(post),
      catchers: vec![catcher],
    },
  )
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();
  info!(method = %args.method, target = %args.target, "run_request starting");

  let app = match build_app() {
    Ok(app) => app,
    Err(e) => {
      eprintln!("Wiring error: {}", e);
      process::exit(1);
    }
  };

  let mut inbound = InboundRequest::new(args.method, args.target);
  for header in &args.header {
    match header.split_once(':') {
      Some((name, value)) => inbound = inbound.header(name.trim(), value.trim()),
      None => {
        eprintln!("Invalid --header {:?}; expected NAME:VALUE", header);
        process::exit(1);
      }
    }
  }

  let out = exchange(&app, inbound).await;

  println!("HTTP {}", out.status);
  for (name, value) in &out.headers {
    println!("{}: {}", name, value);
  }
  if !out.body.is_empty() {
    println!();
    print!("{}", String::from_utf8_lossy(&out.body));
  }
  if out.status >= 500 {
    process::exit(1);
  }
}
