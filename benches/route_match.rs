//! Route matching and dispatch throughput over flat and deep route sets.

use criterion::{criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;

use switchyard::nodes::StaticResponder;
use switchyard::{exchange, App, Graph, InboundRequest, Node, PathRouter, Phases};

fn flat_app(routes: usize) -> App {
  let mut g = Graph::builder();
  let target = g.add("bench", "ok", Node::responder(StaticResponder::new(200, "ok")));
  let mut router = PathRouter::new();
  for i in 0..routes {
    router.mount(&format!("/r{i}"), target).unwrap();
  }
  let route = g.add("bench", "router", Node::diverter(router));
  g.add_child(route, target).unwrap();
  App::new(g.finish().unwrap(), route, Phases::default()).unwrap()
}

fn deep_app() -> App {
  let mut g = Graph::builder();
  let target = g.add("bench", "ok", Node::responder(StaticResponder::new(200, "ok")));
  let mut router = PathRouter::new();
  router.mount("/api/v2/tenants/{tenant}/users/{id:[0-9]+}", target).unwrap();
  router.mount("/api/v2/tenants/{tenant}/users/me", target).unwrap();
  router.mount("/api/v2/tenants/{tenant}/**", target).unwrap();
  let route = g.add("bench", "router", Node::diverter(router));
  g.add_child(route, target).unwrap();
  App::new(g.finish().unwrap(), route, Phases::default()).unwrap()
}

fn route_match(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();

  let flat = flat_app(64);
  c.bench_function("flat_64_literal_hit", |b| {
    b.to_async(&rt)
      .iter(|| exchange(&flat, InboundRequest::new("GET", "/r42")));
  });

  let deep = deep_app();
  c.bench_function("deep_constrained_hit", |b| {
    b.to_async(&rt).iter(|| {
      exchange(
        &deep,
        InboundRequest::new("GET", "/api/v2/tenants/acme/users/42"),
      )
    });
  });

  c.bench_function("deep_glob_fallthrough", |b| {
    b.to_async(&rt).iter(|| {
      exchange(
        &deep,
        InboundRequest::new("GET", "/api/v2/tenants/acme/billing/history"),
      )
    });
  });

  c.bench_function("miss_to_fallback", |b| {
    b.to_async(&rt)
      .iter(|| exchange(&flat, InboundRequest::new("GET", "/missing")));
  });
}

criterion_group!(benches, route_match);
criterion_main!(benches);
