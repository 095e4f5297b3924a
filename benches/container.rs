use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use crucible_di::Container;
use std::sync::Arc;

struct Config {
    port: u16,
}

struct Pool {
    _config: Arc<Config>,
}

struct Repo {
    _pool: Arc<Pool>,
}

struct Service {
    _repo: Arc<Repo>,
}

struct Handler {
    _service: Arc<Service>,
}

trait Logger: Send + Sync {
    fn enabled(&self) -> bool;
}

struct NullLogger;

impl Logger for NullLogger {
    fn enabled(&self) -> bool {
        false
    }
}

fn register_chain(container: &Container) {
    container.bind(Config { port: 8080 }).unwrap();
    container
        .provide(|config: Arc<Config>| Pool { _config: config })
        .unwrap();
    container.provide(|pool: Arc<Pool>| Repo { _pool: pool }).unwrap();
    container
        .provide(|repo: Arc<Repo>| Service { _repo: repo })
        .unwrap();
    container
        .provide(|service: Arc<Service>| Handler { _service: service })
        .unwrap();
}

fn bench_inject_hit(c: &mut Criterion) {
    let container = Container::new();
    container.bind(Config { port: 8080 }).unwrap();
    container.build().unwrap();

    c.bench_function("inject_singleton_hit", |b| {
        b.iter(|| black_box(container.inject::<Config>().port))
    });
}

fn bench_inject_deep_graph(c: &mut Criterion) {
    let container = Container::new();
    register_chain(&container);
    container.build().unwrap();

    c.bench_function("inject_chain_leaf", |b| {
        b.iter(|| black_box(container.inject::<Handler>()))
    });
}

fn bench_inject_trait_object(c: &mut Criterion) {
    let container = Container::new();
    container
        .bind_arc::<dyn Logger>(Arc::new(NullLogger))
        .unwrap();
    container.build().unwrap();

    c.bench_function("inject_trait_object", |b| {
        b.iter(|| black_box(container.inject::<dyn Logger>().enabled()))
    });
}

fn bench_named_lookup(c: &mut Criterion) {
    let container = Container::new();
    container.bind_named("primary", 5432u16).unwrap();
    container.bind_named("replica", 5433u16).unwrap();
    container.build().unwrap();

    c.bench_function("inject_named", |b| {
        b.iter(|| black_box(*container.inject_named::<u16>("replica")))
    });
}

fn bench_cold_build(c: &mut Criterion) {
    c.bench_function("build_five_node_chain", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                register_chain(&container);
                container
            },
            |container| {
                container.build().unwrap();
                container
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("register_five_bindings", |b| {
        b.iter_batched(
            Container::new,
            |container| {
                register_chain(&container);
                container
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_inject_hit,
    bench_inject_deep_graph,
    bench_inject_trait_object,
    bench_named_lookup,
    bench_cold_build,
    bench_registration
);
criterion_main!(benches);
