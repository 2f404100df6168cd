//! URL construction benchmark.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use wsclient::origin::{NoAmbientOrigin, PageOrigin};
use wsclient::{ConnectionConfig, ConnectionOptions};

fn socket_urls(c: &mut Criterion) {
    let with_port = ConnectionConfig::resolve(
        ConnectionOptions::new().host("127.0.0.1").port(9000),
        &NoAmbientOrigin,
    );
    let without_port =
        ConnectionConfig::resolve(ConnectionOptions::new().secure(true), &NoAmbientOrigin);

    c.bench_function("socket_url_with_port", |b| {
        b.iter(|| black_box(&with_port).socket_url())
    });

    c.bench_function("socket_url_without_port", |b| {
        b.iter(|| black_box(&without_port).socket_url())
    });

    c.bench_function("parsed_socket_url", |b| {
        b.iter(|| black_box(&with_port).parsed_socket_url())
    });
}

fn resolve_config(c: &mut Criterion) {
    let page = PageOrigin::from_protocol("https:");

    c.bench_function("resolve_defaults", |b| {
        b.iter(|| ConnectionConfig::resolve(ConnectionOptions::new(), &page))
    });
}

criterion_group!(benches, socket_urls, resolve_config);
criterion_main!(benches);
