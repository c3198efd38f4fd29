use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hecrypt_core::*;

fn orchestrator() -> Orchestrator {
    let contexts = ContextManager::initialize(&SchemesConfig::insecure_fast()).unwrap();
    Orchestrator::new(Arc::new(contexts))
}

fn sample_text() -> String {
    "The quick brown fox jumps over the lazy dog. ".repeat(8)
}

fn bench_encrypt(c: &mut Criterion) {
    let orch = orchestrator();
    let text = sample_text();

    for id in SchemeId::ALL {
        let request = MethodRequest::from(id);
        c.bench_function(&format!("encrypt_{id}_360_chars"), |b| {
            b.iter(|| orch.run(black_box(&text), &request))
        });
    }
}

fn bench_decrypt(c: &mut Criterion) {
    let orch = orchestrator();
    let batch = orch.run(&sample_text(), &MethodRequest::All).unwrap();

    for result in batch.successes() {
        let tag = result.method.as_str();
        c.bench_function(&format!("decrypt_{tag}_360_chars"), |b| {
            b.iter(|| orch.run_decrypt(tag, black_box(&result.encrypted_data)))
        });
    }
}

fn bench_package(c: &mut Criterion) {
    let orch = orchestrator();
    let batch = orch.run(&sample_text(), &MethodRequest::from(SchemeId::Bfv)).unwrap();
    let result = batch.successes().next().unwrap().clone();

    c.bench_function("package_bfv_artifact", |b| b.iter(|| result.package()));
}

criterion_group!(benches, bench_encrypt, bench_decrypt, bench_package);
criterion_main!(benches);
