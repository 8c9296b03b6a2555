//! Evaluation throughput over the builtin catalog and scenarios.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vigil_analysis::catalog::RuleCatalog;
use vigil_analysis::pipeline::AuditPipeline;
use vigil_analysis::{dpa, synthetic};
use vigil_core::config::AuditConfig;

fn bench_evaluate(c: &mut Criterion) {
    let config = AuditConfig::default();
    let catalog = RuleCatalog::builtin(&config).unwrap();
    let pipeline = AuditPipeline::new(&catalog, &config).unwrap();

    let transcripts = synthetic::generate_all(1_700_000_000);
    let with_metrics: Vec<_> = transcripts
        .iter()
        .map(|t| {
            let (_, m) = dpa::synthesize_metrics(
                t,
                dpa::DpaBias::Normal,
                config.process.gap_threshold_sec,
            );
            (t, m)
        })
        .collect();

    c.bench_function("evaluate_all_scenarios", |b| {
        b.iter(|| {
            for (transcript, metrics) in &with_metrics {
                black_box(pipeline.evaluate(transcript, Some(metrics)));
            }
        })
    });

    c.bench_function("evaluate_single_transcript", |b| {
        let (transcript, metrics) = &with_metrics[0];
        b.iter(|| black_box(pipeline.evaluate(transcript, Some(metrics))))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
