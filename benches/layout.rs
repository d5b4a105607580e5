use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use workflow_viz::mock::find_workflow;
use workflow_viz::{
    AnalyticsTab, Config, DiagramSurface, LayoutConfig, NodeSpec, Theme, WorkflowDescription,
    compute_layout, materialize, render_diagram_svg, render_workflow,
};

fn generated_workflow(per_row: usize) -> WorkflowDescription {
    let mut wf = WorkflowDescription::new("bench", "Bench");
    for i in 0..per_row {
        wf.nodes.push(NodeSpec::event(&format!("e{i}"), &format!("Event {i}")));
        wf.nodes.push(NodeSpec::status(&format!("s{i}"), &format!("Status {i}")));
    }
    wf
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let theme = Theme::light();
    let mut group = c.benchmark_group("layout");
    for per_row in [1usize, 5, 20, 100] {
        let wf = generated_workflow(per_row);
        group.bench_with_input(BenchmarkId::new("compute", per_row), &wf, |b, wf| {
            b.iter(|| compute_layout(black_box(wf), black_box(&config)))
        });
        group.bench_with_input(BenchmarkId::new("materialize", per_row), &wf, |b, wf| {
            b.iter(|| materialize(black_box(wf), true, &config, &theme))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let config = Config::default();
    let Some(wf) = find_workflow("support-ticket") else {
        return;
    };
    let surface = DiagramSurface::build(wf, true, &config.layout, &config.theme);
    c.bench_function("render/diagram", |b| {
        b.iter(|| render_diagram_svg(black_box(&surface), &config.theme))
    });
    c.bench_function("render/page", |b| {
        b.iter(|| render_workflow(black_box(wf), AnalyticsTab::Area, &config))
    });
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
