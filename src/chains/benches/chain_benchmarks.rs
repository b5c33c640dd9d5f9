//! Benchmarks for access path resolution
//!
//! Measures performance of:
//! - Rule evaluation and rendering
//! - Single path resolution (cached and uncached)
//! - Graph building
//! - Per-user batches, sequential and parallel

use accesstrace_chains::{
    evaluate_rule, render_rule, AccessEngine, EngineConfig, GraphBuilder, PathResolver, Snapshot,
    SnapshotBuilder,
};
use accesstrace_core::{Application, Group, GroupRule, User, UserProfile};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const DEPARTMENTS: [&str; 4] = ["Engineering", "Sales", "Marketing", "Finance"];

/// Synthetic organization: every user is in their department group plus
/// `extra_groups` shared groups, each group grants a handful of apps
fn synthetic_org(users: usize, extra_groups: usize) -> Snapshot {
    let apps = 40;
    let mut builder = SnapshotBuilder::new();

    for (d, department) in DEPARTMENTS.iter().enumerate() {
        builder = builder
            .group(Group::new(format!("g-dept-{}", d), *department))
            .rule(GroupRule::new(
                format!("r-dept-{}", d),
                format!("{} Department", department),
                format!(r#"user.department == "{}""#, department),
                vec![format!("g-dept-{}", d)],
            ));
    }
    for g in 0..extra_groups {
        builder = builder.group(Group::new(format!("g-shared-{}", g), format!("Shared {}", g)));
    }
    for a in 0..apps {
        builder = builder.application(Application::new(
            format!("a{}", a),
            format!("app{}", a),
            format!("App {}", a),
        ));
    }
    for d in 0..DEPARTMENTS.len() {
        for a in (d * 5)..(d * 5 + 5) {
            builder = builder.grant(&format!("g-dept-{}", d), &format!("a{}", a));
        }
    }
    for g in 0..extra_groups {
        builder = builder.grant(&format!("g-shared-{}", g), &format!("a{}", 20 + g % 20));
    }
    for u in 0..users {
        let d = u % DEPARTMENTS.len();
        let user_id = format!("u{}", u);
        builder = builder
            .user(User::new(
                user_id.clone(),
                UserProfile::new(format!("u{}@company.com", u)).with_department(DEPARTMENTS[d]),
            ))
            .member(&user_id, &format!("g-dept-{}", d));
        for g in 0..extra_groups {
            if (u + g) % 3 == 0 {
                builder = builder.member(&user_id, &format!("g-shared-{}", g));
            }
        }
        if u % 7 == 0 {
            builder = builder.assign(&user_id, "a39");
        }
    }

    builder.build().unwrap()
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");
    let profile = UserProfile::new("bench@company.com")
        .with_department("Engineering")
        .with_title("Staff Engineer");

    group.bench_function("evaluate_department", |b| {
        b.iter(|| evaluate_rule(black_box(r#"user.department == "Engineering""#), &profile));
    });

    group.bench_function("evaluate_unsupported", |b| {
        b.iter(|| evaluate_rule(black_box("user.department != null"), &profile));
    });

    group.bench_function("render", |b| {
        b.iter(|| render_rule(black_box(r#"user.costCenter == "CC-42""#)));
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let snapshot = synthetic_org(1_000, 20);
    let resolver = PathResolver::new(&snapshot);

    group.bench_function("rule_path", |b| {
        b.iter(|| resolver.resolve(black_box("u1"), black_box("a5")).unwrap());
    });

    group.bench_function("no_path", |b| {
        b.iter(|| resolver.resolve(black_box("u1"), black_box("a0")).unwrap());
    });

    let cached = AccessEngine::from_snapshot(snapshot.clone(), EngineConfig::default()).unwrap();
    group.bench_function("cached_rule_path", |b| {
        b.iter(|| cached.resolve_access_path(black_box("u1"), black_box("a5")).unwrap());
    });

    group.finish();
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");

    for extra_groups in [5, 20, 50] {
        let snapshot = synthetic_org(200, extra_groups);
        let builder = GraphBuilder::new(&snapshot);

        group.bench_with_input(
            BenchmarkId::from_parameter(extra_groups),
            &extra_groups,
            |b, _| {
                b.iter(|| builder.build(black_box("u0"), 3).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("batches");
    let snapshot = synthetic_org(2_000, 20);

    for parallel in [false, true] {
        let config = EngineConfig {
            parallel_batches: parallel,
            ..EngineConfig::uncached()
        };
        let engine = AccessEngine::from_snapshot(snapshot.clone(), config).unwrap();
        let name = if parallel { "parallel" } else { "sequential" };

        group.bench_function(BenchmarkId::new("application_chains", name), |b| {
            b.iter(|| engine.chains_for_application(black_box("a25")).unwrap());
        });

        group.bench_function(BenchmarkId::new("complexity_stats", name), |b| {
            b.iter(|| engine.complexity_stats(black_box("u3")).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rules, bench_resolution, bench_graph, bench_batches);
criterion_main!(benches);
