use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ecosystem_sim::{SimConfig, World};
use std::time::Duration;

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    // Ticks per bench iteration (override with ECOSYSTEM_BENCH_TICKS)
    let ticks: usize = std::env::var("ECOSYSTEM_BENCH_TICKS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(100);

    let presets: [(&str, fn() -> SimConfig); 3] = [
        ("sparse", SimConfig::sparse),
        ("balanced", SimConfig::balanced),
        ("crowded", SimConfig::crowded),
    ];
    for (name, preset) in presets {
        group.bench_function(format!("{name}_{ticks}_ticks"), |b| {
            b.iter_batched(
                || {
                    let mut config = preset();
                    config.seed = Some(0xEC0);
                    config.stats_log_interval_ticks = 0;
                    World::new(config).expect("preset config is valid")
                },
                |mut world| {
                    for _ in 0..ticks {
                        world.advance_tick();
                    }
                    world
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
