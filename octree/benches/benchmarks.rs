use criterion::{black_box, criterion_group, criterion_main, Criterion};
use octree::jobs::RayonJobs;
use octree::octree::{Entity, EntityStore, Octree, Region, Vec3};
use rand::prelude::*;

const POPULATION: usize = 30_000;

fn world() -> Region {
    Region::cube(Vec3::ZERO, 1000.0)
}

fn populate(rng: &mut StdRng, count: usize) -> EntityStore {
    let mut store = EntityStore::with_key();
    for _ in 0..count {
        let position = world().random_point_inside(rng);
        let velocity = Vec3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
        );
        store.insert(Entity::new(position, velocity));
    }
    store
}

// Move everything, bouncing off the world bounds so the population stays put
fn advance(store: &mut EntityStore, dt: f32) {
    let bound = world().half_extent();
    for (_, entity) in store.iter_mut() {
        entity.step(dt);
        let outside = entity.position.abs().cmpgt(bound);
        if outside.any() {
            entity.velocity = Vec3::select(outside, -entity.velocity, entity.velocity);
            entity.position = entity.position.clamp(-bound * 0.999, bound * 0.999);
        }
    }
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let store = populate(&mut rng, POPULATION);

    c.bench_function("octree_insert", |b| {
        b.iter(|| {
            let mut tree = Octree::new(world()).unwrap();
            tree.insert_all(black_box(&store));
            tree
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let store = populate(&mut rng, POPULATION);
    let mut tree = Octree::new(world()).unwrap();
    tree.insert_all(&store);
    let area = Region::cube(Vec3::new(100.0, -50.0, 25.0), 80.0);

    c.bench_function("octree_query", |b| {
        b.iter(|| tree.query(black_box(area)).count())
    });
}

fn neighbors_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let store = populate(&mut rng, POPULATION);
    let mut tree = Octree::new(world()).unwrap();
    tree.insert_all(&store);
    let probes: Vec<Vec3> = (0..256).map(|_| world().random_point_inside(&mut rng)).collect();

    c.bench_function("octree_neighbors", |b| {
        b.iter(|| {
            let mut found = 0;
            for probe in &probes {
                tree.neighbors_with(black_box(*probe), 20.0, |_, _| found += 1);
            }
            found
        })
    });
}

fn rebalance_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = populate(&mut rng, POPULATION);
    let mut tree = Octree::new(world()).unwrap();
    tree.insert_all(&store);

    c.bench_function("octree_rebalance", |b| {
        b.iter(|| {
            advance(&mut store, 1.0 / 60.0);
            tree.rebalance(black_box(&store));
        })
    });
}

fn rebalance_threaded_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = populate(&mut rng, POPULATION);
    let mut tree = Octree::new(world()).unwrap();
    tree.insert_all(&store);
    let jobs = RayonJobs::new();

    c.bench_function("octree_rebalance_threaded", |b| {
        b.iter(|| {
            advance(&mut store, 1.0 / 60.0);
            tree.rebalance_threaded(black_box(&store), &jobs);
        })
    });
}

criterion_group!(
    octree_benchmarks,
    insert_benchmark,
    query_benchmark,
    neighbors_benchmark,
    rebalance_benchmark,
    rebalance_threaded_benchmark
);
criterion_main!(octree_benchmarks);
