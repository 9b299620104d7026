use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mobo::prelude::*;
use mobo::solver::Nsga2Config;

fn bench_single_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");
    group.sample_size(10);

    for algorithm in [Algorithm::UsemoEi, Algorithm::Tsemo] {
        for n_init in [10, 40] {
            let problem = Zdt1::new(5);
            let x = latin_hypercube(problem.bounds(), n_init, Some(0));
            let (x, y) = evaluate_initial(&problem, x).unwrap();
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), n_init),
                &(x, y),
                |b, (x, y)| {
                    b.iter(|| {
                        let mut mobo = MoboBuilder::new()
                            .algorithm(algorithm)
                            .n_iter(1)
                            .batch_size(4)
                            .seed(1)
                            .solver(SolverConfig::Nsga2(
                                Nsga2Config::default().pop_size(40).n_gen(5),
                            ))
                            .build(Zdt1::new(5))
                            .unwrap();
                        let mut run = mobo.solve(x.clone(), y.clone()).unwrap();
                        run.step().unwrap()
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_single_iteration);
criterion_main!(benches);
