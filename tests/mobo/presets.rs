use mobo::prelude::*;
use mobo::registry::SolverKind;

use crate::{fast_solver, initial, quick};

#[test]
fn test_every_preset_runs() {
    for algorithm in Algorithm::ALL {
        if algorithm == Algorithm::Custom {
            continue;
        }
        let problem = Zdt1::new(3);
        let (x, y) = initial(&problem, 6);
        let mut mobo = quick(algorithm, 2, 2).build(problem).unwrap();
        let mut run = mobo.solve(x, y).unwrap();
        let mut n = 0;
        let mut added = 0;
        while let Some(batch) = run.step().unwrap() {
            added += batch.x.len();
            assert!(!batch.x.is_empty(), "{algorithm}");
            assert!(batch.x.len() <= 2, "{algorithm}");
            assert_eq!(batch.info.indices.len(), batch.x.len(), "{algorithm}");
            n += 1;
        }
        assert_eq!(n, 2, "{algorithm}");
        assert_eq!(run.dataset().len(), 6 + added, "{algorithm}");
    }
}

#[test]
fn test_presets_on_three_objectives() {
    for algorithm in [Algorithm::MoeadEgo, Algorithm::Dgemo, Algorithm::ParEgo] {
        let problem = Dtlz2::new(4, 3);
        let (x, y) = initial(&problem, 8);
        let mut mobo = quick(algorithm, 1, 3).build(problem).unwrap();
        let batch = mobo.solve(x, y).unwrap().step().unwrap().unwrap();
        assert!(batch.y.iter().all(|row| row.len() == 3), "{algorithm}");
    }
}

#[test]
fn test_description_follows_preset() {
    let mobo = quick(Algorithm::Tsemo, 4, 2).build(Zdt1::new(3)).unwrap();
    let text = mobo.to_string();
    assert!(text.contains("# algorithm: tsemo"));
    assert!(text.contains("# surrogate: ts"));
    assert!(text.contains("# acquisition1: identity 4 iterations"));
    assert!(text.contains("# acquisition2: identity 0 iterations"));
    assert!(text.contains("# solver: nsga2"));
    assert!(text.contains("# selection: hvi"));
}

#[test]
fn test_overrides_replace_preset_components() {
    let mobo = quick(Algorithm::UsemoEi, 4, 2)
        .surrogate(SurrogateConfig::ThompsonSampling(Default::default()))
        .acquisition(AcquisitionConfig::Ucb { beta: 1.0 })
        .selection(SelectionConfig::Hvi)
        .build(Zdt1::new(3))
        .unwrap();
    let text = mobo.to_string();
    assert!(text.contains("# surrogate: ts"));
    // An explicit explore acquisition also drives the exploit phase.
    assert!(text.contains("# acquisition1: ucb"));
    assert!(text.contains("# acquisition2: ucb"));
    assert!(text.contains("# selection: hvi"));
}

#[test]
fn test_custom_with_every_component_runs() {
    let problem = Zdt2::new(3);
    let (x, y) = initial(&problem, 6);
    let mut mobo = MoboBuilder::new()
        .algorithm(Algorithm::Custom)
        .n_iter(2)
        .batch_size(2)
        .seed(3)
        .phase1_ratio(0.5)
        .surrogate(SurrogateConfig::Gp(Default::default()))
        .acquisition(AcquisitionConfig::Ei)
        .exploit_acquisition(AcquisitionConfig::Identity)
        .solver(fast_solver(SolverKind::Moead))
        .selection(SelectionConfig::Moead)
        .build(problem)
        .unwrap();
    let phases: Vec<Phase> = mobo
        .solve(x, y)
        .unwrap()
        .map(|b| b.unwrap().phase)
        .collect();
    assert_eq!(phases, vec![Phase::Explore, Phase::Exploit]);
}
