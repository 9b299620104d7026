use mobo::prelude::*;
use mobo::solver::Nsga2Config;
use mobo::surrogate::GpConfig;

#[test]
fn test_config_from_json() {
    let json = r#"{
        "algorithm": "usemo-ei",
        "n_iter": 2,
        "batch_size": 3,
        "phase1_ratio": 0.5,
        "seed": 9,
        "surrogate": { "kind": "gp", "noise_variance": 0.0001 },
        "acquisition": { "kind": "ucb", "beta": 1.5 },
        "solver": { "kind": "nsga2", "pop_size": 16, "n_gen": 3 },
        "selection": "hvi"
    }"#;
    let config: MoboConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.algorithm, Algorithm::UsemoEi);
    assert_eq!(config.transformation, Transformation::Standard);
    assert_eq!(config.ref_point, None);
    assert_eq!(
        config.surrogate,
        Some(SurrogateConfig::Gp(GpConfig::default().noise_variance(1e-4)))
    );
    assert_eq!(config.acquisition, Some(AcquisitionConfig::Ucb { beta: 1.5 }));
    assert_eq!(
        config.solver,
        Some(SolverConfig::Nsga2(Nsga2Config::default().pop_size(16).n_gen(3)))
    );
    assert_eq!(config.selection, Some(SelectionConfig::Hvi));

    let problem = Zdt1::new(3);
    let (x, y) = crate::initial(&problem, 5);
    let mut mobo = MoboBuilder::from_config(config).build(problem).unwrap();
    assert_eq!(mobo.schedule().boundary(), 1);
    let batches = mobo.solve(x, y).unwrap().collect::<Result<Vec<_>>>().unwrap();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.x.len() == 3));
}

#[test]
fn test_config_round_trips() {
    let config = MoboConfig {
        algorithm: Algorithm::ParEgo,
        ref_point: Some(vec![1.5, 2.5]),
        surrogate: Some(SurrogateConfig::ThompsonSampling(Default::default())),
        ..MoboConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"parego\""));
    assert!(json.contains("\"kind\":\"ts\""));
    let back: MoboConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_batch_serializes() {
    let problem = Zdt1::new(3);
    let (x, y) = crate::initial(&problem, 5);
    let mut mobo = crate::quick(Algorithm::UsemoEi, 1, 1).build(problem).unwrap();
    let batch = mobo.solve(x, y).unwrap().step().unwrap().unwrap();
    let value = serde_json::to_value(&batch).unwrap();
    assert_eq!(value["iteration"], 0);
    assert_eq!(value["phase"], "Explore");
    assert!(value["status"]["hypervolume"].is_number());
}

#[test]
fn test_dataset_deserialization_is_validated() {
    let dataset = Dataset::new(vec![vec![0.1, 0.2]], vec![vec![1.0, 2.0]]).unwrap();
    let json = serde_json::to_string(&dataset).unwrap();
    let back: Dataset = serde_json::from_str(&json).unwrap();
    assert_eq!(back, dataset);

    let unequal = r#"{ "x": [[0.1], [0.2]], "y": [[1.0]] }"#;
    let err = serde_json::from_str::<Dataset>(unequal).unwrap_err();
    assert!(err.to_string().contains("row count mismatch"), "{err}");

    let ragged = r#"{ "x": [[0.1], [0.2, 0.3]], "y": [[1.0], [2.0]] }"#;
    assert!(serde_json::from_str::<Dataset>(ragged).is_err());

    assert!(serde_json::from_str::<Dataset>(r#"{ "x": [], "y": [] }"#).is_err());
}
