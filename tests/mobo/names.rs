use mobo::prelude::*;
use mobo::registry::{AcquisitionKind, SelectionKind, SolverKind, SurrogateKind};

#[test]
fn test_unknown_algorithm_names_the_key() {
    let err = Algorithm::resolve("unknown-xyz").unwrap_err();
    assert!(matches!(&err, Error::UnknownAlgorithm(name) if name == "unknown-xyz"));
    assert!(err.to_string().contains("unknown-xyz"));
    assert!("unknown-xyz".parse::<Algorithm>().is_err());
}

#[test]
fn test_every_registered_name_resolves() {
    for name in [
        "dgemo",
        "tsemo",
        "usemo-ei",
        "moead-ego",
        "parego",
        "rmobo1",
        "rmobo2",
        "custom",
    ] {
        let algorithm = Algorithm::resolve(name).unwrap();
        assert_eq!(algorithm.name(), name);
    }
    assert_eq!("R1".parse::<Algorithm>().unwrap(), Algorithm::Rmobo1);
}

#[test]
fn test_preset_table() {
    let preset = Algorithm::MoeadEgo.preset().unwrap();
    assert_eq!(preset.surrogate, SurrogateKind::Gp);
    assert_eq!(preset.acquisition, AcquisitionKind::Ei);
    assert_eq!(preset.exploit_acquisition, AcquisitionKind::Ei);
    assert_eq!(preset.solver, SolverKind::Moead);
    assert_eq!(preset.selection, SelectionKind::Moead);

    let preset = Algorithm::Dgemo.preset().unwrap();
    assert_eq!(preset.solver, SolverKind::Discovery);
    assert_eq!(preset.selection, SelectionKind::Dgemo);
}

#[test]
fn test_unknown_component_names_family_and_key() {
    let err = "cmaes".parse::<SolverKind>().unwrap_err();
    assert!(matches!(
        &err,
        Error::UnknownComponent { kind: "solver", name } if name == "cmaes"
    ));
    assert!(err.to_string().contains("cmaes"));
    assert!("greedy".parse::<SelectionKind>().is_err());
    assert!("kg".parse::<AcquisitionKind>().is_err());
}

#[test]
fn test_component_names_round_trip() {
    for kind in SurrogateKind::ALL {
        assert_eq!(kind.name().parse::<SurrogateKind>().unwrap(), *kind);
    }
    for kind in AcquisitionKind::ALL {
        assert_eq!(kind.to_string().parse::<AcquisitionKind>().unwrap(), *kind);
    }
    for kind in SelectionKind::ALL {
        assert_eq!(kind.name().parse::<SelectionKind>().unwrap(), *kind);
    }
}
