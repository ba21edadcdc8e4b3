//! Tests for deriving the target network from runner labels.

use envsync::{EnvSyncError, Network};

#[test]
fn test_resolves_first_match_in_precedence_order() {
    // mainnet wins even when another network label appears earlier
    let labels = vec![
        "self-hosted".to_string(),
        "gnosis".to_string(),
        "mainnet".to_string(),
    ];
    let network = Network::resolve(Some(&labels)).unwrap();
    assert_eq!(network, Network::Mainnet);
}

#[test]
fn test_resolves_gnosis_when_mainnet_absent() {
    let labels = vec!["prater".to_string(), "gnosis".to_string()];
    let network = Network::resolve(Some(&labels)).unwrap();
    assert_eq!(network, Network::Gnosis);
}

#[test]
fn test_matching_ignores_case_and_surrounding_whitespace() {
    let labels = vec![" Prater ".to_string()];
    let network = Network::resolve(Some(&labels)).unwrap();
    assert_eq!(network, Network::Prater);
}

#[test]
fn test_no_match_resolves_to_undefined() {
    let labels = vec!["ubuntu-latest".to_string(), "x64".to_string()];
    let network = Network::resolve(Some(&labels)).unwrap();
    assert_eq!(network, Network::Undefined);
}

#[test]
fn test_empty_label_set_resolves_to_undefined() {
    let network = Network::resolve(Some(&[])).unwrap();
    assert_eq!(network, Network::Undefined);
}

#[test]
fn test_absent_label_source_is_a_configuration_error() {
    // No labels at all is different from labels that match nothing
    let err = Network::resolve(None).unwrap_err();
    assert!(matches!(err, EnvSyncError::Config(_)));
    assert!(err.to_string().contains("labels"), "got: {}", err);
}

#[test]
fn test_display_and_fromstr_round_trip() {
    for network in [
        Network::Mainnet,
        Network::Gnosis,
        Network::Prater,
        Network::Undefined,
    ] {
        let parsed: Network = network.to_string().parse().unwrap();
        assert_eq!(parsed, network);
    }
    assert!("goerli".parse::<Network>().is_err());
}

#[test]
fn test_serializes_as_lowercase_string() {
    let json = serde_json::to_string(&Network::Mainnet).unwrap();
    assert_eq!(json, "\"mainnet\"");
}
