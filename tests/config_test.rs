//! Configuration and statistics serialization

use exhaustive::{Chooser, EnumerationStats, Enumerator, EnumeratorConfig, ReplayCheck};

#[test]
fn test_default_config() {
    let config = EnumeratorConfig::default();
    assert_eq!(config.replay_check, ReplayCheck::Selected);
    assert!(!config.verbose);
}

#[test]
fn test_config_fills_missing_fields() {
    let config: EnumeratorConfig = serde_json::from_str(r#"{"replay_check": "length"}"#).unwrap();
    assert_eq!(config.replay_check, ReplayCheck::Length);
    assert!(!config.verbose);

    let config: EnumeratorConfig = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
    assert_eq!(config.replay_check, ReplayCheck::Selected);
    assert!(config.verbose);
}

#[test]
fn test_config_rejects_unknown_replay_check() {
    let parsed = serde_json::from_str::<EnumeratorConfig>(r#"{"replay_check": "values"}"#);
    assert!(parsed.is_err());
}

#[test]
fn test_stats_report_as_json() {
    let mut enumerator = Enumerator::new(EnumeratorConfig {
        verbose: true,
        ..EnumeratorConfig::default()
    });
    enumerator
        .run(|chooser: &mut Chooser<u8>| {
            let a = chooser.choose(&[1, 2])?;
            let b = chooser.choose(&[3, 4])?;
            Ok(Some(a + b))
        })
        .unwrap();

    let report = serde_json::to_value(enumerator.stats()).unwrap();
    assert_eq!(report["leaves_visited"], 4);
    assert_eq!(report["successful_leaves"], 4);
    // First run records both levels, second-level points are re-recorded
    // after each first-level advance
    assert_eq!(report["choice_points_recorded"], 3);
    assert_eq!(report["replayed_choices"], 5);
    assert_eq!(report["max_depth"], 2);

    let back: EnumerationStats = serde_json::from_value(report).unwrap();
    assert_eq!(back.leaves_visited, 4);
}

#[test]
fn test_stats_reset_between_runs() {
    let mut enumerator = Enumerator::default();
    enumerator
        .run(|chooser: &mut Chooser<u8>| Ok(Some(chooser.choose(&[1, 2, 3])?)))
        .unwrap();
    enumerator
        .run(|chooser: &mut Chooser<u8>| Ok(Some(chooser.choose(&[1])?)))
        .unwrap();
    assert_eq!(enumerator.stats().leaves_visited, 1);
}
