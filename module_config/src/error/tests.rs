//! Unit tests for error construction and aggregation behaviour.

use rstest::rstest;
use std::sync::Arc;

use super::ConfigError;

fn missing() -> Arc<ConfigError> {
    ConfigError::missing_argument("select.module")
}

#[test]
fn try_aggregate_none_on_empty() {
    assert!(ConfigError::try_aggregate(Vec::<Arc<ConfigError>>::new()).is_none());
}

#[test]
fn single_owned_error_is_unwrapped() {
    let outcome = ConfigError::try_aggregate(vec![missing()]);
    assert!(
        matches!(outcome, Some(ConfigError::MissingArgument { .. })),
        "expected MissingArgument, got {outcome:?}"
    );
}

#[test]
fn single_shared_error_is_wrapped() {
    let shared = missing();
    let outcome = ConfigError::try_aggregate(vec![Arc::clone(&shared)]);
    match outcome {
        Some(ConfigError::Aggregate(aggregate)) => assert_eq!(aggregate.len(), 1),
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[test]
fn multiple_errors_render_numbered_lines() {
    let outcome = ConfigError::try_aggregate(vec![
        missing(),
        ConfigError::unresolved("./dep", "relative identifier without a context id"),
    ]);
    let Some(ConfigError::Aggregate(aggregate)) = outcome else {
        panic!("expected Aggregate");
    };
    assert_eq!(aggregate.len(), 2);
    assert_eq!(aggregate.iter().count(), 2);
    let display = aggregate.to_string();
    assert!(display.starts_with("1: missing required argument"));
    assert!(display.contains("\n2: cannot resolve identifier './dep'"));
}

#[rstest]
#[case::dependency(ConfigError::dependency_load("d1", "offline"), "failed to load dependency 'd1': offline")]
#[case::external(ConfigError::external("m", "timeout"), "external configuration for 'm' failed: timeout")]
#[case::factory(ConfigError::factory("m", "bad input"), "configuration factory for 'm' failed: bad input")]
fn collaborator_errors_carry_their_subject(#[case] err: Arc<ConfigError>, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn figment_errors_become_gathering_errors() {
    let err = ConfigError::from(figment::Error::from("boom"));
    assert!(matches!(err, ConfigError::Gathering(_)));
}
