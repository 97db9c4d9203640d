//! Mode state machine properties.

use proptest::prelude::*;
use sprout_bundler::{BuildSettings, EnvironmentBuildPolicy, PluginSpec, SourceMapKind};
use sprout_config::{BuildEnvironment, Mode, application_cache_groups};

fn policy() -> EnvironmentBuildPolicy {
    EnvironmentBuildPolicy::new(application_cache_groups())
}

proptest! {
    #[test]
    fn test_mode_short_circuits(analyze in any::<bool>(), hot in any::<bool>()) {
        let env = BuildEnvironment::for_mode(Mode::Test)
            .with_analyze(analyze)
            .with_hot_reload(hot);
        prop_assert_eq!(policy().derive(&env), BuildSettings::test());
    }

    #[test]
    fn production_always_minifies_without_maps(analyze in any::<bool>(), hot in any::<bool>()) {
        let env = BuildEnvironment::for_mode(Mode::Production)
            .with_analyze(analyze)
            .with_hot_reload(hot);
        let settings = policy().derive(&env);
        prop_assert!(settings.minify.as_ref().is_some_and(|m| m.enabled));
        prop_assert_eq!(settings.source_map, SourceMapKind::Disabled);
        let has_grouping = settings
            .extra_plugins
            .iter()
            .any(|p| matches!(p, PluginSpec::ChunkGrouping { .. }));
        prop_assert!(has_grouping);
    }

    #[test]
    fn development_never_minifies(analyze in any::<bool>(), hot in any::<bool>()) {
        let env = BuildEnvironment::for_mode(Mode::Development)
            .with_analyze(analyze)
            .with_hot_reload(hot);
        let settings = policy().derive(&env);
        prop_assert!(settings.minify.is_none());
        prop_assert_eq!(settings.has_analyzer(), analyze);
        prop_assert_eq!(settings.hot_reload, hot);
    }
}

#[test]
fn unknown_signal_fails_closed() {
    let env = BuildEnvironment::for_mode(Mode::from_signal(Some("staging")));
    let settings = policy().derive(&env);
    assert_eq!(settings.mode, Mode::Development);
    assert!(settings.minify.is_none());
}

#[test]
fn test_mode_uses_sourceless_maps() {
    assert_eq!(
        BuildSettings::test().source_map.devtool(),
        Some("nosources-source-map")
    );
}
