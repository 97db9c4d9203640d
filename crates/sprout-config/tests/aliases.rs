//! Tests for alias resolution over the application table.

use proptest::prelude::*;
use sprout_config::alias::APP_ALIASES;
use sprout_config::{AliasTable, ConfigError};
use std::path::PathBuf;

proptest! {
    #[test]
    fn registered_prefixes_substitute_and_keep_remainder(
        index in 0..APP_ALIASES.len(),
        rest in "[a-z]{1,6}(/[a-z]{1,6}){0,3}(\\.vue|\\.js)?",
    ) {
        let table = AliasTable::application("/app").unwrap();
        let (prefix, dir) = APP_ALIASES[index];
        let resolved = table.resolve(&format!("{prefix}/{rest}")).unwrap();
        prop_assert_eq!(resolved, PathBuf::from(format!("/app/{dir}/{rest}")));
    }

    #[test]
    fn unregistered_prefixes_fail(name in "#[a-z]{1,8}") {
        let table = AliasTable::application("/app").unwrap();
        let result = table.resolve(&format!("{name}/x"));
        let is_unresolved = matches!(result, Err(ConfigError::UnresolvedAlias { .. }));
        prop_assert!(is_unresolved);
    }
}

#[test]
fn every_app_alias_points_under_src() {
    let table = AliasTable::application("/app").unwrap();
    for entry in table.entries() {
        assert!(entry.target.starts_with("/app/src"), "{:?}", entry);
    }
}
