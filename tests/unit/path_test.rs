//! Tests for workspace path confinement.

use proptest::prelude::*;
use tempfile::TempDir;
use ward::error::WardError;
use ward::tools::PathResolver;
use ward::types::config::WorkspaceConfig;

fn resolver(temp_dir: &TempDir) -> PathResolver {
    PathResolver::new(&WorkspaceConfig::new(temp_dir.path()).unwrap())
}

#[test]
fn test_nested_relative_path_is_contained() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = resolver(&temp_dir);

    let resolved = resolver.resolve("a/./b/../c.txt", false).unwrap();
    assert_eq!(resolved.as_path(), resolver.root().join("a/c.txt"));
    assert_eq!(resolved.requested(), "a/./b/../c.txt");
}

#[test]
fn test_parent_escape_variants() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = resolver(&temp_dir);

    for path in ["..", "../x", "a/../../x", "/etc/passwd", "./../x"] {
        let err = resolver.resolve(path, false).unwrap_err();
        assert_eq!(err, WardError::path_escape(path), "{path}");
        assert!(err.is_security_related());
    }
}

fn segment() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("b"), Just(".."), Just(".")]
}

proptest! {
    /// A path is accepted exactly when its `..` never climbs above the root.
    #[test]
    fn prop_contain_matches_lexical_depth(segments in prop::collection::vec(segment(), 1..8)) {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver(&temp_dir);
        let path = segments.join("/");

        let mut depth: i32 = 0;
        let mut escapes = false;
        for segment in &segments {
            match *segment {
                ".." => depth -= 1,
                "." => {}
                _ => depth += 1,
            }
            if depth < 0 {
                escapes = true;
            }
        }

        match resolver.contain(&path) {
            Ok(canonical) => {
                prop_assert!(!escapes, "{} was accepted", path);
                prop_assert!(canonical.starts_with(resolver.root()));
            }
            Err(e) => {
                prop_assert!(escapes, "{} was rejected: {}", path, e);
                prop_assert_eq!(e, WardError::path_escape(path.clone()));
            }
        }
    }
}
