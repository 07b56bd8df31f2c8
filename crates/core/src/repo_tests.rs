// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_full_config() {
    let content = r#"
name = "acme"
version = "1.2.0"

[build]
isolate_units = true
keep_going = true
env = { PROTOC_VERSION = "27.1" }

[validation]
breaking = false
format = true

[languages.java]
group_id = "com.acme.protos"

[languages.npm]
scope = "@acme"
"#;
    let config = RepoConfig::parse(Path::new("/lakes/acme"), content).unwrap();

    assert_eq!(config.name, "acme");
    assert_eq!(config.version, "1.2.0");
    assert_eq!(config.root, PathBuf::from("/lakes/acme"));
    assert!(config.build.isolate_units);
    assert!(config.build.keep_going);
    assert_eq!(config.build.env.get("PROTOC_VERSION").map(String::as_str), Some("27.1"));
    assert!(config.validation.enabled);
    assert!(!config.validation.breaking);
    assert!(config.validation.format);
    assert_eq!(config.languages.java.unwrap().group_id, "com.acme.protos");
    assert!(config.languages.python.is_none());
    assert_eq!(config.languages.npm.unwrap().scope, "@acme");
}

#[test]
fn parse_defaults_name_from_root() {
    let config = RepoConfig::parse(Path::new("/lakes/widgets"), "").unwrap();
    assert_eq!(config.name, "widgets");
    assert_eq!(config.version, "0.1.0");
    assert_eq!(config.validation, ValidationSettings::default());
    assert_eq!(config.resource_name(), "lakes/widgets");
}

#[test]
fn parse_rejects_bad_toml() {
    let err = RepoConfig::parse(Path::new("/lakes/acme"), "name = [").unwrap_err();
    assert!(matches!(err, RepoConfigError::Parse(_)));
}

#[yare::parameterized(
    lake_root      = { "/lakes/acme", "." },
    nested_abs     = { "/lakes/acme/com/acme/user", "com/acme/user" },
    relative       = { "com/acme", "com/acme" },
    relative_dot   = { ".", "." },
    trailing_slash = { "/lakes/acme/com/", "com" },
    dotdot_inside  = { "com/acme/../billing", "com/billing" },
)]
fn lake_relative_paths(target: &str, expected: &str) {
    let config = RepoConfig::new("acme", "/lakes/acme");
    assert_eq!(config.to_lake_relative(Path::new(target)).unwrap(), expected);
}

#[yare::parameterized(
    sibling     = { "/lakes/other" },
    prefix_like = { "/lakes/acme-two/x" },
    escape      = { "../other" },
)]
fn lake_relative_rejects_outside(target: &str) {
    let config = RepoConfig::new("acme", "/lakes/acme");
    let err = config.to_lake_relative(Path::new(target)).unwrap_err();
    assert!(matches!(err, RepoConfigError::OutsideLake { .. }));
}

#[yare::parameterized(
    root     = { ".", "//..." },
    empty    = { "", "//..." },
    nested   = { "com/acme", "//com/acme/..." },
    slashes  = { "/com/acme/", "//com/acme/..." },
)]
fn unit_patterns(path: &str, pattern: &str) {
    assert_eq!(unit_pattern(path), pattern);
}
