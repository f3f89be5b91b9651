//! ACQCFG_* environment overrides. Kept in its own test binary because it
//! mutates process environment.

use std::env;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use acqcfg::config::Settings;

#[test]
fn given_env_vars_when_load_then_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acqcfg.toml");
    fs::write(
        &path,
        "data_dir = \"/from/file\"\ndefault_setting = \"from.file\"\n",
    )
    .unwrap();

    env::set_var("ACQCFG_DATA_DIR", "/from/env");
    env::set_var("ACQCFG_FORMAT__EXPAND_NESTED_GROUPS", "false");
    let result = Settings::load(Some(&path));
    env::remove_var("ACQCFG_DATA_DIR");
    env::remove_var("ACQCFG_FORMAT__EXPAND_NESTED_GROUPS");

    let settings = result.unwrap();
    assert_eq!(settings.data_dir, PathBuf::from("/from/env"));
    assert_eq!(settings.default_setting, "from.file");
    assert!(!settings.format.expand_nested_groups);
}
