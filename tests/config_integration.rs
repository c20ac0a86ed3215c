use std::path::PathBuf;

use splitmark::config::{ConfigFlags, load_config_flags, parse_flag_tokens, save_config_flags};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".splitmarkrc");
    let content = r"
# comment
--reader

--storage session.json

--export-dir=site
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.reader);
    assert_eq!(flags.storage, Some(PathBuf::from("session.json")));
    assert_eq!(flags.export_dir, Some(PathBuf::from("site")));
}

#[test]
fn test_missing_config_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".splitmarkrc");
    let content = "--reader\n--themes-dir themes\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "splitmark".to_string(),
        "--edit".to_string(),
        "--themes-dir".to_string(),
        "other-themes".to_string(),
        "--no-persist".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.edit, "cli mode should be applied");
    assert!(!effective.reader, "cli mode replaces the saved mode");
    assert!(effective.no_persist);
    assert_eq!(
        effective.themes_dir,
        Some(PathBuf::from("other-themes")),
        "cli should override paths"
    );
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_saved_flags_round_trip_through_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config");
    let cli_args = vec![
        "splitmark".to_string(),
        "notes.md".to_string(),
        "--export-dir=out".to_string(),
        "--save".to_string(),
    ];
    let flags = parse_flag_tokens(&cli_args);
    save_config_flags(&path, &flags).unwrap();

    let loaded = load_config_flags(&path).unwrap();
    assert_eq!(loaded.export_dir, Some(PathBuf::from("out")));
    assert!(!loaded.edit && !loaded.reader);
}
