use std::fs;

use fidelitty::{Context, ContextConfig, Error};

#[test]
fn config_file_drives_context_limits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("context.yaml");
    fs::write(&path, "max_pipelines: 1\nworker_threads: 2\n").expect("write config");

    let config = ContextConfig::load(&path).expect("load");
    let mut context = Context::with_config(&config).expect("context");
    assert_eq!(context.worker_threads(), 2);
    context.create_render_pipeline(1, 1).expect("first");
    assert_eq!(
        context.create_render_pipeline(1, 1).unwrap_err(),
        Error::CapacityExceeded { max: 1 }
    );
}

#[test]
fn unreadable_and_invalid_files_are_config_errors() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(ContextConfig::load(&missing), Err(Error::Config(_))));

    let invalid = dir.path().join("invalid.yaml");
    fs::write(&invalid, "max_pipelines: 0\n").expect("write config");
    let error = ContextConfig::load(&invalid).unwrap_err();
    assert!(error.to_string().contains("max_pipelines"), "{error}");

    let malformed = dir.path().join("malformed.yaml");
    fs::write(&malformed, "max_pipelines: [1, 2]\n").expect("write config");
    assert!(matches!(ContextConfig::load(&malformed), Err(Error::Config(_))));
}
