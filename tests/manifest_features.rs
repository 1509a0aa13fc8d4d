//! The library builds without the CLI stack; only `ftty-render` pulls it in.

const MANIFEST: &str = include_str!("../Cargo.toml");

fn dependency_line(name: &str) -> &'static str {
    MANIFEST
        .lines()
        .find(|line| line.starts_with(&format!("{name} = ")))
        .unwrap_or_else(|| panic!("{name} missing from [dependencies]"))
}

#[test]
fn cli_only_dependencies_are_optional() {
    for name in ["anyhow", "clap", "env_logger", "image", "crossterm"] {
        assert!(
            dependency_line(name).contains("optional = true"),
            "{name} should only build with a feature"
        );
    }
}

#[test]
fn cli_feature_enables_the_binary_stack() {
    let cli = MANIFEST
        .lines()
        .find(|line| line.starts_with("cli = "))
        .expect("cli feature");
    for dep in ["\"frontend\"", "dep:anyhow", "dep:clap", "dep:env_logger", "dep:image"] {
        assert!(cli.contains(dep), "cli feature lacks {dep}");
    }
    assert!(MANIFEST.contains("required-features = [\"cli\"]"));
}
