use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use pumlgraph_cli::Args;

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .puml files from a directory
fn collect_puml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("puml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_puml_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match pumlgraph_cli::run(&args_for(demo_path, &output_path)) {
            Ok(()) => {
                let json = fs::read_to_string(&output_path).expect("Output should exist");
                let value: serde_json::Value =
                    serde_json::from_str(&json).expect("Output should be valid JSON");
                assert!(value["objects"].is_array(), "{}", demo_path.display());
                assert!(value["links"].is_array(), "{}", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_puml_files(demos_dir().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpected_successes = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join("out.json");

        if pumlgraph_cli::run(&args_for(demo_path, &output_path)).is_ok() {
            unexpected_successes.push(demo_path.clone());
        }
        assert!(
            !output_path.exists(),
            "No output should be written for {}",
            demo_path.display()
        );
    }

    assert!(
        unexpected_successes.is_empty(),
        "Error demos that compiled: {unexpected_successes:?}"
    );
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.json");

    let result = pumlgraph_cli::run(&args_for(Path::new("no/such/input.puml"), &output_path));
    assert!(matches!(result, Err(pumlgraph::PumlGraphError::Io(_))));
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[output]\nindent = 0\n").unwrap();
    let output_path = temp_dir.path().join("minimal.json");

    let mut args = args_for(&demos_dir().join("minimal.puml"), &output_path);
    args.config = Some(config_path.to_string_lossy().to_string());
    pumlgraph_cli::run(&args).expect("Minimal demo should compile");

    let json = fs::read_to_string(&output_path).unwrap();
    assert_eq!(json, "{\"links\":[],\"objects\":[]}\n");
}
