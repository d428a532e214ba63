//! End-to-end tests for the `rigging` binary.

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "<html><head>__SCRIPT__</head><body></body></html>";

fn setup_project(env_files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.js"), "export default 1;\n").unwrap();
    fs::create_dir_all(root.join("static/img")).unwrap();
    fs::write(root.join("static/__index.html"), TEMPLATE).unwrap();
    fs::write(root.join("static/img/logo.svg"), "<svg/>").unwrap();

    for (mode, content) in env_files {
        fs::write(root.join(format!(".env.{mode}")), content).unwrap();
    }
    temp
}

fn rigging(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("rigging"));
    cmd.current_dir(root)
        .env_remove("ROLLUP_WATCH")
        .env_remove("BUNDLING")
        .env_remove("PRERENDER")
        .env_remove("NODE_ENV")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_help_lists_commands() {
    Command::new(cargo_bin!("rigging"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn cli_plan_production_prints_both_jobs() {
    let temp = setup_project(&[("production", "API_URL=https://api.example.com\n")]);

    rigging(temp.path())
        .args(["plan", "--mode", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"bundle\""))
        .stdout(predicate::str::contains("\"name\": \"dynamic\""))
        .stdout(predicate::str::contains("\"step\": \"prerender\""))
        .stdout(predicate::str::contains("process.env.API_URL"))
        .stdout(predicate::str::contains("\"step\": \"minify\""));
}

#[test]
fn cli_plan_compact_one_line_per_job() {
    let temp = setup_project(&[("development", "")]);

    let output = rigging(temp.path())
        .args(["plan", "--compact", "--bundling", "bundle"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("\"strategy\":\"bundle\""));
}

#[test]
fn cli_plan_does_not_touch_output() {
    let temp = setup_project(&[("development", "")]);
    fs::create_dir_all(temp.path().join("dist")).unwrap();
    fs::write(temp.path().join("dist/keep.txt"), "x").unwrap();

    rigging(temp.path()).arg("plan").assert().success();
    assert!(temp.path().join("dist/keep.txt").exists());
}

#[test]
fn cli_missing_env_file_fails() {
    let temp = setup_project(&[]);

    rigging(temp.path())
        .args(["plan", "--mode", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".env.staging"));
}

#[test]
fn cli_invalid_bundling_variable_fails() {
    let temp = setup_project(&[("development", "")]);

    rigging(temp.path())
        .arg("plan")
        .env("BUNDLING", "chunks")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunks"));
}

#[test]
fn cli_build_without_bundler_keeps_output() {
    let temp = setup_project(&[("development", "")]);
    fs::create_dir_all(temp.path().join("dist")).unwrap();
    fs::write(temp.path().join("dist/stale.js"), "old").unwrap();

    rigging(temp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundler"));
    assert!(temp.path().join("dist/stale.js").exists());
}

#[test]
fn cli_build_refuses_output_outside_root() {
    let outer = TempDir::new().unwrap();
    let root = outer.path().join("app");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join(".env.production"), "").unwrap();
    fs::write(outer.path().join("notes.txt"), "keep").unwrap();
    fs::write(
        root.join("rigging.toml"),
        "[layout]\ndist_dir = \"..\"\n\n[bundler]\ncommand = [\"true\"]\n",
    )
    .unwrap();

    rigging(&root)
        .args(["build", "--mode", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout.dist_dir"));
    assert!(outer.path().join("notes.txt").exists());
    assert!(root.join("src").exists());
}

#[cfg(unix)]
#[test]
fn cli_build_runs_jobs_and_templates_page() {
    let temp = setup_project(&[("production", "API_URL=https://api.example.com\n")]);
    fs::write(
        temp.path().join("rigging.toml"),
        r#"
[bundler]
command = ["sh", "-c", "cat > job-$RIGGING_JOB.json"]

[hooks]
prerender = "true"
"#,
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("dist")).unwrap();
    fs::write(temp.path().join("dist/stale.js"), "old").unwrap();

    rigging(temp.path())
        .args(["build", "--mode", "production"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Build completed"));

    let dist = temp.path().join("dist");
    assert!(!dist.join("stale.js").exists());
    assert!(dist.join("img/logo.svg").exists());
    assert!(!dist.join("__index.html").exists());

    // The dynamic job runs last, so its markup is what remains
    let page = fs::read_to_string(dist.join("__app.html")).unwrap();
    assert!(page.contains("/build/main.js"));
    assert!(!page.contains("__SCRIPT__"));

    let bundle = fs::read_to_string(temp.path().join("job-bundle.json")).unwrap();
    assert!(bundle.contains("https://api.example.com"));
    assert!(temp.path().join("job-dynamic.json").exists());
}
