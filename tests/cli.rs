use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const SCENE: &str = r#"
plotBox = { x = 10.0, y = 20.0, width = 200.0, height = 100.0 }

[[series]]
name = "Sales"
data = [{ id = "a", x = 50.0, y = 50.0 }, { id = "b", x = 75.0, y = 25.0 }]

[[annotations]]
id = "note"

[[annotations.labels]]
point = "a"
text = "Peak"

[[annotations.shapes]]
type = "circle"
point = "b"
r = 5.0
"#;

fn annotations_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chart-annotations").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

fn write_scene(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("scene.toml");
    std::fs::write(&path, SCENE).unwrap();
    path
}

#[test]
fn help_prints_about() {
    let temp = TempDir::new().unwrap();
    annotations_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lay out annotation overlays for a chart scene",
        ));
}

#[test]
fn no_scene_prints_usage() {
    let temp = TempDir::new().unwrap();
    annotations_cmd(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("--init-config"));
}

#[test]
fn summary_lists_annotations_and_label_text() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    annotations_cmd(&temp)
        .arg(&scene)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 annotation(s)"))
        .stdout(predicate::str::contains("note [visible] shapes=1 labels=1"))
        .stdout(predicate::str::contains("label: Peak"));
}

#[test]
fn remove_and_hide_apply_before_output() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    annotations_cmd(&temp)
        .arg(&scene)
        .args(["--hide", "note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("note [hidden]"));

    annotations_cmd(&temp)
        .arg(&scene)
        .args(["--remove", "note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 annotation(s)"));
}

#[test]
fn dump_prints_the_scene_graph() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    annotations_cmd(&temp)
        .arg(&scene)
        .arg("--dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("annotation-labels"))
        .stdout(predicate::str::contains("\"Peak\""));
}

#[test]
fn options_print_effective_values() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    annotations_cmd(&temp)
        .arg(&scene)
        .arg("--options")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"padding\": 5.0"));
}

#[test]
fn config_defaults_reach_the_labels() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    let config_dir = temp.path().join("chart-annotations");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[label]\npadding = 8.0\n").unwrap();

    annotations_cmd(&temp)
        .arg(&scene)
        .arg("--options")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"padding\": 8.0"));
}

#[test]
fn init_config_writes_once() {
    let temp = TempDir::new().unwrap();
    annotations_cmd(&temp)
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(temp.path().join("chart-annotations/config.toml").exists());

    annotations_cmd(&temp)
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "[label\npadding = ").unwrap();

    annotations_cmd(&temp)
        .arg(&scene)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn missing_scene_is_reported() {
    let temp = TempDir::new().unwrap();
    annotations_cmd(&temp)
        .arg(temp.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scene"));
}

#[cfg(not(feature = "cairo"))]
#[test]
fn png_needs_cairo() {
    let temp = TempDir::new().unwrap();
    let scene = write_scene(&temp);
    annotations_cmd(&temp)
        .arg(&scene)
        .arg("--png")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cairo"));
}
