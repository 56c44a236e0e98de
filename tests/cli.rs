mod common;

use assert_cmd::Command;
use common::{resize_only_section, Workspace};
use predicates::prelude::*;

fn yoloaug() -> Command {
    let mut cmd = Command::cargo_bin("yoloaug").unwrap();
    cmd.env_remove("YOLOAUG_SEED");
    cmd
}

#[test]
fn outputs_tool_name() {
    let mut cmd = yoloaug();
    cmd.arg("-V");
    cmd.assert().success().stdout("yoloaug 0.1.0\n");
}

#[test]
fn missing_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = yoloaug();
    cmd.arg("--config").arg(temp.path().join("nope.yaml"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn default_config_path_is_config_yaml() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = yoloaug();
    cmd.current_dir(temp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("config.yaml"));
}

#[test]
fn empty_class_list_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("config.yaml");
    std::fs::write(
        &config,
        "inp_img_pth: a\ninp_lab_pth: b\nout_img_pth: c\nout_lab_pth: d\nCLASSES: []\ntransformed_file_name: aug\n",
    )
    .unwrap();

    let mut cmd = yoloaug();
    cmd.arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn malformed_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("config.yaml");
    std::fs::write(&config, "inp_img_pth: [unclosed\n").unwrap();

    let mut cmd = yoloaug();
    cmd.arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn run_writes_outputs_and_prints_summary() {
    let temp = tempfile::tempdir().unwrap();
    let ws = Workspace::new(temp.path());
    ws.write_config(&resize_only_section(48, 48));
    ws.add_image("frame.png", 24, 24);
    ws.add_label("frame", "1 0.5 0.5 0.25 0.25\n");

    let mut cmd = yoloaug();
    cmd.arg("--config")
        .arg(&ws.config)
        .args(["--seed", "42", "--need-save-bb-image"]);
    cmd.assert().success().stdout(predicate::str::contains(
        "Augmentation finished: 1 image(s) written",
    ));

    assert_eq!(ws.read_output_label("frame"), "1 0.5 0.5 0.25 0.25\n");
    assert!(ws.output_image("frame").is_file());
    assert!(ws.bb_images.join("frame_aug.jpg").is_file());
}

#[test]
fn per_image_failures_do_not_fail_the_run() {
    let temp = tempfile::tempdir().unwrap();
    let ws = Workspace::new(temp.path());
    ws.write_config(&resize_only_section(32, 32));
    ws.add_image("bad.png", 16, 16);
    ws.add_label("bad", "9 0.5 0.5 0.2 0.2\n");
    ws.add_image("good.png", 16, 16);
    ws.add_label("good", "0 0.5 0.5 0.5 0.5\n");

    let mut cmd = yoloaug();
    cmd.arg("--config").arg(&ws.config).args(["--seed", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 image(s) written and 1 skipped"))
        .stdout(predicate::str::contains("bad.png: failed"));
}

#[test]
fn test_mode_caps_processed_images() {
    let temp = tempfile::tempdir().unwrap();
    let ws = Workspace::new(temp.path());
    ws.write_config(&resize_only_section(32, 32));
    for stem in ["a", "b", "c"] {
        ws.add_image(&format!("{stem}.png"), 16, 16);
        ws.add_label(stem, "0 0.5 0.5 0.5 0.5\n");
    }

    let mut cmd = yoloaug();
    cmd.arg("--config")
        .arg(&ws.config)
        .args(["--is-test", "--test-num", "1", "--seed", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Augmentation finished: 1 image(s) written"));

    assert!(ws.output_image("a").is_file());
    assert!(!ws.output_image("b").exists());
}

#[test]
fn snake_case_flag_spellings_are_accepted() {
    let temp = tempfile::tempdir().unwrap();
    let ws = Workspace::new(temp.path());
    ws.write_config(&resize_only_section(32, 32));
    for stem in ["a", "b"] {
        ws.add_image(&format!("{stem}.png"), 16, 16);
        ws.add_label(stem, "0 0.5 0.5 0.5 0.5\n");
    }

    let mut cmd = yoloaug();
    cmd.arg("--config").arg(&ws.config).args([
        "--is_test",
        "--test_num",
        "1",
        "--need_save_bb_image",
        "--seed",
        "9",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Augmentation finished: 1 image(s) written"));

    assert!(ws.bb_images.join("a_aug.jpg").is_file());
    assert!(!ws.output_image("b").exists());
}
