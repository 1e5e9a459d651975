use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn blockfont() -> Command {
    Command::cargo_bin("blockfont").expect("blockfont binary")
}

fn mini_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../blockfont/tests/fonts/mini.bit")
}

#[test]
fn lists_builtin_font() {
    blockfont()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available fonts:").and(predicate::str::contains("Blocky")));
}

#[test]
fn lists_loaded_fonts() {
    blockfont()
        .args(["list", "--load"])
        .arg(mini_font())
        .assert()
        .success()
        .stdout(predicate::str::contains("  Blocky\n  Mini\n"));
}

#[test]
fn renders_with_ansi_color_code() {
    blockfont()
        .args(["render", "--color", "31", "HI"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[38;2;205;49;49m█\x1b[0m"));
}

#[test]
fn exports_plain_text() {
    blockfont()
        .args(["render", "--export", "txt", "I"])
        .assert()
        .success()
        .stdout("███\n █ \n █ \n █ \n███\n");
}

#[test]
fn renders_default_text() {
    let out = blockfont()
        .args(["render", "--export", "txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn rejects_out_of_range_spacing() {
    blockfont()
        .args(["render", "--char-spacing", "11", "HI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("char_spacing"));
}

#[test]
fn rejects_unknown_scale() {
    blockfont()
        .args(["render", "--scale", "3", "HI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scale"));
}

#[test]
fn rejects_bad_color() {
    blockfont()
        .args(["render", "--color", "#12345", "HI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--color"));
}

#[test]
fn unknown_font_is_an_error() {
    blockfont()
        .args(["render", "--font", "nosuchfont", "HI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn renders_font_from_path() {
    blockfont()
        .args(["render", "--export", "txt", "--font"])
        .arg(mini_font())
        .arg("HI")
        .assert()
        .success()
        .stdout("█ █  ███\n███   █ \n█ █  ███\n");
}

#[test]
fn config_file_replaces_cli_defaults() {
    let dir = std::env::temp_dir().join(format!("blockfont-config-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create dir");
    let config = dir.join("options.json");
    fs::write(&config, r#"{ "char_spacing": 1 }"#).expect("write config");
    blockfont()
        .args(["render", "--export", "txt", "--config"])
        .arg(&config)
        .arg("--font")
        .arg(mini_font())
        .arg("HI")
        .assert()
        .success()
        .stdout("█ █ ███\n███  █ \n█ █ ███\n");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn negative_shadow_offsets_parse() {
    blockfont()
        .args(["render", "--shadow", "--shadow-h", "-2", "--shadow-v", "-1", "I"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▒"));
}

#[test]
fn inspects_font() {
    blockfont()
        .args(["inspect", "Blocky"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Font: Blocky")
                .and(predicate::str::contains("Line height: 5"))
                .and(predicate::str::contains("Half-block pixels: no")),
        );
    blockfont()
        .arg("inspect")
        .arg(mini_font())
        .assert()
        .success()
        .stdout(predicate::str::contains("Half-block pixels: yes"));
}

#[test]
fn export_to_file_appends_extension() {
    let dir = std::env::temp_dir().join(format!("blockfont-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create dir");
    blockfont()
        .args(["render", "--export", "py", "--output"])
        .arg(dir.join("banner"))
        .arg("OK")
        .assert()
        .success()
        .stdout(predicate::str::contains("Python source code"));
    let source = fs::read_to_string(dir.join("banner.py")).expect("exported file");
    assert!(source.contains("def display_ansi_art():"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn png_export_needs_output_file() {
    blockfont()
        .args(["render", "--export", "png", "HI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));

    let dir = std::env::temp_dir().join(format!("blockfont-png-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create dir");
    blockfont()
        .args(["render", "--export", "png", "--output"])
        .arg(dir.join("banner"))
        .arg("HI")
        .assert()
        .success()
        .stdout(predicate::str::contains("PNG image"));
    let bytes = fs::read(dir.join("banner.png")).expect("png file");
    assert!(bytes.starts_with(b"\x89PNG"));
    let _ = fs::remove_dir_all(&dir);
}
