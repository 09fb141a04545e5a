#![cfg(all(feature = "cli", feature = "png"))]

use assert_cmd::prelude::*;
use commitviz::history::{GitCli, build_histogram};
use resvg::tiny_skia::Pixmap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_on(dir: &Path, name: &str, date: &str) {
    commit_at(dir, name, &format!("{date}T12:00:00"));
}

fn commit_at(dir: &Path, name: &str, stamp: &str) {
    let mut f = File::create(dir.join(name)).unwrap();
    f.write_all(stamp.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_DATE", stamp)
        .env("GIT_COMMITTER_DATE", stamp)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

#[test]
fn calendar_renders_png_with_grid_dimensions() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_on(repo.path(), "a.txt", "2024-01-01");
    commit_on(repo.path(), "b.txt", "2024-01-01");
    commit_on(repo.path(), "c.txt", "2024-01-07");
    commit_on(repo.path(), "d.txt", "2023-06-15");

    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("calendar.png");
    Command::cargo_bin("commitviz-calendar")
        .unwrap()
        .arg(repo.path())
        .arg("2024")
        .arg(&output)
        .assert()
        .success();

    let pixmap = Pixmap::load_png(&output).unwrap();
    // 53 week columns of 14px plus margins, 7 rows plus margins.
    assert_eq!(pixmap.width(), 32 + 53 * 14 + 16);
    assert_eq!(pixmap.height(), 24 + 7 * 14 + 32);
    // Flattened against the white background.
    assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 255);
}

#[test]
fn commits_at_the_edges_of_the_year_are_counted() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_at(repo.path(), "before.txt", "2023-12-31T23:50:00");
    commit_at(repo.path(), "a.txt", "2024-01-01T00:30:00");
    commit_at(repo.path(), "b.txt", "2024-01-01T00:40:00");
    commit_at(repo.path(), "c.txt", "2024-12-31T23:50:00");
    commit_at(repo.path(), "after.txt", "2025-01-01T00:10:00");

    let histogram = build_histogram(&GitCli::new(), repo.path(), 2024).unwrap();
    assert_eq!(histogram.get("2024-01-01"), 2);
    assert_eq!(histogram.get("2024-12-31"), 1);
    assert_eq!(histogram.get("2023-12-31"), 0);
    assert_eq!(histogram.get("2025-01-01"), 0);
    assert_eq!(histogram.total(), 3);

    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("edges.png");
    Command::cargo_bin("commitviz-calendar")
        .unwrap()
        .arg(repo.path())
        .arg("2024")
        .arg(&output)
        .assert()
        .success();

    // Cell centers: Jan 1 is column 0 row 1, Dec 31 is column 52 row 2.
    let pixmap = Pixmap::load_png(&output).unwrap();
    for (x, y) in [(32 + 5, 24 + 14 + 5), (32 + 52 * 14 + 5, 24 + 2 * 14 + 5)] {
        let px = pixmap.pixel(x, y).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0xc6, 0xe4, 0x8b), "({x}, {y})");
    }
}

#[test]
fn calendar_defaults_to_graph_png_in_working_dir() {
    if !has_git() {
        return;
    }
    let repo = tempdir().unwrap();
    init_git_repo(repo.path());
    commit_on(repo.path(), "a.txt", "2021-03-04");

    let work = tempdir().unwrap();
    Command::cargo_bin("commitviz-calendar")
        .unwrap()
        .current_dir(work.path())
        .arg(repo.path())
        .arg("2021")
        .assert()
        .success();
    assert!(work.path().join("graph.png").exists());
}

#[test]
fn calendar_missing_arguments_prints_usage() {
    let work = tempdir().unwrap();
    for args in [&[][..], &["some/repo"][..]] {
        let out = Command::cargo_bin("commitviz-calendar")
            .unwrap()
            .current_dir(work.path())
            .args(args)
            .assert()
            .code(1)
            .get_output()
            .stderr
            .clone();
        let stderr = String::from_utf8_lossy(&out);
        assert!(stderr.contains("Usage:"), "{stderr}");
    }
    assert!(!work.path().join("graph.png").exists());
}

#[test]
fn calendar_rejects_bad_years() {
    let work = tempdir().unwrap();
    for year in ["1969", "2101", "abc", "2024.5"] {
        let out = Command::cargo_bin("commitviz-calendar")
            .unwrap()
            .current_dir(work.path())
            .args([".", year])
            .assert()
            .code(1)
            .get_output()
            .stderr
            .clone();
        let stderr = String::from_utf8_lossy(&out);
        assert!(stderr.contains("Usage:"), "{year}: {stderr}");
    }
    assert!(!work.path().join("graph.png").exists());
}

#[test]
fn calendar_fails_outside_a_repository() {
    if !has_git() {
        return;
    }
    let work = tempdir().unwrap();
    let not_a_repo = tempdir().unwrap();
    let output = work.path().join("out.png");
    let out = Command::cargo_bin("commitviz-calendar")
        .unwrap()
        .env("GIT_CEILING_DIRECTORIES", not_a_repo.path().parent().unwrap())
        .arg(not_a_repo.path())
        .arg("2024")
        .arg(&output)
        .assert()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("error:"), "{stderr}");
    assert!(stderr.contains("not a git repository"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn calendar_reports_missing_repository_path() {
    let work = tempdir().unwrap();
    let missing = work.path().join("missing");
    let output = work.path().join("out.png");
    let out = Command::cargo_bin("commitviz-calendar")
        .unwrap()
        .arg(&missing)
        .arg("2024")
        .arg(&output)
        .assert()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("is not a directory"), "{stderr}");
    assert!(!stderr.contains("failed to run"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn graph_renders_fixed_canvas() {
    let work = tempdir().unwrap();
    let output = work.path().join("nodes.png");
    Command::cargo_bin("commitviz-graph")
        .unwrap()
        .arg(&output)
        .assert()
        .success();
    let pixmap = Pixmap::load_png(&output).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (900, 500));
}

#[test]
fn graph_unwritable_output_fails() {
    let work = tempdir().unwrap();
    let output = work.path().join("no").join("such").join("dir.png");
    Command::cargo_bin("commitviz-graph")
        .unwrap()
        .arg(&output)
        .assert()
        .code(1);
}
