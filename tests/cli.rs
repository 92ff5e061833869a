//! End-to-end tests for the `navtree` binary.
//!
//! Each test builds a throwaway project from `fixtures/site`:
//!
//! ```text
//! <tmp>/
//! ├── navtree.toml     # written per test, when needed
//! └── source/          # copy of fixtures/site
//! ```

use navtree::datafile::read_data_file;
use navtree::tree::TreeNode;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TOP_LEVEL: &[&str] = &[
    "0001-index.html.erb",
    "0002-getting%20started",
    "0003-reference",
    "about.html.md",
    "blog",
];

fn copy_dir_recursive(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let dst_path = dst.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_recursive(&entry.path(), &dst_path);
        } else {
            fs::copy(entry.path(), &dst_path).unwrap();
        }
    }
}

fn project(config: Option<&str>) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, &tmp.path().join("source"));
    if let Some(config) = config {
        fs::write(tmp.path().join("navtree.toml"), config).unwrap();
    }
    tmp
}

fn navtree(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_navtree"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run navtree")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "navtree failed\nstdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

// ===========================================================================
// build
// ===========================================================================

#[test]
fn build_writes_tree_file() {
    let tmp = project(None);
    let output = navtree(tmp.path(), &["build"]);
    assert_success(&output);

    let tree = read_data_file(&tmp.path().join("data/tree.yml")).unwrap();
    let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(keys, TOP_LEVEL);

    let guides = tree["0002-getting%20started"].as_directory().unwrap();
    assert_eq!(
        guides["0001-install.html.md"],
        TreeNode::Leaf("/getting%20started/install.html.md".into())
    );
    assert_eq!(
        tree["0001-index.html.erb"],
        TreeNode::Leaf("/index.html.erb".into())
    );

    let out = stdout(&output);
    assert!(out.contains("0002-getting%20started/"), "{out}");
    assert!(out.contains("written"), "{out}");
}

#[test]
fn rebuild_is_byte_identical() {
    let tmp = project(None);
    let data = tmp.path().join("data/tree.yml");

    assert_success(&navtree(tmp.path(), &["build"]));
    let first = fs::read(&data).unwrap();

    let output = navtree(tmp.path(), &["build"]);
    assert_success(&output);
    assert_eq!(fs::read(&data).unwrap(), first);
    assert!(stdout(&output).contains("unchanged"));
}

#[test]
fn build_picks_up_new_pages() {
    let tmp = project(None);
    assert_success(&navtree(tmp.path(), &["build"]));

    fs::write(
        tmp.path().join("source/reference/api.html.md"),
        "---\ndisplay_order: 1\n---\n",
    )
    .unwrap();
    assert_success(&navtree(tmp.path(), &["build"]));

    let tree = read_data_file(&tmp.path().join("data/tree.yml")).unwrap();
    let reference = tree["0003-reference"].as_directory().unwrap();
    let keys: Vec<&str> = reference.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["0001-api.html.md", "cli.html.md", "config.html.md"]);
}

#[test]
fn data_file_inside_source_is_not_scanned() {
    let tmp = project(Some("data_dir = \"source/_data\"\n"));
    let data = tmp.path().join("source/_data/tree.yml");

    assert_success(&navtree(tmp.path(), &["build"]));
    let first = fs::read(&data).unwrap();
    let output = navtree(tmp.path(), &["build"]);
    assert_success(&output);

    assert_eq!(fs::read(&data).unwrap(), first);
    assert!(stdout(&output).contains("unchanged"));
    let tree = read_data_file(&data).unwrap();
    let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(keys, TOP_LEVEL);
}

#[test]
fn json_data_file() {
    let tmp = project(Some("data_dir = \"_data\"\ndata_file = \"nav.json\"\n"));
    assert_success(&navtree(tmp.path(), &["build"]));

    let path = tmp.path().join("_data/nav.json");
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.trim_start().starts_with('{'));
    let tree = read_data_file(&path).unwrap();
    assert!(tree.contains_key("0003-reference"));
}

#[test]
fn automatic_updates_off_skips_write_unless_forced() {
    let tmp = project(Some("automatic_updates = false\n"));
    let data = tmp.path().join("data/tree.yml");

    let output = navtree(tmp.path(), &["build"]);
    assert_success(&output);
    assert!(!data.exists());
    assert!(stdout(&output).contains("not written"));

    assert_success(&navtree(tmp.path(), &["build", "--force"]));
    assert!(data.exists());
}

#[test]
fn config_changes_filtering() {
    let tmp = project(Some(
        "ignore_dirs = [\"assets\", \"blog\"]\next_whitelist = [\".md\"]\n",
    ));
    assert_success(&navtree(tmp.path(), &["build"]));

    let tree = read_data_file(&tmp.path().join("data/tree.yml")).unwrap();
    let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    // index.html.erb fails the whitelist, blog is ignored
    assert_eq!(keys, vec!["0002-getting%20started", "0003-reference", "about.html.md"]);
}

#[test]
fn explicit_config_path() {
    let tmp = project(None);
    let config = tmp.path().join("alt.toml");
    fs::write(&config, "data_file = \"alt.yml\"\n").unwrap();

    let output = navtree(tmp.path(), &["--config", config.to_str().unwrap(), "build"]);
    assert_success(&output);
    assert!(tmp.path().join("data/alt.yml").exists());
    assert!(!tmp.path().join("data/tree.yml").exists());
}

// ===========================================================================
// check / show
// ===========================================================================

#[test]
fn check_does_not_write() {
    let tmp = project(None);
    let output = navtree(tmp.path(), &["check"]);
    assert_success(&output);
    assert!(stdout(&output).contains("0001-index.html.erb → /index.html.erb"));
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn show_prints_stored_tree() {
    let tmp = project(None);
    assert_success(&navtree(tmp.path(), &["build"]));
    fs::remove_dir_all(tmp.path().join("source/blog")).unwrap();

    let output = navtree(tmp.path(), &["show"]);
    assert_success(&output);
    // The stored tree, not a fresh scan
    assert!(stdout(&output).contains("blog/"));
}

#[test]
fn show_without_data_file_fails() {
    let tmp = project(None);
    let output = navtree(tmp.path(), &["show"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("tree.yml"), "{}", stderr(&output));
}

// ===========================================================================
// errors
// ===========================================================================

#[test]
fn missing_source_fails_with_path() {
    let tmp = TempDir::new().unwrap();
    let output = navtree(tmp.path(), &["build"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Cannot read source directory"), "{err}");
    assert!(err.contains("source"), "{err}");
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn invalid_config_fails_with_path() {
    let tmp = project(Some("data_file = \"tree.txt\"\n"));
    let output = navtree(tmp.path(), &["build"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("navtree.toml"), "{err}");
    assert!(err.contains("data_file"), "{err}");
}

#[test]
fn unknown_config_key_fails() {
    let tmp = project(Some("ignore_folders = [\"x\"]\n"));
    let output = navtree(tmp.path(), &["check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ignore_folders"), "{}", stderr(&output));
}

// ===========================================================================
// gen-config
// ===========================================================================

#[test]
fn gen_config_output_is_loadable() {
    let tmp = TempDir::new().unwrap();
    let output = navtree(tmp.path(), &["gen-config"]);
    assert_success(&output);

    fs::write(tmp.path().join("navtree.toml"), &output.stdout).unwrap();
    let config = navtree::config::load_config(tmp.path()).unwrap();
    assert_eq!(config, navtree::config::NavTreeConfig::default());
}
