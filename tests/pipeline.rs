//! End-to-end tests: scan an archive on disk, write the index, load it back
//! into a browser, filter, render, and activate images.
//!
//! Run with: `cargo test --test pipeline`

use archive_browser::browser::Browser;
use archive_browser::config::ScanConfig;
use archive_browser::filter::{FilterEvent, Selection};
use archive_browser::lazy::{GridGeometry, ViewportObserver};
use archive_browser::render::View;
use archive_browser::{config, page, scan};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn write_archive(root: &Path, years: &[(&str, &[&str])]) {
    for (year, files) in years {
        let dir = root.join(year);
        fs::create_dir_all(&dir).unwrap();
        for file in *files {
            fs::write(dir.join(file), b"").unwrap();
        }
    }
}

/// Scan `root` and write the index into the temp dir; returns the index path.
fn scan_and_write(tmp: &TempDir, root: &Path) -> PathBuf {
    let report = scan::scan(root, &ScanConfig::default());
    let out = tmp.path().join("data/archive-data.json");
    scan::write_index(&report.index, &out).unwrap();
    out
}

fn geometry(rows: u32) -> GridGeometry {
    GridGeometry {
        columns: 2,
        row_height: 100,
        viewport_height: rows * 100,
        margin: 0,
    }
}

fn sample_archive(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().join("img/Archive");
    write_archive(
        &root,
        &[
            (
                "2022",
                &[
                    "2022-alban_ovanessian-02-final.png",
                    "2022-alban_ovanessian-01-bts.jpeg",
                    "2022-kim-01-behind-the-scenes.jpg",
                    "readme.txt",
                ],
            ),
            ("2023", &["2023-kim-02-final.gif", "2023-lee-01.jpg"]),
            ("2024", &["2024-lee-01-bts.JPG"]),
        ],
    );
    scan_and_write(tmp, &root)
}

// ---------------------------------------------------------------------------
// Indexer → file
// ---------------------------------------------------------------------------

#[test]
fn two_files_become_two_sorted_entries() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("img/Archive");
    write_archive(
        &root,
        &[(
            "2022",
            &[
                "2022-alban_ovanessian-02-final.png",
                "2022-alban_ovanessian-01-bts.jpeg",
            ],
        )],
    );
    let index_path = scan_and_write(&tmp, &root);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&index_path).unwrap()).unwrap();
    let entries = json["2022"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["sequence"], "01");
    assert_eq!(entries[0]["medium"], "bts");
    assert_eq!(entries[0]["artistDisplay"], "Alban Ovanessian");
    assert_eq!(entries[0]["id"], "2022-alban_ovanessian-01");
    assert_eq!(
        entries[0]["path"],
        "img/Archive/2022/2022-alban_ovanessian-01-bts.jpeg"
    );
    assert_eq!(entries[1]["sequence"], "02");
    assert_eq!(entries[1]["medium"], "final");
    assert_eq!(entries[1]["extension"], "png");

    let browser = Browser::open(&index_path, ViewportObserver::new(geometry(0)));
    let media: Vec<&str> = browser.view().cells().iter().map(|c| c.medium.as_str()).collect();
    assert_eq!(media, vec!["Bts", "Final"]);
    assert!(
        browser
            .view()
            .cells()
            .iter()
            .all(|c| c.artist == "Alban Ovanessian")
    );
}

#[test]
fn missing_year_folder_still_written() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("img/Archive");
    write_archive(
        &root,
        &[
            ("2022", &["2022-kim-01-final.jpg"]),
            ("2024", &["2024-kim-01-final.jpg"]),
        ],
    );
    let index_path = scan_and_write(&tmp, &root);

    let raw = fs::read_to_string(&index_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["2023"], serde_json::json!([]));

    let keys: Vec<usize> = ["\"2022\"", "\"2023\"", "\"2024\""]
        .iter()
        .map(|k| raw.find(k).unwrap())
        .collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "year keys out of order");
}

// ---------------------------------------------------------------------------
// File → browser
// ---------------------------------------------------------------------------

#[test]
fn browser_filters_loaded_index() {
    let tmp = TempDir::new().unwrap();
    let index_path = sample_archive(&tmp);
    let mut browser = Browser::open(&index_path, ViewportObserver::new(geometry(0)));

    assert_eq!(browser.view().cells().len(), 5);
    let vocab = browser.vocabularies().unwrap();
    assert_eq!(vocab.years, vec!["2022", "2023", "2024"]);
    assert_eq!(vocab.media, vec!["behind-the-scenes", "bts", "final"]);
    assert_eq!(vocab.artists, vec!["Alban Ovanessian", "Kim", "Lee"]);

    browser.handle(FilterEvent::ArtistChanged(Selection::only("Kim")));
    assert_eq!(browser.view().cells().len(), 2);

    browser.handle(FilterEvent::MediumClicked(Selection::only("final")));
    let captions: Vec<&str> = browser
        .view()
        .cells()
        .iter()
        .map(|c| c.caption.as_str())
        .collect();
    assert_eq!(captions, vec!["2023 \u{b7} 2023-kim-02-final.gif"]);

    browser.handle(FilterEvent::YearClicked(Selection::only("2022")));
    assert_eq!(browser.view(), &View::Empty);

    browser.handle(FilterEvent::Reset);
    assert_eq!(browser.view().cells().len(), 5);
    match browser.view() {
        View::Grid { stats, .. } => assert_eq!(
            stats.to_string(),
            "Showing 5 works \u{b7} 3 years \u{b7} 3 artists \u{b7} 3 mediums"
        ),
        other => panic!("expected grid, got {other:?}"),
    }
}

#[test]
fn first_screen_activates_visible_rows_only() {
    let tmp = TempDir::new().unwrap();
    let index_path = sample_archive(&tmp);
    let mut browser = Browser::open(&index_path, ViewportObserver::new(geometry(1)));

    let active: Vec<bool> = browser.image_slots().iter().map(|s| s.is_active()).collect();
    assert_eq!(active, vec![true, true, false, false, false]);

    browser.observer_mut().scroll_to(150);
    assert!(browser.image_slots().iter().all(|s| s.is_active()));
}

#[test]
fn rerender_rearms_lazy_loading() {
    let tmp = TempDir::new().unwrap();
    let index_path = sample_archive(&tmp);
    let mut browser = Browser::open(&index_path, ViewportObserver::new(geometry(1)));

    browser.observer_mut().scroll_to(150);
    browser.handle(FilterEvent::ArtistChanged(Selection::only("Lee")));

    // Scroll position is kept; the single new row is outside 150..250.
    let slots = browser.image_slots();
    assert_eq!(slots.len(), 1);
    assert!(!slots[0].is_active());

    browser.observer_mut().scroll_to(0);
    assert!(browser.image_slots()[0].is_active());
}

#[test]
fn missing_index_shows_error_only() {
    let tmp = TempDir::new().unwrap();
    let mut browser = Browser::open(
        &tmp.path().join("data/archive-data.json"),
        ViewportObserver::new(geometry(3)),
    );

    assert!(matches!(browser.view(), View::Error { .. }));
    assert!(browser.view().cells().is_empty());
    browser.handle(FilterEvent::MediumClicked(Selection::only("bts")));
    assert_eq!(browser.renders(), 0);
    assert!(browser.image_slots().is_empty());
}

#[test]
fn rendered_page_reflects_filters() {
    let tmp = TempDir::new().unwrap();
    let index_path = sample_archive(&tmp);
    let mut browser = Browser::open(&index_path, ViewportObserver::new(geometry(0)));
    browser.handle(FilterEvent::YearClicked(Selection::only("2023")));

    let out = tmp.path().join("site/index.html");
    page::write_page(&browser, &config::BrowserConfig::default(), &out).unwrap();
    let html = fs::read_to_string(&out).unwrap();

    assert!(html.contains(r#"data-src="img/Archive/2023/2023-kim-02-final.gif""#));
    assert!(!html.contains("2022-kim-01-behind-the-scenes.jpg"));
    assert!(html.contains("Showing 1 work"));
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

fn run(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_archive-browser"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn cli_scan_then_browse() {
    let tmp = TempDir::new().unwrap();
    write_archive(
        &tmp.path().join("img/Archive"),
        &[("2022", &["2022-alban_ovanessian-01-bts.jpeg"])],
    );

    let out = run(tmp.path(), &["scan"]);
    assert!(
        out.status.success(),
        "scan failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("2022: Found 1 file"));
    assert!(stdout.contains("2023: Folder not found"));
    assert!(tmp.path().join("data/archive-data.json").is_file());

    let out = run(tmp.path(), &["browse", "--medium", "bts", "--viewport", "2"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Showing 1 work"));
    assert!(stdout.contains("001 Alban Ovanessian \u{b7} Bts"));
    assert!(stdout.contains("First screen loads 1 of 1 image"));
}

#[test]
fn cli_browse_without_index_fails() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["browse"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load archive data"));
}

#[test]
fn cli_rejects_unknown_filter_value() {
    let tmp = TempDir::new().unwrap();
    write_archive(
        &tmp.path().join("img/Archive"),
        &[("2022", &["2022-kim-01-final.jpg"])],
    );
    assert!(run(tmp.path(), &["scan"]).status.success());

    let out = run(tmp.path(), &["browse", "--artist", "Nobody"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown artist 'Nobody'"));
}

#[test]
fn cli_gen_config_parses_back() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let path = tmp.path().join("archive.toml");
    fs::write(&path, &out.stdout).unwrap();
    let loaded = config::load_config(&path).unwrap();
    assert_eq!(loaded.scan.years, vec!["2022", "2023", "2024"]);
}
