use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn inspect_reports_the_object_graph() {
    let report = formwork_cli::inspect(&fixture("settings.ui")).expect("inspect");

    assert!(report.starts_with("QDialog SettingsDialog"));
    assert!(report.contains("QGridLayout gridLayout"));
    assert!(report.contains("QLabel hostLabel @ (0,0 1x1)"));
    assert!(report.contains("QLineEdit hostEdit @ (0,1 1x1)"));
    assert!(report.contains("QPushButton connectButton @ (1,0 1x2)"));
    assert!(report.contains("resource modules:"));
    assert!(report.contains("icons_rc"));
}

#[test]
fn check_accepts_the_fixture() {
    formwork_cli::check(&fixture("settings.ui")).expect("check");
}

#[test]
fn check_rejects_unsupported_versions() {
    let path = std::env::temp_dir().join(format!("formwork-badversion-{}.ui", std::process::id()));
    fs::write(&path, r#"<ui version="3.0"><widget class="QWidget" name="w"/></ui>"#)
        .expect("write temp document");

    let err = formwork_cli::check(&path).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported ui document version"));

    fs::remove_file(&path).ok();
}

#[test]
fn check_reports_missing_files() {
    assert!(formwork_cli::check(&fixture("does-not-exist.ui")).is_err());
}
