use std::path::Path;
use std::process::{Command, Output};

use image::{Rgb, RgbImage};

fn pageshot(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pageshot"))
        .args(args)
        .arg("--config")
        .arg(config_dir.join("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("pageshot binary should run")
}

#[test]
fn list_prints_pages_in_natural_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["p10.png", "p2.png", "p1.png"] {
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))
            .save(dir.path().join(name))
            .unwrap();
    }

    let out = pageshot(&["list", dir.path().to_str().unwrap()], dir.path());
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let p1 = stdout.find("p1.png").unwrap();
    let p2 = stdout.find("p2.png").unwrap();
    let p10 = stdout.find("p10.png").unwrap();
    assert!(p1 < p2 && p2 < p10);
    assert!(stdout.contains("3 PNG file(s)"));
}

#[test]
fn assemble_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]))
        .save(dir.path().join("a1.png"))
        .unwrap();
    let pdf = dir.path().join("out").join("book.pdf");

    let out = pageshot(
        &[
            "assemble",
            dir.path().to_str().unwrap(),
            "--output",
            pdf.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn assemble_empty_folder_fails_once_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = pageshot(&["assemble", dir.path().to_str().unwrap()], dir.path());

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("No png images found").count(), 1);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn assemble_corrupt_page_reports_decode_failure_once() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))
        .save(dir.path().join("p1.png"))
        .unwrap();
    std::fs::write(dir.path().join("p2.png"), b"not a png").unwrap();
    let pdf = dir.path().join("out").join("book.pdf");

    let out = pageshot(
        &[
            "assemble",
            dir.path().to_str().unwrap(),
            "--output",
            pdf.to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("Failed to decode").count(), 1, "{stderr}");
    assert!(stderr.contains("p2.png"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn capture_rejects_tiny_region() {
    let dir = tempfile::tempdir().unwrap();
    let out = pageshot(&["capture", "--region", "0,0,2x2"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("selection too small"));
}
