use std::fs;
use std::path::PathBuf;

use vantage::console::Console;
use vantage::resources::texture::Texture;
use vantage::scene::material::{Material, CHECKERBOARD_PATH, EMBEDDED_TEXTURE_PATH};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("vantage_material_tests")
        .join(name);
    fs::create_dir_all(&dir).expect("create test dir");
    dir
}

fn write_png(dir: &PathBuf, name: &str, colour: [u8; 4]) -> String {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(4, 4, image::Rgba(colour))
        .save(&path)
        .expect("write png");
    path.to_string_lossy().to_string()
}

#[test]
fn new_material_reports_the_checkerboard() {
    let material = Material::new();
    assert_eq!(material.texture_path(), CHECKERBOARD_PATH);
    assert!(!material.has_original_texture());
    assert_eq!(material.texture_width(), 64);
    assert_eq!(material.texture_height(), 64);
}

#[test]
fn load_texture_records_current_and_original_paths() {
    let dir = test_dir("load");
    let path = write_png(&dir, "wood.png", [180, 120, 60, 255]);

    let mut material = Material::new();
    let mut console = Console::new();
    assert!(material.load_texture(&path, &mut console));

    assert_eq!(material.texture_path(), path);
    assert!(material.has_original_texture());
    assert_eq!(material.original_texture_path(), Some(path.as_str()));
    assert_eq!(material.texture_width(), 4);
    assert!(console.entries().any(|m| m.starts_with("Texture loaded")));
}

#[test]
fn failed_load_keeps_the_current_texture() {
    let mut material = Material::new();
    let mut console = Console::new();
    assert!(!material.load_texture("nope/missing.png", &mut console));

    assert_eq!(material.texture_path(), CHECKERBOARD_PATH);
    assert!(!material.has_original_texture());
    assert!(console.entries().any(|m| m.starts_with("Failed to load texture")));
}

#[test]
fn restore_reverts_to_the_last_loaded_file() {
    let dir = test_dir("restore");
    let path = write_png(&dir, "stone.png", [90, 90, 90, 255]);

    let mut material = Material::new();
    let mut console = Console::new();
    assert!(material.load_texture(&path, &mut console));

    // an embedded texture replaces the current one but not the original
    material.adopt_texture(Texture::checkerboard(), EMBEDDED_TEXTURE_PATH);
    assert_eq!(material.texture_path(), EMBEDDED_TEXTURE_PATH);
    assert_eq!(material.original_texture_path(), Some(path.as_str()));

    material.restore_original_texture(&mut console);
    assert_eq!(material.texture_path(), path);
    assert!(console.entries().any(|m| m.starts_with("Original texture restored")));
}

#[test]
fn restore_falls_back_to_checkerboard_when_the_file_vanished() {
    let dir = test_dir("restore_gone");
    let path = write_png(&dir, "gone.png", [1, 2, 3, 255]);

    let mut material = Material::new();
    let mut console = Console::new();
    assert!(material.load_texture(&path, &mut console));
    fs::remove_file(&path).expect("delete texture");

    material.restore_original_texture(&mut console);
    assert_eq!(material.texture_path(), CHECKERBOARD_PATH);
}

#[test]
fn restore_without_an_original_only_reports() {
    let mut material = Material::new();
    let mut console = Console::new();
    material.restore_original_texture(&mut console);

    assert_eq!(material.texture_path(), CHECKERBOARD_PATH);
    assert!(console
        .entries()
        .any(|m| m.contains("No original texture available")));
}
