/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use scriptparse::file_utils::{FileManager, InputType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.txt", "content")?;
    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

#[test]
fn test_generate_output_path_withValidInputs_shouldReplaceExtension() {
    let output_path =
        FileManager::generate_output_path(Path::new("/scripts/Big Fish.pdf"), Path::new("/out"), "json");
    assert_eq!(output_path, Path::new("/out/Big Fish.json"));
}

#[test]
fn test_title_from_path_shouldUseFileStem() {
    assert_eq!(FileManager::title_from_path("/scripts/The Big Lebowski.pdf"), "The Big Lebowski");
}

#[test]
fn test_detect_input_type_byExtension_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pdf = common::create_test_file(temp_dir.path(), "a.PDF", "whatever")?;
    let txt = common::create_test_file(temp_dir.path(), "b.fountain", "INT. HOUSE - DAY")?;

    assert_eq!(FileManager::detect_input_type(&pdf)?, InputType::Pdf);
    assert_eq!(FileManager::detect_input_type(&txt)?, InputType::Text);
    Ok(())
}

#[test]
fn test_detect_input_type_byContent_shouldSniffHeader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pdf = common::create_test_file(temp_dir.path(), "upload", "%PDF-1.4\n%...")?;
    let text = common::create_test_file(temp_dir.path(), "draft", "INT. CAFÉ - DAY\n")?;
    let binary = temp_dir.path().join("blob");
    std::fs::write(&binary, [0u8, 159, 146, 150])?;

    assert_eq!(FileManager::detect_input_type(&pdf)?, InputType::Pdf);
    assert_eq!(FileManager::detect_input_type(&text)?, InputType::Text);
    assert_eq!(FileManager::detect_input_type(&binary)?, InputType::Unknown);
    Ok(())
}

#[test]
fn test_detect_input_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_input_type("./no_such_script_12345.pdf").is_err());
}

#[test]
fn test_find_screenplays_shouldReturnSortedInputsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.pdf", "x")?;
    common::create_test_file(temp_dir.path(), "nested/a.txt", "x")?;
    common::create_test_file(temp_dir.path(), "notes.md", "x")?;

    let found = FileManager::find_screenplays(temp_dir.path())?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(found.len(), 2);
    assert!(names.contains(&"b.pdf".to_string()));
    assert!(names.contains(&"a.txt".to_string()));
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted);
    Ok(())
}
