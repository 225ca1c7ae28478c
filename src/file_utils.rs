use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions accepted as plain-text screenplays
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "fountain"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @generates: Output path for a parse result
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Title derived from a file name, e.g. `The Big Lebowski.pdf` -> `The Big Lebowski`
    pub fn title_from_path<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Find screenplay inputs (PDF or text) below a directory, sorted by path
    pub fn find_screenplays<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::input_type_from_extension(path) != InputType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    fn input_type_from_extension(path: &Path) -> InputType {
        let Some(ext) = path.extension() else {
            return InputType::Unknown;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        if ext == "pdf" {
            InputType::Pdf
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            InputType::Text
        } else {
            InputType::Unknown
        }
    }

    /// Detect whether a file is a PDF document or a plain-text screenplay
    pub fn detect_input_type<P: AsRef<Path>>(path: P) -> Result<InputType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        let by_extension = Self::input_type_from_extension(path);
        if by_extension != InputType::Unknown {
            return Ok(by_extension);
        }

        // Fall back to examining the first bytes
        let mut header = [0u8; 512];
        let read = File::open(path)
            .and_then(|mut file| file.read(&mut header))
            .with_context(|| format!("Failed to read file header: {:?}", path))?;
        let header = &header[..read];

        if header.starts_with(b"%PDF-") {
            return Ok(InputType::Pdf);
        }

        // A multi-byte character cut at the end of the header is still text
        let utf8 = match std::str::from_utf8(header) {
            Ok(_) => true,
            Err(e) => e.error_len().is_none(),
        };
        if !header.is_empty() && !header.contains(&0) && utf8 {
            return Ok(InputType::Text);
        }

        Ok(InputType::Unknown)
    }
}

/// Kind of screenplay input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// PDF document, text is extracted page by page
    Pdf,
    /// Plain UTF-8 text
    Text,
    /// Anything else
    Unknown,
}
