/*!
 * Text acquisition from PDF documents.
 *
 * A `PageSource` yields the text of each page in document order; `extract_text`
 * joins them into the raw screenplay text, one newline after every page.
 */

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::errors::ExtractionError;

/// Anything that can produce page-ordered text
pub trait PageSource {
    /// Text of every page, first page first
    fn page_texts(&self) -> Result<Vec<String>, ExtractionError>;
}

impl PageSource for Vec<String> {
    fn page_texts(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.clone())
    }
}

/// PDF document loaded into memory and decoded with `pdf-extract`
#[derive(Debug, Clone)]
pub struct PdfDocument {
    origin: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl PdfDocument {
    /// Read the document at `path`; the file handle is released before returning
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let bytes = {
            let mut file = File::open(path).map_err(|source| ExtractionError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)
                .map_err(|source| ExtractionError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
            bytes
        };
        debug!("Read {} bytes from {:?}", bytes.len(), path);

        Ok(Self {
            origin: Some(path.to_path_buf()),
            bytes,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            origin: None,
            bytes,
        }
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl PageSource for PdfDocument {
    fn page_texts(&self) -> Result<Vec<String>, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&self.bytes)
            .map_err(|e| ExtractionError::Decode { source: Box::new(e) })?;

        // pdf-extract opens every page with page-break newlines
        Ok(pages
            .into_iter()
            .map(|page| page.trim_matches('\n').to_string())
            .collect())
    }
}

/// Concatenate the pages of `source`, each followed by exactly one newline
pub fn extract_text<S: PageSource + ?Sized>(source: &S) -> Result<String, ExtractionError> {
    let pages = source.page_texts().inspect_err(|e| {
        error!("Text extraction failed: {}", e);
    })?;

    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in &pages {
        text.push_str(page);
        text.push('\n');
    }

    debug!("Extracted {} characters from {} pages", text.len(), pages.len());
    Ok(text)
}

/// Open the PDF at `path` and extract its text
pub fn extract_text_from_path<P: AsRef<Path>>(path: P) -> Result<String, ExtractionError> {
    let document = PdfDocument::open(path.as_ref()).inspect_err(|e| {
        error!("Text extraction failed: {}", e);
    })?;
    extract_text(&document)
}
