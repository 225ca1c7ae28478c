/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use std::path::PathBuf;

use scriptparse::errors::{
    AppError, ExtractionError, ParseError, PersistenceError, ScriptError, UnsupportedFormatError,
};
use scriptparse::screenplay::FormatTag;

#[test]
fn test_unsupportedFormatError_shouldIncludeTag() {
    let error = UnsupportedFormatError {
        tag: FormatTag::new("fountain"),
    };
    let display = format!("{}", error);
    assert!(display.contains("Unsupported screenplay format"));
    assert!(display.contains("fountain"));
}

#[test]
fn test_parseError_shouldDisplayFormatAndMessage() {
    let error = ParseError::Malformed {
        format: FormatTag::standard(),
        message: "NUL character at byte 3".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("standard"));
    assert!(display.contains("NUL character at byte 3"));
}

#[test]
fn test_extractionError_open_shouldChainIoError() {
    let error = ExtractionError::Open {
        path: PathBuf::from("missing.pdf"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
    };
    assert!(format!("{}", error).contains("missing.pdf"));

    let source = error.source().expect("source should be kept");
    assert!(source.to_string().contains("No such file"));
}

#[test]
fn test_persistenceError_io_shouldChainIoError() {
    let error = PersistenceError::Io {
        path: PathBuf::from("/out/result.json"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
    };
    assert!(format!("{}", error).contains("result.json"));
    assert!(error.source().is_some());
}

#[test]
fn test_scriptError_shouldBeTransparent() {
    let inner = UnsupportedFormatError {
        tag: FormatTag::new("fdx"),
    };
    let error: ScriptError = inner.clone().into();
    assert_eq!(format!("{}", error), format!("{}", inner));
}

#[test]
fn test_appError_fromScriptError_shouldKeepKind() {
    let parse: AppError = ScriptError::Parse(ParseError::Malformed {
        format: FormatTag::standard(),
        message: "bad".to_string(),
    })
    .into();
    assert!(matches!(parse, AppError::Parse(_)));

    let unsupported: AppError = ScriptError::UnsupportedFormat(UnsupportedFormatError {
        tag: FormatTag::new("x"),
    })
    .into();
    assert!(matches!(unsupported, AppError::UnsupportedFormat(_)));
}

#[test]
fn test_appError_exitCode_shouldBeDistinctPerKind() {
    let extraction: AppError = ExtractionError::Decode {
        source: "broken xref".into(),
    }
    .into();
    let unsupported: AppError = UnsupportedFormatError {
        tag: FormatTag::new("x"),
    }
    .into();
    let parse: AppError = ParseError::Malformed {
        format: FormatTag::standard(),
        message: "bad".to_string(),
    }
    .into();
    let persistence: AppError = PersistenceError::Io {
        path: PathBuf::from("x"),
        source: std::io::Error::other("disk full"),
    }
    .into();

    let codes = [
        extraction.exit_code(),
        unsupported.exit_code(),
        parse.exit_code(),
        persistence.exit_code(),
    ];
    assert_eq!(codes, [2, 3, 4, 5]);
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
    assert_eq!(app_error.exit_code(), 1);
}
