use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::{AppError, ExtractionError};
use crate::file_utils::{FileManager, InputType};
use crate::persistence;
use crate::pipeline;
use crate::screenplay::{FormatDetector, FormatTag, ParserRegistry, ScriptParser, StandardParser};
use crate::text_acquisition;

// @module: Application controller for screenplay processing

/// Outcome of processing a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files parsed and written
    pub processed: usize,
    /// Files whose result already existed
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
}

/// Main application controller: reads inputs, runs the pipeline, writes results
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Parsers available to this controller
    registry: ParserRegistry,
    // @field: Dialect detection rules
    detector: FormatDetector,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        // The standard parser follows the configured page and label settings
        let mut registry = ParserRegistry::with_defaults();
        let parser_config = config.parser.clone();
        registry.register_parser(FormatTag::standard(), move || {
            Box::new(StandardParser::new(parser_config.clone())) as Box<dyn ScriptParser>
        });

        Ok(Self {
            config,
            registry,
            detector: FormatDetector::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Make an additional dialect available to this controller
    pub fn register_parser<F>(&mut self, tag: impl Into<FormatTag>, constructor: F)
    where
        F: Fn() -> Box<dyn ScriptParser> + Send + Sync + 'static,
    {
        self.registry.register_parser(tag, constructor);
    }

    /// Replace the detection rules
    pub fn set_detector(&mut self, detector: FormatDetector) {
        self.detector = detector;
    }

    /// Read the raw screenplay text of a PDF or text file
    pub fn load_script(&self, input_file: &Path) -> Result<String, AppError> {
        match FileManager::detect_input_type(input_file)? {
            InputType::Pdf => {
                debug!("Extracting PDF text from {:?}", input_file);
                Ok(text_acquisition::extract_text_from_path(input_file)?)
            }
            InputType::Text => std::fs::read_to_string(input_file).map_err(|source| {
                let e = ExtractionError::Open {
                    path: input_file.to_path_buf(),
                    source,
                };
                error!("Text extraction failed: {}", e);
                AppError::from(e)
            }),
            InputType::Unknown => Err(AppError::File(format!(
                "Unsupported input file (expected PDF or text): {:?}",
                input_file
            ))),
        }
    }

    /// Parse a file into its mapping; the title defaults to the file name
    pub fn parse_file(&self, input_file: &Path, title: Option<&str>) -> Result<Value, AppError> {
        let script = self.load_script(input_file)?;
        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| FileManager::title_from_path(input_file));

        let mapping = pipeline::parse_screenplay_with(&self.detector, &self.registry, &script, &title)?;
        Ok(mapping)
    }

    /// Where the result for `input_file` is written when no path is given
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        let output_dir = self
            .config
            .output
            .directory
            .clone()
            .unwrap_or_else(|| input_file.parent().unwrap_or(Path::new(".")).to_path_buf());
        FileManager::generate_output_path(input_file, output_dir, "json")
    }

    /// Parse one file and write its result.
    ///
    /// Returns the written path, or `None` when the result already exists and
    /// overwriting is disabled.
    pub fn run(
        &self,
        input_file: &Path,
        output_path: Option<PathBuf>,
        title: Option<&str>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>, AppError> {
        if !input_file.exists() {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let output_path = output_path.unwrap_or_else(|| self.default_output_path(input_file));
        let force_overwrite = force_overwrite || self.config.output.force_overwrite;
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, result already exists (use -f to force overwrite)", input_file);
            return Ok(None);
        }

        let start_time = std::time::Instant::now();
        let mapping = self.parse_file(input_file, title)?;
        persistence::screenplay_to_json(&mapping, &output_path)?;

        info!(
            "Parsed {:?} in {}: {} scenes, {} characters -> {:?}",
            input_file,
            Self::format_duration(start_time.elapsed()),
            mapping["statistics"]["total_scenes"],
            mapping["statistics"]["total_characters"],
            output_path
        );
        Ok(Some(output_path))
    }

    /// Parse every screenplay below `input_dir`; failures are logged and counted
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary, AppError> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let inputs = FileManager::find_screenplays(input_dir)?;
        info!("Found {} screenplay file(s) in {:?}", inputs.len(), input_dir);

        let folder_pb = ProgressBar::new(inputs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Parsing files");

        let mut summary = FolderSummary::default();
        for input in &inputs {
            match self.run(input, None, None, force_overwrite) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing {:?}: {}", input, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }
        folder_pb.finish_and_clear();

        info!(
            "Finished: {} parsed, {} skipped, {} failed",
            summary.processed, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// Format a duration as `1m 2.3s` or `2.3s`
    pub fn format_duration(duration: std::time::Duration) -> String {
        let secs = duration.as_secs_f64();
        if secs >= 60.0 {
            format!("{}m {:.1}s", (secs / 60.0).floor() as u64, secs % 60.0)
        } else {
            format!("{:.1}s", secs)
        }
    }
}
