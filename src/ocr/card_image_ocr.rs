use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use image::ImageFormat;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::text_parser::parse_card_text;
use crate::{
    cards::ocr_card_data::OcrCardData, errors::ScrapeError,
    utilities::constants::MAX_UPLOAD_BYTES,
};

/// Turns an image file into plain text.
pub trait OcrEngine {
    fn extract_text(&self, image_path: &Path) -> Result<String, ScrapeError>;
}

/// Runs the `tesseract` command line tool.
pub struct TesseractEngine {
    binary: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        TesseractEngine {
            binary: "tesseract".to_string(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&self, image_path: &Path) -> Result<String, ScrapeError> {
        // tesseract appends .txt to the output base itself
        let output_base = image_path.with_file_name("ocr_output");
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg(&output_base)
            .output()
            .map_err(|e| ScrapeError::OcrFailure(format!("could not run {}: {}", self.binary, e)))?;

        let text_file = output_base.with_extension("txt");
        let text = fs::read_to_string(&text_file).map_err(|_| {
            ScrapeError::OcrFailure(format!(
                "no output generated: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        })?;
        let _ = fs::remove_file(&text_file);
        Ok(text)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    pub data: OcrCardData,
    pub raw_text: String,
}

/// Validates an uploaded card photo, runs OCR on a scratch copy and parses the text.
pub struct CardImageOcr<E: OcrEngine> {
    engine: E,
    upload_dir: PathBuf,
}

impl<E: OcrEngine> CardImageOcr<E> {
    pub fn new(engine: E, upload_dir: &Path) -> Self {
        CardImageOcr {
            engine,
            upload_dir: upload_dir.to_path_buf(),
        }
    }

    pub fn process_image(&self, image_path: &Path) -> Result<OcrResult, ScrapeError> {
        info!("Running OCR on {}", image_path.display());
        let format = Self::validate_image(image_path)?;

        fs::create_dir_all(&self.upload_dir)?;
        // Removed again when `scratch` is dropped, whatever the outcome
        let scratch = tempfile::Builder::new()
            .prefix("card_")
            .tempdir_in(&self.upload_dir)?;
        let file_name = image_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| format!("upload.{}", format.extensions_str()[0]).into());
        let scratch_image = scratch.path().join(file_name);
        fs::copy(image_path, &scratch_image)?;

        let raw_text = self.engine.extract_text(&scratch_image)?;
        debug!("OCR text for {}: {:?}", image_path.display(), raw_text);

        Ok(OcrResult {
            data: parse_card_text(&raw_text),
            raw_text,
        })
    }

    /// Accepts JPEG, PNG, GIF and WebP files up to 10 MiB.
    fn validate_image(image_path: &Path) -> Result<ImageFormat, ScrapeError> {
        let metadata = fs::metadata(image_path)
            .map_err(|_| ScrapeError::InvalidImage(format!("{} not found", image_path.display())))?;
        if !metadata.is_file() {
            return Err(ScrapeError::InvalidImage(format!(
                "{} is not a file",
                image_path.display()
            )));
        }
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(ScrapeError::InvalidImage("File size exceeds 10MB".to_string()));
        }

        let bytes = fs::read(image_path)?;
        match image::guess_format(&bytes) {
            Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP)) => {
                Ok(format)
            }
            other => {
                warn!("Rejected upload {} ({:?})", image_path.display(), other);
                Err(ScrapeError::InvalidImage(
                    "Invalid file type. Only JPG, PNG, GIF, and WebP are allowed".to_string(),
                ))
            }
        }
    }
}
