use anyhow::{anyhow, Result};
use image::GrayImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::OcrConfig;

/// Language, page segmentation and character set for one recognition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrRequest<'a> {
    pub language: &'a str,
    pub psm: u8,
    pub whitelist: Option<&'a str>,
}

impl<'a> OcrRequest<'a> {
    /// Free-form song title text.
    pub fn song_title(config: &'a OcrConfig) -> Self {
        Self {
            language: &config.song_language,
            psm: config.song_psm,
            whitelist: None,
        }
    }

    /// A single line of digits with an optional multiplier sign.
    pub fn quantity(config: &'a OcrConfig) -> Self {
        Self {
            language: &config.quantity_language,
            psm: config.quantity_psm,
            whitelist: Some(&config.quantity_whitelist),
        }
    }
}

/// Optical character recognition over a greyscale region.
pub trait TextRecognizer {
    fn recognize(&self, img: &GrayImage, request: &OcrRequest<'_>) -> Result<String>;
}

/// Runs the Tesseract command line tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
}

impl TesseractRecognizer {
    pub fn new(executable: PathBuf, tessdata: Option<PathBuf>) -> Self {
        Self {
            executable,
            tessdata,
        }
    }

    /// Uses the first Tesseract installation found on this machine.
    ///
    /// Without a known tessdata directory Tesseract falls back to its own default.
    pub fn locate() -> Result<Self> {
        let executable = find_tesseract_executable()?;
        let tessdata = find_tessdata_dir().ok();
        Ok(Self::new(executable, tessdata))
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, img: &GrayImage, request: &OcrRequest<'_>) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let output = Command::new(&self.executable)
            .args(build_args(temp_input.path(), request, self.tessdata.as_deref()))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Command line for one recognition call, writing the text to stdout.
fn build_args(input: &Path, request: &OcrRequest<'_>, tessdata: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.into(), "stdout".into()];

    if let Some(dir) = tessdata {
        args.push("--tessdata-dir".into());
        args.push(dir.into());
    }

    args.push("-l".into());
    args.push(request.language.into());
    args.push("--psm".into());
    args.push(request.psm.to_string().into());

    if let Some(whitelist) = request.whitelist {
        args.push("-c".into());
        args.push(format!("tessedit_char_whitelist={}", whitelist).into());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_args() {
        let config = OcrConfig::default();
        let args = build_args(
            Path::new("/tmp/q.png"),
            &OcrRequest::quantity(&config),
            Some(Path::new("/data/tessdata")),
        );

        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            vec![
                "/tmp/q.png",
                "stdout",
                "--tessdata-dir",
                "/data/tessdata",
                "-l",
                "eng",
                "--psm",
                "7",
                "-c",
                "tessedit_char_whitelist=x0123456789",
            ]
        );
    }

    #[test]
    fn test_song_args_without_tessdata() {
        let config = OcrConfig::default();
        let args = build_args(Path::new("s.png"), &OcrRequest::song_title(&config), None);

        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["s.png", "stdout", "-l", "jpn", "--psm", "6"]);
    }
}
