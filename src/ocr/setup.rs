use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Trained data needed for song titles and quantities.
pub const REQUIRED_LANGUAGES: [&str; 2] = ["jpn", "eng"];

const COMMON_EXECUTABLES: [&str; 5] = [
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

const COMMON_TESSDATA: [&str; 6] = [
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/opt/homebrew/share/tessdata",
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];

pub struct TesseractPaths {
    pub executable: PathBuf,
    pub tessdata: PathBuf,
}

/// Returns the directory for storing Tesseract files
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drop-tally")
        .join("tesseract")
}

fn executable_name() -> &'static str {
    if cfg!(windows) { "tesseract.exe" } else { "tesseract" }
}

/// Ensures Tesseract and the required trained data are available.
///
/// The executable must already be installed. Missing trained data is downloaded
/// into the local tessdata directory, seeded from a system installation when present.
pub fn ensure_tesseract() -> Result<TesseractPaths> {
    let executable = find_tesseract_executable()?;

    if let Ok(tessdata) = find_tessdata_dir() {
        info!("Tesseract found at: {} (tessdata {})", executable.display(), tessdata.display());
        return Ok(TesseractPaths {
            executable,
            tessdata,
        });
    }

    let tessdata = get_tesseract_dir().join("tessdata");
    fs::create_dir_all(&tessdata).context("Failed to create tessdata directory")?;

    for lang in REQUIRED_LANGUAGES {
        let target = tessdata.join(format!("{}.traineddata", lang));
        if target.exists() {
            continue;
        }
        if let Some(system_copy) = find_system_traineddata(lang) {
            info!("Copying {}.traineddata from: {}", lang, system_copy.display());
            fs::copy(&system_copy, &target)?;
        } else {
            download_traineddata(lang, &target)?;
        }
    }

    info!("Tesseract ready, tessdata at: {}", tessdata.display());

    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

fn find_system_traineddata(lang: &str) -> Option<PathBuf> {
    COMMON_TESSDATA
        .iter()
        .map(|dir| Path::new(dir).join(format!("{}.traineddata", lang)))
        .find(|path| path.exists())
}

/// Downloads one language's trained data from the tessdata repository
fn download_traineddata(lang: &str, target: &Path) -> Result<()> {
    let url = format!("{}/{}.traineddata", TESSDATA_REPO, lang);
    info!("Downloading {}...", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(&url)
        .header("User-Agent", "drop-tally")
        .send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}.traineddata: HTTP {}",
            lang,
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(target)?;
    file.write_all(&bytes)?;

    info!("Downloaded {}.traineddata ({} bytes)", lang, bytes.len());

    Ok(())
}

/// Finds the Tesseract executable, checking our local dir first, then PATH and common paths
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let local_exe = get_tesseract_dir().join(executable_name());
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // Check PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    COMMON_EXECUTABLES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Tesseract not found. Please install Tesseract-OCR."))
}

/// Finds a tessdata directory that holds every required language
pub fn find_tessdata_dir() -> Result<PathBuf> {
    let mut candidates = vec![get_tesseract_dir().join("tessdata")];

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        candidates.push(prefix.join("tessdata"));
        candidates.push(prefix);
    }
    candidates.extend(COMMON_TESSDATA.iter().map(PathBuf::from));

    candidates
        .into_iter()
        .find(|dir| has_required_languages(dir))
        .ok_or_else(|| {
            anyhow!(
                "tessdata directory not found. Please ensure {} trained data is available.",
                REQUIRED_LANGUAGES.join(" and ")
            )
        })
}

fn has_required_languages(dir: &Path) -> bool {
    REQUIRED_LANGUAGES
        .iter()
        .all(|lang| dir.join(format!("{}.traineddata", lang)).exists())
}
