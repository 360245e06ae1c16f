//! Configuration module
//!
//! Everything is read once from the environment at process start; there is
//! no hot-reload. Credential resolution follows a fixed precedence:
//! explicit file path, then inline JSON env value, then a local fallback
//! file. Missing all three is startup-fatal.

use std::env;
use std::path::Path;

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_ROOT_FOLDER: &str = "공사사진";
const DEFAULT_SHEET_NAME: &str = "Sheet1";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_FILE_SIZE_MB: usize = 25;
const FALLBACK_CREDENTIAL_FILE: &str = "service-account.json";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Team shared-drive id. Absent means personal-drive mode.
    pub shared_drive_id: Option<String>,
    /// Top-level folder every upload lands under.
    pub root_folder_name: String,
    /// Raw service-account JSON (parsed by the drive crate).
    pub service_account_json: String,
    /// Target spreadsheet for metadata rows; absent disables the recorder.
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    /// Local spool directory for in-flight multipart files.
    pub upload_dir: String,
    pub max_file_size_bytes: usize,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = parse_env_number("PORT", env::var("PORT").ok(), DEFAULT_PORT)?;
        let max_file_size_mb = parse_env_number(
            "MAX_FILE_SIZE_MB",
            env::var("MAX_FILE_SIZE_MB").ok(),
            DEFAULT_MAX_FILE_SIZE_MB,
        )?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port,
            shared_drive_id: env::var("GOOGLE_SHARED_DRIVE_ID")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            root_folder_name: env::var("DRIVE_ROOT_FOLDER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROOT_FOLDER.to_string()),
            service_account_json: resolve_service_account_json()?,
            spreadsheet_id: env::var("GOOGLE_SPREADSHEET_ID")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            sheet_name: env::var("GOOGLE_SHEET_NAME")
                .unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            cors_origins,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.service_account_json.trim().is_empty() {
            return Err(anyhow::anyhow!("Service account credentials are empty"));
        }
        if self.root_folder_name.trim().is_empty() {
            return Err(anyhow::anyhow!("DRIVE_ROOT_FOLDER must not be blank"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        Ok(())
    }
}

/// Parse an optional numeric env value. A set-but-invalid value is a
/// startup error; absence (or blank) means the default.
fn parse_env_number<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

/// Resolve the service-account JSON. Precedence: GOOGLE_SERVICE_ACCOUNT_FILE
/// path, then GOOGLE_SERVICE_ACCOUNT_JSON inline value, then a local
/// `service-account.json` next to the binary.
fn resolve_service_account_json() -> Result<String, anyhow::Error> {
    select_service_account_json(
        env::var("GOOGLE_SERVICE_ACCOUNT_FILE").ok(),
        env::var("GOOGLE_SERVICE_ACCOUNT_JSON").ok(),
        Path::new(FALLBACK_CREDENTIAL_FILE),
    )
}

/// Pick the credential source. A configured file path only wins when the
/// file actually exists; a set-but-absent path falls through to the inline
/// value instead of failing startup, so both may be set at once.
fn select_service_account_json(
    file_path: Option<String>,
    inline_json: Option<String>,
    fallback: &Path,
) -> Result<String, anyhow::Error> {
    if let Some(path) = file_path.filter(|p| !p.trim().is_empty()) {
        if Path::new(&path).exists() {
            return std::fs::read_to_string(&path).map_err(|e| {
                anyhow::anyhow!("Failed to read GOOGLE_SERVICE_ACCOUNT_FILE {}: {}", path, e)
            });
        }
    }

    if let Some(raw) = inline_json {
        if !raw.trim().is_empty() {
            return Ok(raw);
        }
    }

    if fallback.exists() {
        return std::fs::read_to_string(fallback)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", fallback.display(), e));
    }

    Err(anyhow::anyhow!(
        "Missing GOOGLE_SERVICE_ACCOUNT_FILE or GOOGLE_SERVICE_ACCOUNT_JSON"
    ))
}
