//! File logging. The terminal belongs to the UI, so records go to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target, WriteStyle};

use crate::config::LoggingSettings;
use crate::error::Result;

/// Environment variable that overrides `logging.level`, in `RUST_LOG` syntax.
pub const LOG_ENV: &str = "ALLEGRO_LOG";

pub fn log_file_path(settings: &LoggingSettings, data_dir: &Path) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| data_dir.join("allegro.log"))
}

/// Install the global logger. Returns the file records are appended to.
pub fn init(settings: &LoggingSettings, data_dir: &Path) -> Result<PathBuf> {
    let path = log_file_path(settings, data_dir);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::new()
        .parse_filters(&settings.level)
        .parse_env(Env::new().filter(LOG_ENV))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format_timestamp_millis()
        .try_init()?;

    Ok(path)
}

/// Like [`init`], but a logger that cannot be set up only costs the log
/// file: the failure goes to stderr and startup carries on unlogged.
pub fn init_or_warn(settings: &LoggingSettings, data_dir: &Path) -> Option<PathBuf> {
    match init(settings, data_dir) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!(
                "allegro: logging disabled, could not open {}: {e}",
                log_file_path(settings, data_dir).display()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_defaults_to_data_dir() {
        let settings = LoggingSettings::default();
        assert_eq!(
            log_file_path(&settings, Path::new("/data/allegro")),
            Path::new("/data/allegro/allegro.log")
        );

        let settings = LoggingSettings {
            file: Some("/tmp/custom.log".into()),
            ..LoggingSettings::default()
        };
        assert_eq!(
            log_file_path(&settings, Path::new("/data/allegro")),
            Path::new("/tmp/custom.log")
        );
    }

    #[test]
    fn unwritable_log_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the log directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let settings = LoggingSettings {
            file: Some(blocker.join("allegro.log")),
            ..LoggingSettings::default()
        };
        assert!(init(&settings, dir.path()).is_err());
        assert_eq!(init_or_warn(&settings, dir.path()), None);
    }
}
