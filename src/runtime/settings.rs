use crate::config;
use crate::error::Error;

/// Load settings, falling back to defaults. The logger is not installed yet
/// at this point, so a fallback reason is returned for the caller to log.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("{}, using defaults", Error::InvalidConfig(msg))),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("{}, using defaults", Error::from(e))),
        ),
    }
}
