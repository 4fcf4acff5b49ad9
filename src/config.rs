//! Configuration file support
//!
//! Loads settings from ~/.natter.conf (or %USERPROFILE%\.natter.conf on
//! Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # natter configuration
//! width = 72
//! separators = true
//! debug-log = false
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Preview width in columns (0 = use the terminal width)
    pub width: i32,
    /// Whether to draw day separators between messages
    pub separators: bool,
    /// Whether to write a debug log under ~/.natter/
    pub debug_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 0,
            separators: true,
            debug_log: false,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".natter.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".natter.conf"))
        }
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                let settings = Self::parse(&contents);
                config.apply(&settings);
            }
        }

        config
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse key = value
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("width") {
            if let Ok(n) = value.parse::<i32>() {
                self.width = n.max(0);
            }
        }

        if let Some(value) = settings.get("separators") {
            self.separators = parse_bool(value);
        }

        if let Some(value) = settings.get("debug-log") {
            self.debug_log = parse_bool(value);
        }
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}
