//! TOML rendering of the config file template

use super::Config;

impl Config {
    /// Render as a commented config file. Parses back into the same values.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# heroes configuration (version {version})

# Backend base URL; heroes are served from {{api_url}}/heroes
# Override with HEROES_API_URL
api_url = "{api_url}"

# Bind address for `heroes serve` (the in-memory demo backend)
# Override with HEROES_BIND
bind_addr = "{bind}"

# How long each notification stays active, in milliseconds
[notifications]
success_ms = {success_ms}
info_ms = {info_ms}
warn_ms = {warn_ms}
error_ms = {error_ms}

# Logging configuration (RUST_LOG overrides, then HEROES_LOG_LEVEL)
[logging]
level = "{log_level}"
# JSON file logging in addition to stderr
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            version = super::VERSION,
            api_url = self.api_url,
            bind = self.bind_addr,
            success_ms = self.notifications.success_ms,
            info_ms = self.notifications.info_ms,
            warn_ms = self.notifications.warn_ms,
            error_ms = self.notifications.error_ms,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
