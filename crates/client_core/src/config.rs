use std::{collections::HashMap, fs, path::Path, time::Duration};

use url::Url;

pub const SETTINGS_FILE: &str = "tube.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub progress_step_delay: Duration,
    pub demo_display_name: String,
    pub demo_avatar_url: String,
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            progress_step_delay: Duration::from_millis(200),
            demo_display_name: "Demo User".into(),
            demo_avatar_url: "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde"
                .into(),
            event_capacity: 1024,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)?;
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, &raw);
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!("config: ignoring malformed {SETTINGS_FILE}");
        return;
    };

    if let Some(ms) = file_cfg
        .get("progress_step_delay_ms")
        .and_then(toml::Value::as_integer)
    {
        if let Ok(ms) = u64::try_from(ms) {
            settings.progress_step_delay = Duration::from_millis(ms);
        }
    }
    if let Some(v) = file_cfg.get("demo_display_name").and_then(toml::Value::as_str) {
        settings.demo_display_name = v.to_string();
    }
    if let Some(v) = file_cfg.get("demo_avatar_url").and_then(toml::Value::as_str) {
        set_avatar_url(settings, v);
    }
    if let Some(v) = file_cfg.get("event_capacity").and_then(toml::Value::as_integer) {
        set_event_capacity(settings, v);
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__PROGRESS_STEP_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.progress_step_delay = Duration::from_millis(parsed);
        }
    }
    if let Some(v) = var("APP__DEMO_DISPLAY_NAME") {
        settings.demo_display_name = v;
    }
    if let Some(v) = var("APP__DEMO_AVATAR_URL") {
        set_avatar_url(settings, &v);
    }
    if let Some(v) = var("APP__EVENT_CAPACITY") {
        if let Ok(parsed) = v.parse::<i64>() {
            set_event_capacity(settings, parsed);
        }
    }
}

fn set_avatar_url(settings: &mut Settings, raw: &str) {
    match Url::parse(raw.trim()) {
        Ok(url) => settings.demo_avatar_url = url.into(),
        Err(err) => tracing::warn!(value = raw, %err, "config: keeping default avatar url"),
    }
}

// broadcast::channel panics on zero capacity
fn set_event_capacity(settings: &mut Settings, raw: i64) {
    if let Ok(capacity) = usize::try_from(raw) {
        if capacity > 0 {
            settings.event_capacity = capacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_replace_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            r#"
progress_step_delay_ms = 5
demo_display_name = "Tester"
event_capacity = 16
"#,
        );
        assert_eq!(settings.progress_step_delay, Duration::from_millis(5));
        assert_eq!(settings.demo_display_name, "Tester");
        assert_eq!(settings.event_capacity, 16);
    }

    #[test]
    fn env_overrides_win_and_bad_values_are_ignored() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = [
            ("APP__PROGRESS_STEP_DELAY_MS", "not-a-number"),
            ("APP__DEMO_AVATAR_URL", "not a url"),
            ("APP__EVENT_CAPACITY", "0"),
            ("APP__DEMO_DISPLAY_NAME", "From Env"),
        ]
        .into_iter()
        .collect();

        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        let defaults = Settings::default();
        assert_eq!(settings.progress_step_delay, defaults.progress_step_delay);
        assert_eq!(settings.demo_avatar_url, defaults.demo_avatar_url);
        assert_eq!(settings.event_capacity, defaults.event_capacity);
        assert_eq!(settings.demo_display_name, "From Env");
    }

    #[test]
    fn avatar_url_is_normalized() {
        let mut settings = Settings::default();
        set_avatar_url(&mut settings, "https://example.com");
        assert_eq!(settings.demo_avatar_url, "https://example.com/");
    }
}
