use crate::application::renderer::RendererSettings;
use crate::domain::query::DateRangeMode;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub records: RecordsSettings,
    pub client: ClientSettings,
    pub dashboard: DashboardSettings,
    pub renderer: RendererConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecordsSettings {
    pub path: String,
}

impl Default for RecordsSettings {
    fn default() -> Self {
        Self {
            path: "data/performance_records.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardSettings {
    pub date_range_mode: DateRangeMode,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RendererConfig {
    pub max_checks: u32,
    pub retry_delay_ms: u64,
    /// Unset disables the axis tick cleanup
    pub tick_cleanup_delay_ms: Option<u64>,
    /// Checks the terminal chart backend fails before reporting ready
    pub warmup_checks: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let settings = RendererSettings::default();
        Self {
            max_checks: settings.max_checks,
            retry_delay_ms: settings.retry_delay.as_millis() as u64,
            tick_cleanup_delay_ms: settings.tick_cleanup_delay.map(|d| d.as_millis() as u64),
            warmup_checks: 0,
        }
    }
}

impl RendererConfig {
    pub fn to_settings(&self) -> RendererSettings {
        RendererSettings {
            max_checks: self.max_checks.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            tick_cleanup_delay: self.tick_cleanup_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Load `config/dashboard.toml` (optional) with `EPD__SECTION__KEY` overrides.
pub fn load_config() -> anyhow::Result<AppConfig> {
    settings_from(config::File::with_name("config/dashboard").required(false))
}

fn settings_from<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix("EPD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
