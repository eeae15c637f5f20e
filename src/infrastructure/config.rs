use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub stream: StreamSettings,
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamSettings {
    /// Real time between simulator ticks.
    pub interval_ms: u64,
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Simulator,
    Radio,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub kind: SourceKind,
    /// `host:port` of the serial-to-TCP bridge carrying raw radio lines.
    pub radio_address: Option<String>,
}

impl AppConfig {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("stream.interval_ms", 500)?
        .set_default("stream.channel_capacity", 100)?
        .set_default("source.kind", "simulator")?)
}

/// Load `config/telemetry.*` if present, then `ROCKET__SECTION__KEY` overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/telemetry").required(false))
        .add_source(config::Environment::with_prefix("ROCKET").separator("__"))
        .build()?;

    validate(settings.try_deserialize()?)
}

fn validate(config: AppConfig) -> anyhow::Result<AppConfig> {
    if config.source.kind == SourceKind::Radio && config.source.radio_address.is_none() {
        anyhow::bail!("source.radio_address is required when source.kind = \"radio\"");
    }
    if config.stream.interval_ms == 0 {
        anyhow::bail!("stream.interval_ms must be greater than zero");
    }
    Ok(config)
}
