use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Operational knobs for one invocation — distinct from `ResolvedSettings`,
/// which is business data parsed per run from `M_settings_YYYYMM.csv`.
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    pub solver: SolverSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    pub max_time_in_seconds: u64,
    pub single_group_max_time_in_seconds: u64,
    pub num_search_workers: u32,
    pub partial_output_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSettings {
    pub directory: String,
}

impl RunConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            solver: SolverSettings {
                max_time_in_seconds: 60,
                single_group_max_time_in_seconds: 120,
                num_search_workers: 4,
                partial_output_enabled: true,
            },
            output: OutputSettings {
                directory: "output".to_string(),
            },
        }
    }
}
