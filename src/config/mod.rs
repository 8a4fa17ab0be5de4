pub mod toml_config;

pub use toml_config::EngineConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "relief-alloc")]
#[command(about = "Allocate emergency-response resources to active disaster zones")]
pub struct CliConfig {
    /// JSON snapshot with `resources` and `zones` arrays
    #[arg(long, short, default_value = "snapshot.json")]
    pub snapshot: String,

    /// Optional TOML engine configuration
    #[arg(long, short)]
    pub config: Option<String>,

    /// Write the plan JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,

    /// Mark allocated resources Deployed and their zones Processing in the snapshot
    #[arg(long)]
    pub dispatch: bool,

    /// Skip the external rationale call
    #[arg(long)]
    pub no_rationale: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("snapshot", &self.snapshot)?;
        validation::validate_file_extension("snapshot", &self.snapshot, &["json"])?;

        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
            validation::validate_file_extension("config", config, &["toml"])?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }

        Ok(())
    }
}
