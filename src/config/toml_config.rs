use crate::adapters::groq::{GroqClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::core::compatibility::{CompatibilityMatcher, CompatibilityTable};
use crate::core::engine::AllocationEngine;
use crate::core::rationale::RationaleGenerator;
use crate::core::scoring::{Scorer, ScoringWeights};
use crate::domain::ports::RationaleProvider;
use crate::utils::error::{AllocError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 引擎設定檔。所有區段皆可省略。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub rationale: RationaleConfig,
    pub compatibility: CompatibilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RationaleConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_tokens: u32,
}

impl Default for RationaleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_seconds: 15,
            max_tokens: 300,
        }
    }
}

impl RationaleConfig {
    /// 空字串或未被替換的 `${VAR}` 都視為沒有金鑰
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() || (key.starts_with("${") && key.ends_with('}')) {
            None
        } else {
            Some(key)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    pub extra: Vec<CompatibilityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub disaster: String,
    pub resources: Vec<String>,
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AllocError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AllocError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GROQ_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AllocError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn compatibility_table(&self) -> CompatibilityTable {
        self.compatibility
            .extra
            .iter()
            .fold(CompatibilityTable::default(), |table, entry| {
                table.with_entry(&entry.disaster, entry.resources.as_slice())
            })
    }

    pub fn rationale_generator(&self) -> Result<RationaleGenerator> {
        let timeout = self.rationale.timeout();

        if !self.rationale.enabled {
            tracing::info!("Rationale generation disabled by configuration");
            return Ok(RationaleGenerator::new(None, timeout));
        }

        let Some(api_key) = self.rationale.api_key() else {
            tracing::info!("No rationale API key configured, plans will carry the static rationale");
            return Ok(RationaleGenerator::new(None, timeout));
        };

        let client = GroqClient::new(
            self.rationale.endpoint.clone(),
            api_key,
            self.rationale.model.clone(),
            self.rationale.max_tokens,
            timeout,
        )?;
        let provider: Arc<dyn RationaleProvider> = Arc::new(client);
        Ok(RationaleGenerator::new(Some(provider), timeout))
    }

    pub fn build_engine(&self) -> Result<AllocationEngine> {
        let matcher = CompatibilityMatcher::new(self.compatibility_table());
        let scorer = Scorer::new(self.scoring);
        Ok(AllocationEngine::new(matcher, scorer).with_rationale(self.rationale_generator()?))
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let s = &self.scoring;
        validation::validate_weight("scoring.w_severity", s.w_severity)?;
        validation::validate_weight("scoring.w_urgency", s.w_urgency)?;
        validation::validate_weight("scoring.w_proximity", s.w_proximity)?;
        validation::validate_weight("scoring.medical_bonus", s.medical_bonus)?;
        validation::validate_range(
            "scoring.medical_vulnerability_threshold",
            s.medical_vulnerability_threshold,
            0.0,
            1.0,
        )?;

        if self.rationale.enabled {
            validation::validate_url("rationale.endpoint", &self.rationale.endpoint)?;
            validation::validate_non_empty_string("rationale.model", &self.rationale.model)?;
            validation::validate_positive_number(
                "rationale.timeout_seconds",
                self.rationale.timeout_seconds,
                1,
            )?;
            validation::validate_positive_number(
                "rationale.max_tokens",
                u64::from(self.rationale.max_tokens),
                1,
            )?;
        }

        for entry in &self.compatibility.extra {
            validation::validate_non_empty_string("compatibility.extra.disaster", &entry.disaster)?;
            if entry.resources.is_empty() {
                return Err(AllocError::InvalidConfigValueError {
                    field: "compatibility.extra.resources".to_string(),
                    value: entry.disaster.clone(),
                    reason: "At least one resource type is required".to_string(),
                });
            }
            for resource in &entry.resources {
                validation::validate_non_empty_string("compatibility.extra.resources", resource)?;
            }
        }

        Ok(())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
