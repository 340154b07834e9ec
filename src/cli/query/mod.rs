//! Query command - processes one query and prints the result

use clap::Args;

use crate::config::AppConfig;
use crate::domain::orchestrator::OrchestratorConfigOverrides;
use crate::infrastructure::logging::init_cli_logging;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text
    pub text: String,

    /// Force a strategy (fast, balanced, comprehensive)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Skip the semantic cache
    #[arg(long)]
    pub no_cache: bool,

    /// Per-query cost ceiling
    #[arg(long)]
    pub max_cost: Option<f64>,
}

impl QueryArgs {
    pub fn overrides(&self) -> OrchestratorConfigOverrides {
        OrchestratorConfigOverrides {
            use_cache: self.no_cache.then_some(false),
            strategy_override: self.strategy.clone(),
            max_cost_per_query: self.max_cost,
            ..OrchestratorConfigOverrides::default()
        }
    }
}

pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_cli_logging(&config.logging);

    let overrides = args.overrides();
    overrides.validate()?;

    let state = crate::build_app_state(&config).await?;
    let result = state.orchestrator.process(&args.text, &overrides).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_from_args() {
        let args = QueryArgs {
            text: "refund".to_string(),
            strategy: Some("balanced".to_string()),
            no_cache: true,
            max_cost: None,
        };

        let overrides = args.overrides();
        assert_eq!(overrides.use_cache, Some(false));
        assert_eq!(overrides.strategy_override.as_deref(), Some("balanced"));
        assert_eq!(overrides.max_cost_per_query, None);
    }

    #[test]
    fn test_cache_left_to_config_by_default() {
        let args = QueryArgs {
            text: "refund".to_string(),
            strategy: None,
            no_cache: false,
            max_cost: Some(0.01),
        };

        let overrides = args.overrides();
        assert_eq!(overrides.use_cache, None);
        assert_eq!(overrides.max_cost_per_query, Some(0.01));
    }
}
