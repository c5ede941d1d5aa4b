use sqlx::PgPool;
use zb_srs::MasteryPolicy;

use crate::{ApiConfig, analysis::WeaknessAnalyzer};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub mastery_policy: MasteryPolicy,
    pub analyzer: WeaknessAnalyzer,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let analyzer = WeaknessAnalyzer::from_config(config.llm_config())?;
        if !analyzer.uses_llm() {
            tracing::warn!("LLM_API_KEY not set, weakness analysis will use canned advice");
        }

        tracing::info!(policy = %config.mastery_policy, "Mastery policy selected");

        Ok(Self {
            pool,
            mastery_policy: config.mastery_policy,
            analyzer,
        })
    }
}
