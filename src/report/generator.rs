//! Report generator implementation
//! Author: kartik4091
//! Created: 2025-06-05

use tokio::fs as async_fs;
use tracing::info;

use super::{ReportConfig, ReportFormatter, RunSummary};
use crate::error::Result;

/// Writes run summaries to disk
pub struct ReportGenerator;

impl ReportGenerator {
    pub async fn generate(data: &RunSummary, config: &ReportConfig) -> Result<()> {
        let content = ReportFormatter::format(data, config.format)?;
        async_fs::write(&config.output_path, content).await?;
        info!("Report written to {}", config.output_path.display());
        Ok(())
    }
}
