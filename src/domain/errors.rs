// Dashboard error taxonomy
use super::chart::ChartSlot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Bad user input: missing employee or inverted date range. No call is issued.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A refresh is already in progress")]
    RefreshInProgress,

    #[error("Transport error: {0:#}")]
    Transport(anyhow::Error),

    #[error("Charting capability unavailable after {checks} checks")]
    RenderDependencyUnavailable { checks: u32 },

    #[error("Failed to render {slot} chart: {source:#}")]
    ChartRender {
        slot: ChartSlot,
        source: anyhow::Error,
    },

    #[error("Repository error: {0:#}")]
    Repository(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
