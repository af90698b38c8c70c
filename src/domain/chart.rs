// Chart domain models: series, slots and their fixed visual configuration
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_DATA_LABEL: &str = "No Data";
pub const DONUT_PLACEHOLDER_COLOR: &str = "#e2e8f0";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Empty, all-zero or malformed (label/value length mismatch) series carry
    /// nothing worth drawing.
    pub fn is_degenerate(&self) -> bool {
        self.labels.is_empty() || self.labels.len() != self.values.len() || self.total() == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    MainDistribution,
    LeadsPulse,
    AttendanceDonut,
}

impl ChartSlot {
    /// Fixed render order within a cycle.
    pub const ALL: [ChartSlot; 3] = [
        ChartSlot::MainDistribution,
        ChartSlot::LeadsPulse,
        ChartSlot::AttendanceDonut,
    ];

    pub fn mount_point(&self) -> &'static str {
        match self {
            ChartSlot::MainDistribution => "main-distribution-chart",
            ChartSlot::LeadsPulse => "leads-pulse-chart",
            ChartSlot::AttendanceDonut => "attendance-donut-chart",
        }
    }

    pub fn spec(&self) -> ChartSpec {
        match self {
            ChartSlot::MainDistribution => ChartSpec {
                kind: ChartKind::Bar,
                height: 350,
                colors: vec!["#3b82f6".to_string()],
                dataset_name: Some("Activity".to_string()),
                options: ChartOptions::Bar {
                    space_ratio: 0.2,
                    x_is_series: true,
                },
            },
            ChartSlot::LeadsPulse => ChartSpec {
                kind: ChartKind::Line,
                height: 200,
                colors: vec!["#a855f7".to_string()],
                dataset_name: Some("Leads".to_string()),
                options: ChartOptions::Line {
                    region_fill: true,
                    hide_dots: true,
                },
            },
            ChartSlot::AttendanceDonut => ChartSpec {
                kind: ChartKind::Donut,
                height: 280,
                colors: vec![
                    "#22c55e".to_string(),
                    "#ef4444".to_string(),
                    "#f59e0b".to_string(),
                ],
                dataset_name: None,
                options: ChartOptions::Donut { stroke_width: 40 },
            },
        }
    }

    /// Placeholder drawn when the slot's series is degenerate. A donut cannot
    /// draw a zero-sum ring, so its placeholder carries a single unit value.
    pub fn placeholder(&self) -> ChartSeries {
        let value = match self.spec().kind {
            ChartKind::Donut => 1.0,
            ChartKind::Bar | ChartKind::Line => 0.0,
        };
        ChartSeries::new(vec![NO_DATA_LABEL.to_string()], vec![value])
    }

    pub fn placeholder_colors(&self) -> Option<Vec<String>> {
        match self.spec().kind {
            ChartKind::Donut => Some(vec![DONUT_PLACEHOLDER_COLOR.to_string()]),
            ChartKind::Bar | ChartKind::Line => None,
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartSlot::MainDistribution => "main distribution",
            ChartSlot::LeadsPulse => "leads pulse",
            ChartSlot::AttendanceDonut => "attendance donut",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Donut,
}

impl ChartKind {
    /// Bar and line charts plot integer counts on a numeric axis.
    pub fn has_count_axis(&self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::Line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOptions {
    Bar { space_ratio: f64, x_is_series: bool },
    Line { region_fill: bool, hide_dots: bool },
    Donut { stroke_width: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub height: u32,
    pub colors: Vec<String>,
    pub dataset_name: Option<String>,
    pub options: ChartOptions,
}

/// Chart-ready data for one slot after the empty-data policy has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedChart {
    pub slot: ChartSlot,
    pub series: ChartSeries,
    pub color_override: Option<Vec<String>>,
    pub is_placeholder: bool,
}

impl ShapedChart {
    pub fn from_series(slot: ChartSlot, series: Option<&ChartSeries>) -> Self {
        match series {
            Some(series) if !series.is_degenerate() => Self {
                slot,
                series: series.clone(),
                color_override: None,
                is_placeholder: false,
            },
            _ => Self {
                slot,
                series: slot.placeholder(),
                color_override: slot.placeholder_colors(),
                is_placeholder: true,
            },
        }
    }

    pub fn colors(&self) -> Vec<String> {
        self.color_override
            .clone()
            .unwrap_or_else(|| self.slot.spec().colors)
    }
}
