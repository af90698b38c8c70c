// Text charting backend for terminal previews
use crate::application::renderer::ChartingCapability;
use crate::domain::chart::{ChartKind, ChartOptions, ChartSeries, ChartSpec, ShapedChart};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

const BAR_WIDTH: f64 = 30.0;
const AXIS_TICKS: u32 = 4;

#[derive(Debug, Clone)]
pub struct TextChart {
    mount_point: String,
    spec: ChartSpec,
    colors: Vec<String>,
    series: ChartSeries,
    placeholder: bool,
    ticks: Vec<String>,
}

impl TextChart {
    fn new(mount_point: &str, spec: &ChartSpec, chart: &ShapedChart) -> Self {
        let mut text_chart = Self {
            mount_point: mount_point.to_string(),
            spec: spec.clone(),
            colors: Vec::new(),
            series: ChartSeries::default(),
            placeholder: false,
            ticks: Vec::new(),
        };
        text_chart.set_data(chart);
        text_chart
    }

    fn set_data(&mut self, chart: &ShapedChart) {
        self.colors = chart.colors();
        self.series = chart.series.clone();
        self.placeholder = chart.is_placeholder;
        self.ticks = if self.spec.kind.has_count_axis() {
            axis_ticks(&self.series)
        } else {
            Vec::new()
        };
    }

    pub fn draw(&self) -> String {
        let options = match &self.spec.options {
            ChartOptions::Bar {
                space_ratio,
                x_is_series,
            } => format!("space ratio {}, series axis {}", space_ratio, x_is_series),
            ChartOptions::Line {
                region_fill,
                hide_dots,
            } => format!("region fill {}, dots hidden {}", region_fill, hide_dots),
            ChartOptions::Donut { stroke_width } => format!("stroke width {}", stroke_width),
        };

        let mut lines = vec![format!(
            "[{}] {:?} chart{}, height {}, colors {}, {}{}",
            self.mount_point,
            self.spec.kind,
            self.spec
                .dataset_name
                .as_deref()
                .map(|name| format!(" \"{}\"", name))
                .unwrap_or_default(),
            self.spec.height,
            self.colors.join(" "),
            options,
            if self.placeholder { " (no data)" } else { "" }
        )];

        if !self.ticks.is_empty() {
            lines.push(format!("  axis: {}", self.ticks.join(" | ")));
        }

        let total = self.series.total();
        let max = self.series.values.iter().cloned().fold(0.0_f64, f64::max);
        for (label, value) in self.series.labels.iter().zip(&self.series.values) {
            let line = match self.spec.kind {
                ChartKind::Donut => {
                    let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                    format!("  {:<12} {:>5.1}%", label, share)
                }
                ChartKind::Bar | ChartKind::Line => {
                    let width = if max > 0.0 { (value / max * BAR_WIDTH).round() as usize } else { 0 };
                    format!("  {:<12} {} {}", label, "#".repeat(width), value)
                }
            };
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Evenly spaced ticks from zero to the series maximum, as auto-generated
/// by a numeric axis.
fn axis_ticks(series: &ChartSeries) -> Vec<String> {
    let max = series.values.iter().cloned().fold(0.0_f64, f64::max);
    (0..=AXIS_TICKS)
        .map(|i| format!("{}", max * i as f64 / AXIS_TICKS as f64))
        .collect()
}

/// Reports ready only after `warmup_checks` failed availability checks,
/// standing in for a library that loads independently of the page.
#[derive(Default)]
pub struct TerminalCharts {
    warmup_checks: u32,
    checks: AtomicU32,
    drawn: Mutex<BTreeMap<String, String>>,
}

impl TerminalCharts {
    pub fn new(warmup_checks: u32) -> Self {
        Self {
            warmup_checks,
            ..Default::default()
        }
    }

    /// Latest drawing of every mounted chart, ordered by mount point
    pub fn drawings(&self) -> Vec<String> {
        self.drawn
            .lock()
            .map(|drawn| drawn.values().cloned().collect())
            .unwrap_or_default()
    }

    fn publish(&self, chart: &TextChart) -> anyhow::Result<()> {
        let mut drawn = self
            .drawn
            .lock()
            .map_err(|_| anyhow::anyhow!("chart canvas lock poisoned"))?;
        drawn.insert(chart.mount_point.clone(), chart.draw());
        Ok(())
    }
}

impl ChartingCapability for TerminalCharts {
    type Handle = TextChart;

    fn is_available(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst) >= self.warmup_checks
    }

    fn create(&self, mount_point: &str, spec: &ChartSpec, chart: &ShapedChart) -> anyhow::Result<TextChart> {
        let text_chart = TextChart::new(mount_point, spec, chart);
        self.publish(&text_chart)?;
        Ok(text_chart)
    }

    fn update(&self, handle: &mut TextChart, chart: &ShapedChart) -> anyhow::Result<()> {
        handle.set_data(chart);
        self.publish(handle)
    }

    fn blank_fractional_ticks(&self, handle: &mut TextChart) -> anyhow::Result<()> {
        for tick in handle.ticks.iter_mut() {
            if tick.contains('.') {
                tick.clear();
            }
        }
        self.publish(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartSlot;

    impl TextChart {
        fn ticks(&self) -> &[String] {
            &self.ticks
        }
    }

    fn shaped(slot: ChartSlot, values: &[f64]) -> ShapedChart {
        let labels = (1..=values.len()).map(|i| format!("day {}", i)).collect();
        ShapedChart::from_series(slot, Some(&ChartSeries::new(labels, values.to_vec())))
    }

    #[test]
    fn test_available_after_warmup() {
        let charts = TerminalCharts::new(2);
        assert!(!charts.is_available());
        assert!(!charts.is_available());
        assert!(charts.is_available());
    }

    #[test]
    fn test_fractional_ticks_are_blanked() {
        let charts = TerminalCharts::new(0);
        let slot = ChartSlot::MainDistribution;
        let mut chart = charts
            .create(slot.mount_point(), &slot.spec(), &shaped(slot, &[3.0, 5.0]))
            .unwrap();
        assert_eq!(chart.ticks(), ["0", "1.25", "2.5", "3.75", "5"]);

        charts.blank_fractional_ticks(&mut chart).unwrap();
        assert_eq!(chart.ticks(), ["0", "", "", "", "5"]);
    }

    #[test]
    fn test_update_redraws_in_place() {
        let charts = TerminalCharts::new(0);
        let slot = ChartSlot::LeadsPulse;
        let mut chart = charts
            .create(slot.mount_point(), &slot.spec(), &shaped(slot, &[1.0]))
            .unwrap();
        charts.update(&mut chart, &shaped(slot, &[4.0, 8.0])).unwrap();

        let drawings = charts.drawings();
        assert_eq!(drawings.len(), 1);
        assert!(drawings[0].contains("day 2"));
        assert!(drawings[0].contains(&"#".repeat(30)));
    }

    #[test]
    fn test_donut_placeholder_draws_neutral_ring() {
        let charts = TerminalCharts::new(0);
        let slot = ChartSlot::AttendanceDonut;
        let chart = charts
            .create(slot.mount_point(), &slot.spec(), &ShapedChart::from_series(slot, None))
            .unwrap();

        let drawing = chart.draw();
        assert!(drawing.contains("#e2e8f0"));
        assert!(drawing.contains("No Data"));
        assert!(drawing.contains("100.0%"));
        assert!(chart.ticks().is_empty());
    }
}
