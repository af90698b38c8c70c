// In-memory collaborators shared by the application tests
use crate::application::dashboard_source::{DashboardRequest, DashboardSource, EmployeeDirectory};
use crate::application::data_shaper::TimelineRow;
use crate::application::display::DisplaySurface;
use crate::application::renderer::ChartingCapability;
use crate::domain::chart::{ChartSlot, ChartSpec, ShapedChart};
use crate::domain::payload::DashboardPayload;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

pub struct FakeChart {
    slot: ChartSlot,
}

#[derive(Default)]
pub struct FakeCharts {
    checks: AtomicU32,
    available_after: Option<u32>,
    forced: Mutex<Option<bool>>,
    failing: Mutex<Vec<ChartSlot>>,
    created: AtomicUsize,
    updated: AtomicUsize,
    tick_cleanups: Mutex<Vec<ChartSlot>>,
    last_values: Mutex<HashMap<ChartSlot, Vec<f64>>>,
}

impl FakeCharts {
    /// Becomes available on the given check
    pub fn available_after(check: u32) -> Self {
        Self {
            available_after: Some(check),
            ..Default::default()
        }
    }

    pub fn never_available() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        *self.forced.lock().unwrap() = Some(available);
    }

    pub fn fail_slot(&self, slot: ChartSlot) {
        self.failing.lock().unwrap().push(slot);
    }

    pub fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn updated(&self) -> usize {
        self.updated.load(Ordering::SeqCst)
    }

    pub fn tick_cleanups(&self) -> Vec<ChartSlot> {
        self.tick_cleanups.lock().unwrap().clone()
    }

    pub fn last_values(&self, slot: ChartSlot) -> Option<Vec<f64>> {
        self.last_values.lock().unwrap().get(&slot).cloned()
    }

    fn record(&self, chart: &ShapedChart) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(&chart.slot) {
            anyhow::bail!("mount point {} missing", chart.slot.mount_point());
        }
        self.last_values
            .lock()
            .unwrap()
            .insert(chart.slot, chart.series.values.clone());
        Ok(())
    }
}

impl ChartingCapability for FakeCharts {
    type Handle = FakeChart;

    fn is_available(&self) -> bool {
        let check = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(forced) = *self.forced.lock().unwrap() {
            return forced;
        }
        self.available_after.is_some_and(|after| check >= after)
    }

    fn create(&self, _mount_point: &str, _spec: &ChartSpec, chart: &ShapedChart) -> anyhow::Result<FakeChart> {
        self.record(chart)?;
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeChart { slot: chart.slot })
    }

    fn update(&self, handle: &mut FakeChart, chart: &ShapedChart) -> anyhow::Result<()> {
        assert_eq!(handle.slot, chart.slot);
        self.record(chart)?;
        self.updated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn blank_fractional_ticks(&self, handle: &mut FakeChart) -> anyhow::Result<()> {
        self.tick_cleanups.lock().unwrap().push(handle.slot);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub fields: Mutex<HashMap<String, String>>,
    pub timelines: Mutex<Vec<Vec<TimelineRow>>>,
    pub notices: Mutex<Vec<String>>,
    pub trigger_events: Mutex<Vec<&'static str>>,
    pub selected: Mutex<Option<String>>,
}

impl RecordingSurface {
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.lock().unwrap().get(name).cloned()
    }

    /// Row count of the most recent timeline render
    pub fn timeline_rows(&self) -> usize {
        self.timelines.lock().unwrap().last().map_or(0, Vec::len)
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn trigger_events(&self) -> Vec<&'static str> {
        self.trigger_events.lock().unwrap().clone()
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_field(&self, field: &str, text: &str) {
        self.fields
            .lock()
            .unwrap()
            .insert(field.to_string(), text.to_string());
    }

    fn render_timeline(&self, rows: &[TimelineRow]) -> anyhow::Result<()> {
        self.timelines.lock().unwrap().push(rows.to_vec());
        Ok(())
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn set_trigger_busy(&self) {
        self.trigger_events.lock().unwrap().push("busy");
    }

    fn set_trigger_ready(&self) {
        self.trigger_events.lock().unwrap().push("ready");
    }

    fn select_employee(&self, employee_id: &str) {
        *self.selected.lock().unwrap() = Some(employee_id.to_string());
    }
}

/// Serves a fixed payload, or fails when none is set.
#[derive(Default)]
pub struct StubSource {
    pub payload: Mutex<Option<DashboardPayload>>,
    pub requests: Mutex<Vec<DashboardRequest>>,
    pub employees: HashMap<String, String>,
}

impl StubSource {
    pub fn with_payload(payload: DashboardPayload) -> Self {
        Self {
            payload: Mutex::new(Some(payload)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DashboardSource for StubSource {
    async fn fetch_dashboard(&self, request: &DashboardRequest) -> anyhow::Result<DashboardPayload> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        self.payload
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

#[async_trait]
impl EmployeeDirectory for StubSource {
    async fn employee_for_user(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.employees.get(user_id).cloned())
    }
}
