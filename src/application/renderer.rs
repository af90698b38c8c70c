// Readiness-gated renderer - Renders charts once the charting capability is loaded
use crate::application::data_shaper::{ShapedCharts, ShapedDashboard};
use crate::application::display::DisplaySurface;
use crate::domain::chart::{ChartSlot, ChartSpec, ShapedChart};
use crate::domain::errors::DashboardError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Chart construction primitives supplied by an external charting library.
pub trait ChartingCapability: Send + Sync {
    type Handle: Send;

    /// Whether the library has finished loading
    fn is_available(&self) -> bool;

    /// Construct a chart bound to a mount point
    fn create(
        &self,
        mount_point: &str,
        spec: &ChartSpec,
        chart: &ShapedChart,
    ) -> anyhow::Result<Self::Handle>;

    /// Replace the data of an existing chart in place
    fn update(&self, handle: &mut Self::Handle, chart: &ShapedChart) -> anyhow::Result<()>;

    /// Blank generated axis ticks that carry a decimal point
    fn blank_fractional_ticks(&self, handle: &mut Self::Handle) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub max_checks: u32,
    pub retry_delay: Duration,
    pub tick_cleanup_delay: Option<Duration>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            max_checks: 10,
            retry_delay: Duration::from_millis(300),
            tick_cleanup_delay: Some(Duration::from_millis(200)),
        }
    }
}

/// At most one live chart per slot.
pub struct ChartRegistry<H> {
    main_distribution: Option<H>,
    leads_pulse: Option<H>,
    attendance_donut: Option<H>,
}

impl<H> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            main_distribution: None,
            leads_pulse: None,
            attendance_donut: None,
        }
    }
}

impl<H> ChartRegistry<H> {
    fn slot_mut(&mut self, slot: ChartSlot) -> &mut Option<H> {
        match slot {
            ChartSlot::MainDistribution => &mut self.main_distribution,
            ChartSlot::LeadsPulse => &mut self.leads_pulse,
            ChartSlot::AttendanceDonut => &mut self.attendance_donut,
        }
    }

    fn slot(&self, slot: ChartSlot) -> Option<&H> {
        match slot {
            ChartSlot::MainDistribution => self.main_distribution.as_ref(),
            ChartSlot::LeadsPulse => self.leads_pulse.as_ref(),
            ChartSlot::AttendanceDonut => self.attendance_donut.as_ref(),
        }
    }

    pub fn live_slots(&self) -> Vec<ChartSlot> {
        ChartSlot::ALL
            .into_iter()
            .filter(|slot| self.slot(*slot).is_some())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The capability answered on the given check and the charts were drawn
    Rendered { checks: u32 },
    /// Retry budget exhausted; existing charts were left as they were
    DependencyUnavailable,
    /// A newer cycle started while this one was waiting
    Superseded,
}

pub struct ReadinessGatedRenderer<C: ChartingCapability> {
    capability: Arc<C>,
    surface: Arc<dyn DisplaySurface>,
    settings: RendererSettings,
    registry: Mutex<ChartRegistry<C::Handle>>,
    generation: AtomicU64,
}

impl<C: ChartingCapability> ReadinessGatedRenderer<C> {
    pub fn new(capability: Arc<C>, surface: Arc<dyn DisplaySurface>, settings: RendererSettings) -> Self {
        Self {
            capability,
            surface,
            settings,
            registry: Mutex::new(ChartRegistry::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Render the timeline right away and the charts once the capability is ready.
    pub async fn render_all(&self, shaped: &ShapedDashboard) -> RenderOutcome {
        if let Err(e) = self.surface.render_timeline(&shaped.timeline) {
            tracing::error!("Error rendering activity timeline: {:#}", e);
        }

        self.render_charts(&shaped.charts).await
    }

    pub async fn render_charts(&self, charts: &ShapedCharts) -> RenderOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let checks = match self.await_capability(generation).await {
            Ok(checks) => checks,
            Err(outcome) => return outcome,
        };

        {
            let mut registry = self.registry.lock().await;
            if self.is_stale(generation) {
                return RenderOutcome::Superseded;
            }

            tracing::debug!("Charting capability ready after {} checks, rendering", checks);
            for slot in ChartSlot::ALL {
                if let Err(e) = self.render_slot(&mut registry, charts.get(slot)) {
                    tracing::error!("{}", e);
                }
            }
        }

        if let Some(delay) = self.settings.tick_cleanup_delay {
            tokio::time::sleep(delay).await;
            self.clean_fractional_ticks(generation).await;
        }

        RenderOutcome::Rendered { checks }
    }

    pub async fn live_slots(&self) -> Vec<ChartSlot> {
        self.registry.lock().await.live_slots()
    }

    async fn await_capability(&self, generation: u64) -> Result<u32, RenderOutcome> {
        let mut checks = 0;
        loop {
            checks += 1;
            if self.capability.is_available() {
                return Ok(checks);
            }

            if checks >= self.settings.max_checks {
                tracing::error!("{}", DashboardError::RenderDependencyUnavailable { checks });
                return Err(RenderOutcome::DependencyUnavailable);
            }

            tracing::warn!(
                "Charting capability not ready yet, retrying ({} left)",
                self.settings.max_checks - checks
            );
            tokio::time::sleep(self.settings.retry_delay).await;

            if self.is_stale(generation) {
                tracing::debug!("Render cycle {} superseded while polling", generation);
                return Err(RenderOutcome::Superseded);
            }
        }
    }

    fn render_slot(
        &self,
        registry: &mut ChartRegistry<C::Handle>,
        chart: &ShapedChart,
    ) -> Result<(), DashboardError> {
        let slot = chart.slot;
        let entry = registry.slot_mut(slot);
        let result = match entry.as_mut() {
            Some(handle) => self.capability.update(handle, chart),
            None => self
                .capability
                .create(slot.mount_point(), &slot.spec(), chart)
                .map(|handle| {
                    *entry = Some(handle);
                }),
        };

        result.map_err(|source| DashboardError::ChartRender { slot, source })
    }

    async fn clean_fractional_ticks(&self, generation: u64) {
        let mut registry = self.registry.lock().await;
        if self.is_stale(generation) {
            return;
        }

        for slot in ChartSlot::ALL {
            if !slot.spec().kind.has_count_axis() {
                continue;
            }
            if let Some(handle) = registry.slot_mut(slot) {
                if let Err(e) = self.capability.blank_fractional_ticks(handle) {
                    tracing::warn!("Could not clean axis ticks of {} chart: {:#}", slot, e);
                }
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}
