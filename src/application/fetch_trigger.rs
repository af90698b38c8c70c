// Fetch trigger - Validates input, guards the trigger control and fetches fresh data
use crate::application::dashboard_source::{DashboardRequest, DashboardSource, EmployeeDirectory};
use crate::application::data_shaper::shape;
use crate::application::display::DisplaySurface;
use crate::application::renderer::{ChartingCapability, ReadinessGatedRenderer, RenderOutcome};
use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::payload::DashboardPayload;
use crate::domain::query::{DashboardQuery, DateRange, DateRangeMode};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct FetchTrigger<C: ChartingCapability> {
    source: Arc<dyn DashboardSource>,
    directory: Arc<dyn EmployeeDirectory>,
    surface: Arc<dyn DisplaySurface>,
    renderer: Arc<ReadinessGatedRenderer<C>>,
    mode: DateRangeMode,
    busy: AtomicBool,
}

impl<C: ChartingCapability> FetchTrigger<C> {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        directory: Arc<dyn EmployeeDirectory>,
        surface: Arc<dyn DisplaySurface>,
        renderer: Arc<ReadinessGatedRenderer<C>>,
        mode: DateRangeMode,
    ) -> Self {
        Self {
            source,
            directory,
            surface,
            renderer,
            mode,
            busy: AtomicBool::new(false),
        }
    }

    /// Fetch, shape and display the dashboard of one employee.
    ///
    /// Missing dates default per the configured [`DateRangeMode`]. Validation
    /// failures raise a notice and issue no remote call; transport failures
    /// leave the displayed data as it was.
    pub async fn request_refresh(
        &self,
        employee_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> DashboardResult<RenderOutcome> {
        let query = match self.build_query(employee_id, from_date, to_date) {
            Ok(query) => query,
            Err(e) => {
                if let DashboardError::Validation(message) = &e {
                    self.surface.notify(message);
                }
                return Err(e);
            }
        };

        let payload = self.fetch(query).await?;
        let shaped = shape(&payload);

        for (field, text) in shaped.field_values() {
            self.surface.set_field(field, &text);
        }

        Ok(self.renderer.render_all(&shaped).await)
    }

    /// Resolve the session user's employee and load their dashboard, if any.
    pub async fn initial_load(&self, session_user: &str) -> DashboardResult<Option<RenderOutcome>> {
        let employee = self
            .directory
            .employee_for_user(session_user)
            .await
            .map_err(DashboardError::Transport)?;

        match employee {
            Some(employee_id) => {
                tracing::info!("Auto-loading dashboard of {} for {}", employee_id, session_user);
                self.surface.select_employee(&employee_id);
                self.request_refresh(&employee_id, None, None).await.map(Some)
            }
            None => {
                tracing::debug!("No employee linked to user {}", session_user);
                Ok(None)
            }
        }
    }

    fn build_query(
        &self,
        employee_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> DashboardResult<DashboardQuery> {
        if employee_id.trim().is_empty() {
            return Err(DashboardError::validation("Please select an employee first."));
        }
        let today = Local::now().date_naive();
        let range = DateRange::resolve(self.mode, today, from_date, to_date)?;
        DashboardQuery::new(employee_id, range)
    }

    async fn fetch(&self, query: DashboardQuery) -> DashboardResult<DashboardPayload> {
        let _guard = BusyGuard::acquire(&self.busy, self.surface.as_ref())?;
        let request = DashboardRequest::new(query);

        tracing::debug!(
            "Fetching dashboard for {} ({} to {}, token {})",
            request.query.employee_id,
            request.query.from_date(),
            request.query.to_date(),
            request.cache_token
        );

        self.source.fetch_dashboard(&request).await.map_err(|e| {
            tracing::error!(
                "Error fetching dashboard for {}: {:#}",
                request.query.employee_id,
                e
            );
            DashboardError::Transport(e)
        })
    }
}

/// Holds the trigger control disabled until dropped.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    surface: &'a dyn DisplaySurface,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, surface: &'a dyn DisplaySurface) -> DashboardResult<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DashboardError::RefreshInProgress);
        }
        surface.set_trigger_busy();
        Ok(Self { flag, surface })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.surface.set_trigger_ready();
    }
}
