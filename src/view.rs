// src/view.rs
// State and behavior of the simulation page: the form, the last result, the derived chart series,
// the busy flag and the last error. One instance lives for the whole server and is shared by all workers.
//
// The state sits behind a std Mutex that is never held across the network await. The busy flag is an
// enforced single-flight guard: a run requested while another is in flight is skipped, and the flag is
// released by a drop guard so a cancelled run (client went away) cannot leave the view stuck.

use crate::client::SimulationService;
use crate::model::{parse_field_value, ChartPoint, FormField, SimulationRequest, SimulationResponse};
use crate::series::derive_series;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Everything the page renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub form: SimulationRequest,
    pub result: Option<SimulationResponse>,
    pub chart: Vec<ChartPoint>,
    pub busy: bool,
    pub error: Option<String>,
}

/// What happened to a run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed,
    /// Another run was already in flight; nothing was sent.
    Skipped,
}

pub struct SimulationView<S> {
    service: S,
    state: Mutex<ViewSnapshot>,
}

impl<S: SimulationService> SimulationView<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(ViewSnapshot::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewSnapshot> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state().clone()
    }

    /// Parses `raw` and stores it under `field`. Unparseable input is stored as NaN.
    pub fn edit_field(&self, field: FormField, raw: &str) -> SimulationRequest {
        let value = parse_field_value(raw);
        let mut state = self.state();
        state.form.set(field, value);
        debug!(%field, value, "form field edited");
        state.form
    }

    /// Sends the current form to the service and records the outcome.
    ///
    /// On success the result and the derived chart are replaced. On failure only the error text
    /// changes; the previous result and chart stay on screen.
    pub async fn run(&self) -> RunOutcome {
        let request = {
            let mut state = self.state();
            if state.busy {
                debug!("run requested while another is in flight; skipping");
                return RunOutcome::Skipped;
            }
            state.busy = true;
            state.error = None;
            state.form
        };
        let _busy = BusyGuard { state: &self.state };

        match self.service.simulate(&request).await {
            Ok(response) => {
                let chart = derive_series(request.theta0_deg, response.omega);
                let mut state = self.state();
                state.result = Some(response);
                state.chart = chart;
                info!(
                    theta_deg = response.theta_deg,
                    omega = response.omega,
                    "simulation completed"
                );
                RunOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "simulation failed");
                self.state().error = Some(err.to_string());
                RunOutcome::Failed
            }
        }
    }
}

/// Clears the busy flag when the run finishes or its future is dropped.
struct BusyGuard<'a> {
    state: &'a Mutex<ViewSnapshot>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpSimulationService, PENDULUM_PATH};
    use crate::error::RunError;
    use crate::testing::{closed_base_url, spawn_stub};
    use actix_web::{web, HttpResponse};
    use approx::assert_relative_eq;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::f64::consts::PI;
    use std::future::{poll_fn, Future};
    use std::pin::Pin;
    use std::task::Poll;
    use tokio::sync::Notify;

    /// Replays queued replies and records every request it sees.
    #[derive(Default)]
    struct ScriptedService {
        replies: RefCell<VecDeque<Result<SimulationResponse, RunError>>>,
        seen: RefCell<Vec<SimulationRequest>>,
    }

    impl ScriptedService {
        fn with(replies: Vec<Result<SimulationResponse, RunError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                seen: RefCell::default(),
            }
        }
    }

    impl SimulationService for ScriptedService {
        async fn simulate(
            &self,
            request: &SimulationRequest,
        ) -> Result<SimulationResponse, RunError> {
            self.seen.borrow_mut().push(*request);
            self.replies
                .borrow_mut()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    /// Holds every call until the gate is opened.
    struct GatedService {
        gate: Notify,
        calls: Cell<usize>,
    }

    impl SimulationService for GatedService {
        async fn simulate(&self, _: &SimulationRequest) -> Result<SimulationResponse, RunError> {
            self.calls.set(self.calls.get() + 1);
            self.gate.notified().await;
            Ok(reference_response())
        }
    }

    fn reference_response() -> SimulationResponse {
        SimulationResponse {
            theta_rad: 0.5236,
            theta_deg: 30.0,
            omega: 2.2147,
        }
    }

    fn edit_reference_form<S: SimulationService>(view: &SimulationView<S>) {
        view.edit_field(FormField::Theta0Deg, "30");
        view.edit_field(FormField::LengthM, "2");
        view.edit_field(FormField::Gravity, "9.81");
        view.edit_field(FormField::Time, "5");
    }

    #[test]
    fn starts_with_default_form_and_nothing_else() {
        let view = SimulationView::new(ScriptedService::default());
        let snapshot = view.snapshot();
        assert_eq!(snapshot.form, SimulationRequest::default());
        assert!(snapshot.result.is_none());
        assert!(snapshot.chart.is_empty());
        assert!(!snapshot.busy);
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn edit_changes_only_the_named_field() {
        let view = SimulationView::new(ScriptedService::default());
        let form = view.edit_field(FormField::Gravity, "1.62");
        assert_eq!(form.g, 1.62);
        assert_eq!(form.theta0_deg, 10.0);
        assert_eq!(form.length_m, 1.0);
        assert_eq!(form.t, 1.0);
        assert_eq!(view.snapshot().form, form);
    }

    #[test]
    fn bad_input_is_stored_as_nan() {
        let view = SimulationView::new(ScriptedService::default());
        assert!(view.edit_field(FormField::LengthM, "").length_m.is_nan());
    }

    #[actix_web::test]
    async fn successful_run_stores_result_and_series() {
        let view = SimulationView::new(ScriptedService::with(vec![Ok(reference_response())]));
        edit_reference_form(&view);

        assert_eq!(view.run().await, RunOutcome::Completed);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.result, Some(reference_response()));
        assert!(!snapshot.busy);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.chart.len(), 101);
        assert_eq!(snapshot.chart[0].time, "0.00");
        assert_relative_eq!(snapshot.chart[0].theta_deg, 30.0, epsilon = 1e-9);
        assert_eq!(snapshot.chart[50].time, "5.00");
        let expected = (30.0 * PI / 180.0) * (2.2147_f64 * 5.0).cos() * 180.0 / PI;
        assert_relative_eq!(snapshot.chart[50].theta_deg, expected, epsilon = 1e-9);

        let seen = view.service.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].t, 5.0);
    }

    #[actix_web::test]
    async fn series_uses_request_angle_not_returned_angle() {
        let reply = SimulationResponse {
            theta_rad: 0.0,
            theta_deg: 0.0,
            omega: 1.0,
        };
        let view = SimulationView::new(ScriptedService::with(vec![Ok(reply)]));
        view.edit_field(FormField::Theta0Deg, "20");
        view.run().await;
        assert_relative_eq!(view.snapshot().chart[0].theta_deg, 20.0, epsilon = 1e-9);
    }

    #[actix_web::test]
    async fn series_ignores_requested_duration() {
        let view = SimulationView::new(ScriptedService::with(vec![
            Ok(reference_response()),
            Ok(reference_response()),
        ]));
        view.edit_field(FormField::Time, "1");
        view.run().await;
        let short = view.snapshot().chart;
        view.edit_field(FormField::Time, "120");
        view.run().await;
        assert_eq!(view.snapshot().chart, short);
        assert_eq!(short.last().map(|p| p.time.as_str()), Some("10.00"));
    }

    #[actix_web::test]
    async fn server_error_keeps_previous_result_and_chart() {
        let view = SimulationView::new(ScriptedService::with(vec![
            Ok(reference_response()),
            Err(RunError::Server { status: 503 }),
        ]));
        view.run().await;
        let before = view.snapshot();

        view.edit_field(FormField::Theta0Deg, "45");
        assert_eq!(view.run().await, RunOutcome::Failed);

        let after = view.snapshot();
        assert_eq!(after.error.as_deref(), Some("Server error: 503"));
        assert_eq!(after.result, before.result);
        assert_eq!(after.chart, before.chart);
        assert!(!after.busy);
    }

    #[actix_web::test]
    async fn next_run_clears_previous_error() {
        let view = SimulationView::new(ScriptedService::with(vec![
            Err(RunError::Server { status: 500 }),
            Ok(reference_response()),
        ]));
        view.run().await;
        assert!(view.snapshot().error.is_some());
        view.run().await;
        assert!(view.snapshot().error.is_none());
    }

    #[actix_web::test]
    async fn identical_runs_give_identical_series() {
        let view = SimulationView::new(ScriptedService::with(vec![
            Ok(reference_response()),
            Ok(reference_response()),
        ]));
        view.run().await;
        let first = view.snapshot().chart;
        view.run().await;
        assert_eq!(view.snapshot().chart, first);
    }

    #[actix_web::test]
    async fn overlapping_run_is_skipped() {
        let view = SimulationView::new(GatedService {
            gate: Notify::new(),
            calls: Cell::new(0),
        });

        let (first, second) = tokio::join!(view.run(), async {
            assert!(view.snapshot().busy);
            let outcome = view.run().await;
            view.service.gate.notify_one();
            outcome
        });

        assert_eq!(first, RunOutcome::Completed);
        assert_eq!(second, RunOutcome::Skipped);
        assert_eq!(view.service.calls.get(), 1);
        assert!(!view.snapshot().busy);
    }

    #[actix_web::test]
    async fn dropped_run_releases_busy_flag() {
        let view = SimulationView::new(GatedService {
            gate: Notify::new(),
            calls: Cell::new(0),
        });
        {
            let mut run = Box::pin(view.run());
            // Poll once so the run is in flight, then abandon it.
            assert!(poll_once(run.as_mut()).await.is_none());
            assert!(view.snapshot().busy);
        }
        assert!(!view.snapshot().busy);
    }

    /// Polls a future a single time.
    async fn poll_once<F: Future + Unpin>(mut fut: F) -> Option<F::Output> {
        poll_fn(|cx| {
            Poll::Ready(match Pin::new(&mut fut).poll(cx) {
                Poll::Ready(out) => Some(out),
                Poll::Pending => None,
            })
        })
        .await
    }

    #[actix_web::test]
    async fn transport_failure_surfaces_transport_message() {
        let base = closed_base_url();
        let expected = HttpSimulationService::new(&base)
            .simulate(&SimulationRequest::default())
            .await
            .unwrap_err()
            .to_string();

        let view = SimulationView::new(HttpSimulationService::new(&base));
        assert_eq!(view.run().await, RunOutcome::Failed);
        assert_eq!(view.snapshot().error, Some(expected));
    }

    #[actix_web::test]
    async fn end_to_end_against_stub_service() {
        async fn reply() -> HttpResponse {
            HttpResponse::Ok().json(serde_json::json!({
                "theta_rad": 0.5236,
                "theta_deg": 30,
                "omega": 2.2147
            }))
        }
        let base = spawn_stub(|cfg| {
            cfg.route(PENDULUM_PATH, web::post().to(reply));
        });

        let view = SimulationView::new(HttpSimulationService::new(&base));
        edit_reference_form(&view);
        assert_eq!(view.run().await, RunOutcome::Completed);
        let result = view.snapshot().result.expect("result stored");
        assert_relative_eq!(result.theta_rad, 0.5236, epsilon = 1e-12);
        assert_relative_eq!(result.omega, 2.2147, epsilon = 1e-12);
        assert_eq!(view.snapshot().chart.len(), 101);
    }
}
