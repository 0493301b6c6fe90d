//! End-to-end scan lifecycle tests on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::sleep;

use doctor_core::{
    ComponentId, DiagnosticController, DoctorConfig, FaultKnowledgeBase, FaultRecord,
    HighlightDirective, Phase, RiskLevel, ScanCompletion, ScanScheduler, Selection, Tint,
    TokioScanScheduler,
};

const DELAY: Duration = Duration::from_millis(1500);
const TICK: Duration = Duration::from_millis(1);

fn kb() -> Arc<FaultKnowledgeBase> {
    Arc::new(FaultKnowledgeBase::builtin().expect("builtin knowledge base"))
}

fn controller() -> DiagnosticController {
    DiagnosticController::with_tokio(kb(), &DoctorConfig::default()).expect("tokio runtime")
}

/// Tokio timers whose abort handles are thrown away, so every scheduled
/// completion really fires and only the token check can discard it.
struct UncancellableScheduler(TokioScanScheduler);

impl ScanScheduler for UncancellableScheduler {
    fn schedule(&self, delay: Duration, completion: ScanCompletion) -> Option<AbortHandle> {
        let _ = self.0.schedule(delay, completion);
        None
    }
}

fn uncancellable_controller() -> DiagnosticController {
    let sched = UncancellableScheduler(TokioScanScheduler::current().expect("tokio runtime"));
    DiagnosticController::new(kb(), &DoctorConfig::default(), Arc::new(sched))
}

fn assert_token_invariant(ctl: &DiagnosticController) {
    let rx = ctl.subscribe();
    let session = rx.borrow();
    if let Some(token) = session.phase().token() {
        assert!(token <= session.last_token());
    }
}

// ── State-sequence fidelity ──

#[tokio::test(start_paused = true)]
async fn idle_scanning_resolved_sequence() {
    let ctl = controller();
    assert_eq!(ctl.current_phase(), Phase::Idle);
    assert!(ctl.current_report().is_standby());

    ctl.select_component("heat");
    assert!(ctl.current_phase().is_scanning());

    sleep(DELAY - TICK).await;
    assert!(ctl.current_phase().is_scanning());
    assert!(std::ptr::eq(ctl.current_report(), FaultRecord::standby()));
    assert!(ctl.current_highlight().is_none());

    sleep(TICK * 2).await;
    assert_eq!(
        ctl.current_phase().resolved(),
        Some(&Selection::Known(ComponentId::Heat))
    );
    assert_eq!(
        ctl.current_report(),
        ctl.knowledge_base().lookup(&Selection::from("heat"))
    );
    assert_eq!(
        ctl.current_highlight(),
        HighlightDirective::Emphasize {
            component_id: Selection::Known(ComponentId::Heat),
            color_class: Tint::CriticalTint,
        }
    );
    assert_token_invariant(&ctl);
}

// ── Race freedom ──

#[tokio::test(start_paused = true)]
async fn later_selection_wins_when_both_timers_fire() {
    let ctl = uncancellable_controller();
    ctl.select_component("ram");
    ctl.select_component("disk");

    sleep(DELAY + TICK).await;

    let phase = ctl.current_phase();
    assert_eq!(phase.resolved(), Some(&Selection::Known(ComponentId::Disk)));
    assert_eq!(ctl.current_report().title, "SSD/HDD SMART Failure");
    assert_token_invariant(&ctl);
}

#[tokio::test(start_paused = true)]
async fn stale_timer_firing_mid_scan_is_ignored() {
    let ctl = uncancellable_controller();
    ctl.select_component("ram");
    sleep(Duration::from_millis(500)).await;
    ctl.select_component("disk");

    // ram's timer fires at 1500ms, disk's at 2000ms.
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(
        ctl.current_phase(),
        Phase::Scanning {
            selection: Selection::from("disk"),
            token: ctl.subscribe().borrow().last_token(),
        }
    );
    assert!(ctl.current_report().is_standby());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(
        ctl.current_phase().resolved(),
        Some(&Selection::Known(ComponentId::Disk))
    );
}

#[tokio::test(start_paused = true)]
async fn cancellable_scheduler_also_ends_on_latest() {
    let ctl = controller();
    ctl.select_component("ram");
    ctl.select_component("disk");

    sleep(DELAY + TICK).await;
    assert_eq!(
        ctl.current_phase().resolved(),
        Some(&Selection::Known(ComponentId::Disk))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rapid_selection_on_multi_thread_runtime() {
    let config = DoctorConfig::default().with_scan_delay(Duration::from_millis(50));
    let sched = UncancellableScheduler(TokioScanScheduler::current().expect("tokio runtime"));
    let ctl = DiagnosticController::new(kb(), &config, Arc::new(sched));

    for id in ComponentId::ALL {
        ctl.select_component(id);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        ctl.current_phase().resolved(),
        Some(&Selection::Known(ComponentId::Wifi))
    );
    assert_token_invariant(&ctl);
}

// ── Re-selection ──

#[tokio::test(start_paused = true)]
async fn reselecting_resolved_component_rescans() {
    let ctl = controller();
    let first = ctl.select_component("battery");
    sleep(DELAY + TICK).await;
    assert!(ctl.current_phase().resolved().is_some());

    let second = ctl.select_component("battery");
    assert!(second > first);
    assert!(ctl.current_phase().is_scanning());
    assert!(ctl.current_report().is_standby());
    assert!(ctl.current_highlight().is_none());

    sleep(DELAY + TICK).await;
    assert_eq!(
        ctl.current_phase(),
        Phase::Resolved {
            selection: Selection::from("battery"),
            token: second,
        }
    );
}

// ── Concrete scenarios ──

#[tokio::test(start_paused = true)]
async fn ram_report_after_delay() {
    let ctl = controller();
    ctl.select_component("ram");
    sleep(DELAY + TICK).await;

    let report = ctl.current_report();
    assert_eq!(report.title, "Memory Module Error");
    assert_eq!(report.solutions.len(), 3);

    // Critical risk, but not in the thermal set.
    assert_eq!(report.risk, RiskLevel::Critical);
    assert!(matches!(
        ctl.current_highlight(),
        HighlightDirective::Emphasize {
            color_class: Tint::DefaultTint,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn unknown_id_resolves_to_standby() {
    let ctl = controller();
    ctl.select_component("unknown-id");
    sleep(DELAY + TICK).await;

    assert_eq!(
        ctl.current_phase().resolved(),
        Some(&Selection::Unrecognized("unknown-id".to_string()))
    );
    let report = ctl.current_report();
    assert!(std::ptr::eq(report, FaultRecord::standby()));
    assert_eq!(report.risk, RiskLevel::Safe);
}

#[tokio::test(start_paused = true)]
async fn configured_delay_is_honoured() {
    let config = DoctorConfig::default().with_scan_delay(Duration::from_millis(200));
    let ctl = DiagnosticController::with_tokio(kb(), &config).expect("tokio runtime");
    ctl.select_component("usb");

    sleep(Duration::from_millis(199)).await;
    assert!(ctl.current_phase().is_scanning());
    sleep(Duration::from_millis(2)).await;
    assert!(ctl.current_phase().resolved().is_some());
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_resolution() {
    let ctl = controller();
    let mut rx = ctl.subscribe();
    ctl.select_component("screen");
    rx.changed().await.expect("scanning");
    assert!(rx.borrow_and_update().phase().is_scanning());

    rx.changed().await.expect("resolved");
    assert_eq!(
        rx.borrow().phase().resolved(),
        Some(&Selection::Known(ComponentId::Screen))
    );
}
