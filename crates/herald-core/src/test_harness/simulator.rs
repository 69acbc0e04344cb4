//! Herald Simulator - seeded workload harness for the notification center
//!
//! Drives a center with random show / dismiss / clear / clock-advance
//! operations on a paused clock, mirrors every step in a reference model,
//! and checks the lifecycle invariants after each operation.

use super::{advance_ms, paused_runtime, settle_until};
use crate::center::NotificationCenter;
use crate::config::CenterConfig;
use crate::error::HeraldError;
use crate::types::{NotificationId, NotificationKind};
use indexmap::IndexMap;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Total operations to execute
    pub total_operations: u64,
    /// Configuration of the simulated center
    pub center: CenterConfig,
    /// Longest duration a timed entry gets
    pub max_duration_ms: u64,
    /// Relative weights of the operation types
    pub operation_mix: OperationMix,
    /// Stop conditions
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 10_000,
            center: CenterConfig::default(),
            max_duration_ms: 6000,
            operation_mix: OperationMix::default(),
            stop_on_first_violation: true,
        }
    }
}

/// Probability distribution for operation generation
#[derive(Debug, Clone)]
pub struct OperationMix {
    pub show: f64,
    pub dismiss: f64,
    pub advance: f64,
    pub clear: f64,
}

impl Default for OperationMix {
    fn default() -> Self {
        Self {
            show: 0.45,
            dismiss: 0.20,
            advance: 0.32,
            clear: 0.03,
        }
    }
}

/// All operations the simulator can generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOperation {
    Show(NotificationKind, u64),
    Dismiss(NotificationId),
    /// Dismiss of an id that was removed earlier
    DismissRemoved(NotificationId),
    /// Dismiss of an id that was never issued
    DismissUnknown(NotificationId),
    Advance(u64),
    Clear,
}

impl SimulatedOperation {
    fn type_name(&self) -> &'static str {
        match self {
            SimulatedOperation::Show(..) => "Show",
            SimulatedOperation::Dismiss(_) => "Dismiss",
            SimulatedOperation::DismissRemoved(_) => "DismissRemoved",
            SimulatedOperation::DismissUnknown(_) => "DismissUnknown",
            SimulatedOperation::Advance(_) => "Advance",
            SimulatedOperation::Clear => "Clear",
        }
    }
}

/// Types of invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantCheck {
    /// No two active entries share an id
    UniqueIds,
    /// Every issued id is larger than all earlier ones
    IdsNeverReused,
    /// Active set matches the model, in insertion order
    ActiveSetMatchesModel,
    /// Exactly one timer per active timed entry
    OneTimerPerTimedEntry,
    /// Active set never exceeds `max_visible`
    CapacityRespected,
}

/// A violation detected during simulation
#[derive(Debug, Clone)]
pub struct Violation {
    pub operation_index: u64,
    pub operation: SimulatedOperation,
    pub check: InvariantCheck,
    pub details: String,
}

/// Statistics collected during simulation
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub total_operations: u64,
    pub shown: u64,
    pub dismissed: u64,
    pub expired: u64,
    pub evicted: u64,
    pub operations_by_type: HashMap<String, u64>,
}

impl OperationStats {
    fn record(&mut self, operation: &SimulatedOperation) {
        self.total_operations += 1;
        *self
            .operations_by_type
            .entry(operation.type_name().to_string())
            .or_insert(0) += 1;
    }
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    pub config: SimulatorConfig,
    pub stats: OperationStats,
    pub violations: Vec<Violation>,
    pub final_active_count: usize,
    pub elapsed_ms: u64,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate a text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Herald Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Total Operations: {}\n", self.stats.total_operations));
        report.push_str(&format!("Shown: {}\n", self.stats.shown));
        report.push_str(&format!("Dismissed: {}\n", self.stats.dismissed));
        report.push_str(&format!("Expired: {}\n", self.stats.expired));
        report.push_str(&format!("Evicted: {}\n", self.stats.evicted));
        report.push_str(&format!("Simulated Time: {}ms\n", self.elapsed_ms));
        report.push_str(&format!("Final Active: {}\n", self.final_active_count));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!(
                    "{}. op {} {:?}: {:?} - {}\n",
                    i + 1,
                    v.operation_index,
                    v.operation,
                    v.check,
                    v.details
                ));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Reference model of the active set
#[derive(Debug, Default)]
struct Model {
    /// Active ids with their absolute deadline (None = persistent)
    entries: IndexMap<NotificationId, Option<u64>>,
    /// Ids removed so far
    removed: Vec<NotificationId>,
    now_ms: u64,
    last_issued: u64,
}

impl Model {
    fn show(&mut self, id: NotificationId, duration_ms: u64, max_visible: Option<usize>) -> u64 {
        let mut evicted = 0;
        if let Some(max) = max_visible {
            while self.entries.len() >= max {
                match self.entries.shift_remove_index(0) {
                    Some((oldest, _)) => {
                        self.removed.push(oldest);
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }
        let deadline = (duration_ms > 0).then(|| self.now_ms + duration_ms);
        self.entries.insert(id, deadline);
        evicted
    }

    fn dismiss(&mut self, id: NotificationId) -> bool {
        let removed = self.entries.shift_remove(&id).is_some();
        if removed {
            self.removed.push(id);
        }
        removed
    }

    fn clear(&mut self) -> u64 {
        let count = self.entries.len() as u64;
        self.removed.extend(self.entries.drain(..).map(|(id, _)| id));
        count
    }

    fn advance(&mut self, ms: u64) -> u64 {
        self.now_ms += ms;
        let now = self.now_ms;
        let before = self.entries.len();
        let mut expired = Vec::new();
        self.entries.retain(|id, deadline| match deadline {
            Some(at) if *at <= now => {
                expired.push(*id);
                false
            }
            _ => true,
        });
        self.removed.extend(expired);
        (before - self.entries.len()) as u64
    }

    fn ids(&self) -> Vec<NotificationId> {
        self.entries.keys().copied().collect()
    }
}

/// Run the Herald Simulator
///
/// # Errors
/// - `HeraldError::Io` if the runtime cannot be built
pub fn run_simulator(config: SimulatorConfig) -> Result<SimulatorReport, HeraldError> {
    let runtime = paused_runtime()?;
    Ok(runtime.block_on(simulate(config)))
}

async fn simulate(config: SimulatorConfig) -> SimulatorReport {
    let center = NotificationCenter::new(config.center.clone());
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = OperationStats::default();
    let mut violations = Vec::new();
    let mut model = Model::default();

    for i in 0..config.total_operations {
        let operation = generate_operation(&mut rng, &config, &model);
        let mut step_violations = Vec::new();

        match &operation {
            SimulatedOperation::Show(kind, duration_ms) => {
                let id = center.show_for(*kind, format!("sim {i}"), *duration_ms);
                if id.value() <= model.last_issued {
                    step_violations.push((
                        InvariantCheck::IdsNeverReused,
                        format!("issued {id} after #{}", model.last_issued),
                    ));
                }
                model.last_issued = model.last_issued.max(id.value());
                stats.shown += 1;
                stats.evicted += model.show(id, *duration_ms, config.center.max_visible);
            }
            SimulatedOperation::Dismiss(id)
            | SimulatedOperation::DismissRemoved(id)
            | SimulatedOperation::DismissUnknown(id) => {
                let removed = center.dismiss(*id);
                let expected = model.dismiss(*id);
                if removed != expected {
                    step_violations.push((
                        InvariantCheck::ActiveSetMatchesModel,
                        format!("dismiss {id} returned {removed}, model expected {expected}"),
                    ));
                }
                if removed {
                    stats.dismissed += 1;
                }
            }
            SimulatedOperation::Advance(ms) => {
                stats.expired += model.advance(*ms);
                advance_ms(*ms).await;
                let expected = model.ids();
                settle_until(|| active_ids(&center) == expected, 1024).await;
            }
            SimulatedOperation::Clear => {
                stats.dismissed += model.clear();
                center.clear();
            }
        }

        step_violations.extend(check_invariants(&center, &model, &config.center));
        stats.record(&operation);

        if !step_violations.is_empty() {
            for (check, details) in step_violations {
                violations.push(Violation {
                    operation_index: i,
                    operation: operation.clone(),
                    check,
                    details,
                });
            }
            if config.stop_on_first_violation {
                break;
            }
        }
    }

    SimulatorReport {
        stats,
        violations,
        final_active_count: center.len(),
        elapsed_ms: model.now_ms,
        config,
    }
}

fn active_ids(center: &NotificationCenter) -> Vec<NotificationId> {
    center.active().into_iter().map(|n| n.id).collect()
}

fn check_invariants(
    center: &NotificationCenter,
    model: &Model,
    center_config: &CenterConfig,
) -> Vec<(InvariantCheck, String)> {
    let mut found = Vec::new();
    let active = center.active();

    let unique: HashSet<NotificationId> = active.iter().map(|n| n.id).collect();
    if unique.len() != active.len() {
        found.push((
            InvariantCheck::UniqueIds,
            format!("{} entries, {} distinct ids", active.len(), unique.len()),
        ));
    }

    let ids: Vec<NotificationId> = active.iter().map(|n| n.id).collect();
    let expected = model.ids();
    if ids != expected {
        found.push((
            InvariantCheck::ActiveSetMatchesModel,
            format!("center {ids:?}, model {expected:?}"),
        ));
    }

    let timed = active.iter().filter(|n| !n.is_persistent()).count();
    let timers = center.pending_timers();
    if timers != timed {
        found.push((
            InvariantCheck::OneTimerPerTimedEntry,
            format!("{timed} timed entries, {timers} timers"),
        ));
    }

    if let Some(max) = center_config.max_visible {
        if active.len() > max {
            found.push((
                InvariantCheck::CapacityRespected,
                format!("{} active, max {}", active.len(), max),
            ));
        }
    }

    found
}

/// Generate a random operation based on the mix
fn generate_operation(rng: &mut StdRng, config: &SimulatorConfig, model: &Model) -> SimulatedOperation {
    let mix = &config.operation_mix;
    let total = mix.show + mix.dismiss + mix.advance + mix.clear;
    let r: f64 = rng.random::<f64>() * total;

    if r < mix.show {
        generate_show(rng, config)
    } else if r < mix.show + mix.dismiss {
        generate_dismiss(rng, model)
    } else if r < mix.show + mix.dismiss + mix.advance {
        SimulatedOperation::Advance(rng.random_range(1..=config.max_duration_ms.max(2) / 2))
    } else {
        SimulatedOperation::Clear
    }
}

fn generate_show(rng: &mut StdRng, config: &SimulatorConfig) -> SimulatedOperation {
    let kind = NotificationKind::ALL[rng.random_range(0..NotificationKind::ALL.len())];
    let duration_ms = match rng.random_range(0..5) {
        0 => 0,
        1 => config.center.default_duration_ms,
        _ => rng.random_range(1..=config.max_duration_ms.max(1)),
    };
    SimulatedOperation::Show(kind, duration_ms)
}

fn generate_dismiss(rng: &mut StdRng, model: &Model) -> SimulatedOperation {
    match rng.random_range(0..6) {
        0 if !model.removed.is_empty() => {
            SimulatedOperation::DismissRemoved(model.removed[rng.random_range(0..model.removed.len())])
        }
        1 => SimulatedOperation::DismissUnknown(NotificationId(u64::MAX - rng.random_range(0..1000))),
        _ if !model.entries.is_empty() => {
            let index = rng.random_range(0..model.entries.len());
            match model.entries.get_index(index) {
                Some((id, _)) => SimulatedOperation::Dismiss(*id),
                None => SimulatedOperation::DismissUnknown(NotificationId(0)),
            }
        }
        // Ids start at 1, so #0 is never issued
        _ => SimulatedOperation::DismissUnknown(NotificationId(0)),
    }
}
