//! Generation pipeline: setup, run, post-process and retries
//!
//! One [`Attempt`] owns one solver and walks it through a fixed sequence of
//! phases. Failure recovery never rewinds that solver: it replays directed
//! selections against brand-new solvers set up from the same resolved
//! constraint plan and restored to the random state captured before the run.

use crate::algorithm::constraints::{
    ConstraintGroup, ConstraintOp, INITIAL_PROPAGATION, PlacementConstraint, excluded_cells,
    overhang_ops, resolve_constraints, skybox_ops,
};
use crate::algorithm::control::{CancellationToken, ProgressCallback, ProgressThrottle};
use crate::algorithm::propagation::WavePropagator;
use crate::algorithm::recovery::{
    ClassifiedSelections, ContradictionSignature, Selection, shrink_selections,
};
use crate::algorithm::solver::{CellValue, RandomState, Resolution, Solver, SolverOptions};
use crate::io::configuration::{
    DEFAULT_RETRIES, DEFAULT_SEED, DEFAULT_STEP_LIMIT, PROGRESS_INTERVAL_MS, PROGRESS_LABEL,
};
use crate::io::error::{GenerationError, Result, configuration_error};
use crate::math::hashing::attempt_seed;
use crate::model::{ModelTile, TileModel};
use crate::spatial::grid::{Cell, Grid, sub_cells};
use crate::spatial::rotation::Rotation;
use crate::spatial::tiles::{FacePattern, TileId};
use crate::spatial::topology::MaskedTopology;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What an attempt reports when the run ends in a contradiction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FailureMode {
    /// Report only the contradiction location
    #[default]
    Cancel,
    /// Report the partial map of the failing state
    Last,
    /// Replay everything decided before the failing step
    LastGood,
    /// Shrink the decisions to a small set reproducing the failure
    Minimal,
}

impl FailureMode {
    const fn needs_tracker(self) -> bool {
        matches!(self, Self::LastGood | Self::Minimal)
    }
}

/// Runtime options for one generation request
#[derive(Clone)]
pub struct GenerationOptions {
    /// Base random seed
    pub seed: u64,
    /// Steps before a contradiction is forced; zero means unbounded
    pub step_limit: usize,
    /// Let the solver undo failing choices
    pub backtrack: bool,
    /// Recovery performed after a run contradiction
    pub failure_mode: FailureMode,
    /// Extra attempts [`generate`] makes after a run contradiction
    pub retries: usize,
    /// Pattern every open face on the grid's outer edge must match
    pub skybox: Option<FacePattern>,
    /// Token polled before every step
    pub cancellation: Option<CancellationToken>,
    /// Rate-limited progress sink
    pub progress: Option<ProgressCallback>,
    /// Minimum delay between progress reports
    pub progress_interval: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            step_limit: DEFAULT_STEP_LIMIT,
            backtrack: false,
            failure_mode: FailureMode::default(),
            retries: DEFAULT_RETRIES,
            skybox: None,
            cancellation: None,
            progress: None,
            progress_interval: Duration::from_millis(PROGRESS_INTERVAL_MS),
        }
    }
}

impl GenerationOptions {
    /// Set the base seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the step limit
    #[must_use]
    pub const fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Enable or disable backtracking
    #[must_use]
    pub const fn with_backtrack(mut self, backtrack: bool) -> Self {
        self.backtrack = backtrack;
        self
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Set the retry count
    #[must_use]
    pub const fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Set the boundary pattern
    #[must_use]
    pub fn with_skybox(mut self, skybox: FacePattern) -> Self {
        self.skybox = Some(skybox);
        self
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Attach a progress callback
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            seed: self.seed,
            backtrack: self.backtrack,
        }
    }
}

impl fmt::Debug for GenerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationOptions")
            .field("seed", &self.seed)
            .field("step_limit", &self.step_limit)
            .field("backtrack", &self.backtrack)
            .field("failure_mode", &self.failure_mode)
            .field("retries", &self.retries)
            .field("skybox", &self.skybox)
            .field("cancellation", &self.cancellation)
            .field("progress", &self.progress.is_some())
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

/// Phase an attempt has reached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing computed yet
    Uninitialized,
    /// Topology masked and constraints resolved
    Initialized,
    /// Solver built over the masked topology
    PropagatorCreated,
    /// Constraints applied
    SetUp,
    /// Stepping
    Running,
    /// Every cell holds one tile
    Decided,
    /// The run ended in a contradiction
    Contradiction,
    /// Completion produced
    PostProcessed,
}

impl PipelineState {
    /// Human-readable state name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Initialized => "Initialized",
            Self::PropagatorCreated => "PropagatorCreated",
            Self::SetUp => "SetUp",
            Self::Running => "Running",
            Self::Decided => "Decided",
            Self::Contradiction => "Contradiction",
            Self::PostProcessed => "PostProcessed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One solved cell, ready for a renderer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// World cell
    pub cell: Cell,
    /// Dense cell index
    pub index: usize,
    /// Tile definition
    pub tile: TileId,
    /// Tile definition name
    pub name: String,
    /// Orientation of the whole tile
    pub rotation: Rotation,
    /// Sub-cell of the tile occupying this cell
    pub offset: Cell,
    /// World cell of the tile's `[0, 0, 0]` offset; groups the cells of one big tile
    pub origin: Cell,
}

/// Terminal result of one generation attempt
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    /// Whether every active cell was decided
    pub success: bool,
    /// Instance per cell index; empty when only a location is reported
    pub cells: Vec<Option<ModelTile>>,
    /// First unsolved cell in scan order, reported in `Cancel` mode
    pub contradiction: Option<Cell>,
    /// Selections the partial map was replayed from
    pub selections: Vec<Selection>,
    /// Seed the attempt ran with
    pub seed: u64,
    /// Failed attempts before this one
    pub retries: usize,
    /// Choices the solver undid
    pub backtrack_count: usize,
    /// Solver steps taken
    pub steps: usize,
    placements: Vec<Placement>,
}

impl Completion {
    /// Solved cells with their tile, orientation and grouping
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Instance at a cell index
    pub fn instance_at(&self, index: usize) -> Option<ModelTile> {
        self.cells.get(index).copied().flatten()
    }

    /// Convert a failed completion into an error
    ///
    /// # Errors
    ///
    /// Returns `ContradictionDuringRun` if the attempt did not succeed
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(GenerationError::ContradictionDuringRun {
                cell: self.contradiction,
            })
        }
    }
}

/// Apply resolved constraint groups, naming the first one that contradicts
fn apply_plan<'m, S: Solver<'m>>(solver: &mut S, plan: &[ConstraintGroup]) -> Result<()> {
    for group in plan {
        for op in &group.ops {
            let resolution = match op {
                ConstraintOp::Select(cell, tiles) => solver.select(*cell, tiles),
                ConstraintOp::Ban(cell, tiles) => solver.ban(*cell, tiles),
            };
            if resolution == Resolution::Contradiction {
                return Err(GenerationError::ContradictionDuringSetup {
                    constraint: group.name.clone(),
                });
            }
        }
        debug!(constraint = group.name.as_str(), ops = group.ops.len(), "applied constraint");
    }
    Ok(())
}

/// First contradicting cell in scan order, else the first undecided one
fn first_unsolved(values: &[CellValue]) -> Option<usize> {
    values
        .iter()
        .position(|value| *value == CellValue::Contradiction)
        .or_else(|| {
            values
                .iter()
                .position(|value| *value == CellValue::Undecided)
        })
}

/// One generation attempt over one exclusively owned solver
pub struct Attempt<'m, 'a, G: Grid, S: Solver<'m>> {
    model: &'m TileModel,
    grid: &'a G,
    constraints: &'a [PlacementConstraint],
    options: &'a GenerationOptions,
    state: PipelineState,
    topology: Option<MaskedTopology>,
    plan: Vec<ConstraintGroup>,
    solver: Option<S>,
    snapshot: Option<RandomState>,
    recent: Vec<usize>,
    steps: usize,
}

impl<'m, 'a, G: Grid, S: Solver<'m>> Attempt<'m, 'a, G, S> {
    /// Prepare an attempt without doing any work
    pub const fn new(
        model: &'m TileModel,
        grid: &'a G,
        constraints: &'a [PlacementConstraint],
        options: &'a GenerationOptions,
    ) -> Self {
        Self {
            model,
            grid,
            constraints,
            options,
            state: PipelineState::Uninitialized,
            topology: None,
            plan: Vec::new(),
            solver: None,
            snapshot: None,
            recent: Vec::new(),
            steps: 0,
        }
    }

    /// Phase the attempt has reached
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Solver owned by the attempt, once created
    pub const fn solver(&self) -> Option<&S> {
        self.solver.as_ref()
    }

    /// Masked topology, once initialized
    pub const fn topology(&self) -> Option<&MaskedTopology> {
        self.topology.as_ref()
    }

    fn expect_state(&self, expected: PipelineState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GenerationError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            })
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = self.state.name(), to = next.name(), "pipeline transition");
        self.state = next;
    }

    fn solver_mut(&mut self) -> Result<&mut S> {
        let actual = self.state.name();
        self.solver.as_mut().ok_or(GenerationError::InvalidState {
            expected: PipelineState::PropagatorCreated.name(),
            actual,
        })
    }

    /// Mask the topology and resolve every constraint into solver operations
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt was already initialized or a constraint
    /// is invalid
    pub fn initialize(&mut self) -> Result<()> {
        self.expect_state(PipelineState::Uninitialized)?;

        let excluded = excluded_cells(self.model, self.grid, self.constraints)?;
        let topology = MaskedTopology::new(self.grid, &excluded);

        let mut plan = resolve_constraints(self.model, self.grid, &topology, self.constraints)?;
        if let Some(skybox) = &self.options.skybox {
            if skybox.layout() != self.grid.face_layout() {
                return Err(configuration_error(&format!(
                    "skybox uses a {:?} pattern on a {:?} grid",
                    skybox.layout(),
                    self.grid.face_layout()
                )));
            }
            plan.push(skybox_ops(self.model, &topology, skybox));
        }
        plan.push(overhang_ops(self.model, &topology));

        debug!(
            cells = topology.cell_count(),
            active = topology.active_count(),
            groups = plan.len(),
            "masked topology"
        );
        self.topology = Some(topology);
        self.plan = plan;
        self.transition(PipelineState::Initialized);
        Ok(())
    }

    fn build_solver(&self) -> Result<S> {
        let topology = self.topology.as_ref().ok_or(GenerationError::InvalidState {
            expected: PipelineState::Initialized.name(),
            actual: self.state.name(),
        })?;
        let solver = S::create(self.model, topology, &self.options.solver_options());
        if solver.status() == Resolution::Contradiction {
            return Err(GenerationError::ContradictionDuringSetup {
                constraint: INITIAL_PROPAGATION.to_string(),
            });
        }
        Ok(solver)
    }

    /// Build the solver over the masked topology
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or if the model has no
    /// solution on this topology even before constraints
    pub fn create_propagator(&mut self) -> Result<()> {
        self.expect_state(PipelineState::Initialized)?;
        self.solver = Some(self.build_solver()?);
        self.transition(PipelineState::PropagatorCreated);
        Ok(())
    }

    /// Apply constraints, then the boundary pattern, then the overhang ban
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or naming the first constraint
    /// group that leaves a cell without candidates
    pub fn set_up(&mut self) -> Result<()> {
        self.expect_state(PipelineState::PropagatorCreated)?;
        let plan = std::mem::take(&mut self.plan);
        let applied = apply_plan(self.solver_mut()?, &plan);
        self.plan = plan;
        applied?;
        self.transition(PipelineState::SetUp);
        Ok(())
    }

    /// Step the solver until it decides or contradicts
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or if the cancellation token
    /// fires
    pub fn run(&mut self) -> Result<Resolution> {
        self.expect_state(PipelineState::SetUp)?;
        self.transition(PipelineState::Running);

        let options = self.options;
        let tracking = options.failure_mode.needs_tracker();
        let mut throttle = ProgressThrottle::new(options.progress.clone(), options.progress_interval);
        let solver = self.solver_mut()?;

        let snapshot = solver.random_state();
        if tracking {
            solver.create_change_tracker();
        }

        let mut steps = 0;
        let mut recent = Vec::new();
        let outcome = loop {
            let status = solver.status();
            if status != Resolution::Undecided {
                break status;
            }
            if options
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                info!(steps, "generation cancelled");
                return Err(GenerationError::Cancelled);
            }
            if options.step_limit > 0 && steps >= options.step_limit {
                warn!(steps, "step limit reached, forcing contradiction");
                solver.force_contradiction();
                continue;
            }

            throttle.report(PROGRESS_LABEL, || solver.progress());
            if tracking {
                solver.drain_changed_indices();
            }
            solver.step();
            steps += 1;
        };
        if tracking {
            recent = solver.drain_changed_indices();
        }
        throttle.finish(PROGRESS_LABEL, solver.progress());

        self.snapshot = Some(snapshot);
        self.recent = recent;
        self.steps = steps;
        self.transition(match outcome {
            Resolution::Decided => PipelineState::Decided,
            _ => PipelineState::Contradiction,
        });
        Ok(outcome)
    }

    /// Fresh solver set up identically and restored to the pre-run random state
    fn replay(&self, selections: &[Selection]) -> Result<S> {
        let mut solver = self.build_solver()?;
        apply_plan(&mut solver, &self.plan)?;
        if let Some(snapshot) = &self.snapshot {
            solver.goto_random_state(snapshot);
        }
        for selection in selections {
            if solver.select_tile(selection.cell, selection.tile) == Resolution::Contradiction {
                break;
            }
        }
        Ok(solver)
    }

    fn minimal_selections(&self, failed: &S) -> Result<Vec<Selection>> {
        let values = failed.to_value_array();
        let mut classified = ClassifiedSelections::classify(&values, &self.recent);
        // The failing observation replays ahead of the other recent cells
        if let Some(observed) = failed
            .last_observation()
            .filter(|observed| self.recent.contains(&observed.cell))
        {
            classified.lead_with(observed);
        }
        let signature = ContradictionSignature::capture(failed, &self.recent);
        let reproduces = |candidate: &[Selection]| {
            self.replay(candidate).is_ok_and(|solver| {
                solver.status() == Resolution::Contradiction
                    && ContradictionSignature::capture(&solver, &self.recent) == signature
            })
        };

        let full = classified.combined();
        if !reproduces(&full) {
            warn!(
                selections = full.len(),
                "replay does not reproduce the contradiction, skipping minimisation"
            );
            return Ok(full);
        }
        let minimal = shrink_selections(full.clone(), reproduces);
        info!(from = full.len(), to = minimal.len(), "minimised counterexample");
        Ok(minimal)
    }

    /// Produce the completion, replaying for recovery when the run failed
    ///
    /// # Errors
    ///
    /// Returns an error if called before the run finished
    pub fn post_process(&mut self) -> Result<Completion> {
        if !matches!(
            self.state,
            PipelineState::Decided | PipelineState::Contradiction
        ) {
            return Err(GenerationError::InvalidState {
                expected: PipelineState::Contradiction.name(),
                actual: self.state.name(),
            });
        }
        let solver = self.solver.as_ref().ok_or(GenerationError::InvalidState {
            expected: PipelineState::PropagatorCreated.name(),
            actual: self.state.name(),
        })?;
        let backtracks = solver.backtrack_count();

        let completion = if self.state == PipelineState::Decided {
            self.completion(true, Some(&solver.to_value_array()), None, Vec::new(), backtracks)
        } else {
            match self.options.failure_mode {
                FailureMode::Cancel => {
                    let location = first_unsolved(&solver.to_value_array())
                        .and_then(|index| self.grid.cell_at(index));
                    self.completion(false, None, location, Vec::new(), backtracks)
                }
                FailureMode::Last => {
                    self.completion(false, Some(&solver.to_value_array()), None, Vec::new(), backtracks)
                }
                FailureMode::LastGood => {
                    let classified =
                        ClassifiedSelections::classify(&solver.to_value_array(), &self.recent);
                    let replayed = self.replay(&classified.stable)?;
                    self.completion(
                        false,
                        Some(&replayed.to_value_array()),
                        None,
                        classified.stable,
                        backtracks,
                    )
                }
                FailureMode::Minimal => {
                    let minimal = self.minimal_selections(solver)?;
                    let replayed = self.replay(&minimal)?;
                    self.completion(false, Some(&replayed.to_value_array()), None, minimal, backtracks)
                }
            }
        };

        self.transition(PipelineState::PostProcessed);
        Ok(completion)
    }

    fn completion(
        &self,
        success: bool,
        values: Option<&[CellValue]>,
        contradiction: Option<Cell>,
        selections: Vec<Selection>,
        backtrack_count: usize,
    ) -> Completion {
        let cells: Vec<Option<ModelTile>> = values
            .unwrap_or_default()
            .iter()
            .map(|value| match value {
                CellValue::Decided(tile) => self.model.tile(*tile).copied(),
                _ => None,
            })
            .collect();

        let placements = cells
            .iter()
            .enumerate()
            .filter_map(|(index, instance)| {
                let instance = (*instance)?;
                let cell = self.grid.cell_at(index)?;
                let name = self
                    .model
                    .definition(instance.tile)
                    .map(|d| d.name().to_string())
                    .unwrap_or_default();
                Some(Placement {
                    cell,
                    index,
                    tile: instance.tile,
                    name,
                    rotation: instance.rotation,
                    offset: instance.offset,
                    origin: sub_cells(
                        cell,
                        self.grid.rotate_offset(instance.rotation, instance.offset),
                    ),
                })
            })
            .collect();

        Completion {
            success,
            cells,
            contradiction,
            selections,
            seed: self.options.seed,
            retries: 0,
            backtrack_count,
            steps: self.steps,
            placements,
        }
    }
}

/// Run one attempt with the reference propagator
///
/// # Errors
///
/// Returns an error if:
/// - A constraint is invalid or contradicts during setup
/// - The cancellation token fires during the run
pub fn run_attempt<G: Grid>(
    model: &TileModel,
    grid: &G,
    constraints: &[PlacementConstraint],
    options: &GenerationOptions,
) -> Result<Completion> {
    run_attempt_with::<G, WavePropagator<'_>>(model, grid, constraints, options)
}

/// Run one attempt with any solver
///
/// A contradiction during the run is not an error: the completion comes back
/// with `success = false` and whatever the failure mode recovered.
///
/// # Errors
///
/// Returns an error if:
/// - A constraint is invalid or contradicts during setup
/// - The cancellation token fires during the run
pub fn run_attempt_with<'m, G: Grid, S: Solver<'m>>(
    model: &'m TileModel,
    grid: &G,
    constraints: &[PlacementConstraint],
    options: &GenerationOptions,
) -> Result<Completion> {
    let mut attempt = Attempt::<G, S>::new(model, grid, constraints, options);
    attempt.initialize()?;
    attempt.create_propagator()?;
    attempt.set_up()?;
    let outcome = attempt.run()?;
    let completion = attempt.post_process()?;
    info!(
        seed = options.seed,
        ?outcome,
        steps = completion.steps,
        backtracks = completion.backtrack_count,
        "attempt finished"
    );
    Ok(completion)
}

/// Run attempts with derived seeds until one succeeds or retries run out
///
/// # Errors
///
/// Returns an error if an attempt fails for any reason other than a
/// contradiction during the run
pub fn generate<G: Grid>(
    model: &TileModel,
    grid: &G,
    constraints: &[PlacementConstraint],
    options: &GenerationOptions,
) -> Result<Completion> {
    generate_with::<G, WavePropagator<'_>>(model, grid, constraints, options)
}

/// Retry loop over any solver
///
/// # Errors
///
/// Returns an error if an attempt fails for any reason other than a
/// contradiction during the run
pub fn generate_with<'m, G: Grid, S: Solver<'m>>(
    model: &'m TileModel,
    grid: &G,
    constraints: &[PlacementConstraint],
    options: &GenerationOptions,
) -> Result<Completion> {
    let mut attempt = 0;
    loop {
        let attempt_options = options
            .clone()
            .with_seed(attempt_seed(options.seed, attempt));
        let mut completion = run_attempt_with::<G, S>(model, grid, constraints, &attempt_options)?;
        completion.retries = attempt;
        if completion.success || attempt >= options.retries {
            return Ok(completion);
        }
        info!(attempt, "contradiction during run, retrying with a derived seed");
        attempt += 1;
    }
}
