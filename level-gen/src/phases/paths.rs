//! Phase 1: route a path through the section grid.

use crate::config::GeneratorConfig;
use crate::context::GenerationContext;
use crate::tiles::SectionType;
use crate::GenerationError;
use log::{debug, error, info, warn};
use rand::Rng;
use std::fmt;
use wfc_rules::Direction;

/// Why a walk ended without reaching the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkFailure {
    /// The direction-draw budget ran out.
    StepBudget(u64),
    /// Every branch from the start was a dead end.
    Exhausted,
}

impl fmt::Display for WalkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepBudget(steps) => write!(f, "exceeded {steps} steps"),
            Self::Exhausted => f.write_str("exhausted every branch"),
        }
    }
}

/// One section on the walk stack.
#[derive(Debug)]
struct Frame {
    section: usize,
    /// Direction of the move that entered this section; `None` for the start.
    entry: Option<Direction>,
    untried: Vec<Direction>,
}

impl Frame {
    fn new(section: usize, entry: Option<Direction>) -> Self {
        Self {
            section,
            entry,
            untried: Direction::CARDINAL.to_vec(),
        }
    }
}

/// Picks a start section, walks to the bottom row and classifies the sections
/// along the way.
///
/// Every section first receives a random type; sections on the final path are
/// then reclassified by the moves that pass through them. The start section is
/// drawn once; if a walk exhausts its step budget the next attempt starts from
/// a freshly drawn top-row section.
pub fn generate_paths(
    ctx: &mut GenerationContext,
    config: &GeneratorConfig,
) -> Result<(), GenerationError> {
    ctx.dims.validate()?;
    let cols = ctx.dims.section_grid_cols;
    let col = ctx.rng.gen_range(0..cols);
    let mut start = ctx.section_id(0, col);

    for id in 0..ctx.dims.num_sections() {
        let section_type = SectionType::ALL[ctx.rng.gen_range(0..SectionType::ALL.len())];
        ctx.set_section_type(id, section_type);
    }

    for attempt in 1..=config.max_path_attempts {
        if attempt > 1 {
            let col = ctx.rng.gen_range(0..cols);
            start = ctx.section_id(0, col);
        }
        match walk(ctx, start, config.max_path_steps) {
            Ok(end) => {
                ctx.start_section = Some(start);
                ctx.end_section = Some(end);
                info!(
                    "Path found on attempt {}: {} sections from {} to {}",
                    attempt,
                    ctx.path.len(),
                    start,
                    end
                );
                return Ok(());
            }
            Err(failure) => warn!(
                "Path attempt {} from section {} {}; restarting",
                attempt, start, failure
            ),
        }
    }

    ctx.path.clear();
    error!(
        "No path found within {} attempts",
        config.max_path_attempts
    );
    Err(GenerationError::PathNotFound {
        attempts: config.max_path_attempts,
    })
}

/// Depth-first walk from `start`. Returns the end section on success; the path
/// is left in `ctx.path`.
fn walk(
    ctx: &mut GenerationContext,
    start: usize,
    max_steps: u64,
) -> Result<usize, WalkFailure> {
    let mut on_path = vec![false; ctx.dims.num_sections()];
    ctx.path.clear();
    ctx.path.push(start);
    on_path[start] = true;

    let mut stack = vec![Frame::new(start, None)];
    let mut steps = 0u64;

    while let Some(frame) = stack.last_mut() {
        if frame.untried.is_empty() {
            // Dead end: backtrack.
            let section = frame.section;
            stack.pop();
            ctx.path.pop();
            on_path[section] = false;
            debug!("Backtracking out of section {}", section);
            continue;
        }

        steps += 1;
        if steps > max_steps {
            return Err(WalkFailure::StepBudget(max_steps));
        }

        let direction = frame
            .untried
            .remove(ctx.rng.gen_range(0..frame.untried.len()));
        let current = frame.section;
        let entry = frame.entry;

        if entry.is_some_and(|e| e.opposite() == direction) {
            continue;
        }
        let bottom = ctx.is_bottom_section_row(current);
        match direction {
            Direction::Up if bottom => continue,
            Direction::Down if bottom => return Ok(current),
            _ => {}
        }
        let Some(next) = ctx.section_neighbor(current, direction) else {
            continue;
        };
        if on_path[next] {
            continue;
        }

        classify(ctx, current, next, direction, entry);
        ctx.path.push(next);
        on_path[next] = true;
        stack.push(Frame::new(next, Some(direction)));
    }

    Err(WalkFailure::Exhausted)
}

/// Assigns section types for a move from `current` to `next`.
fn classify(
    ctx: &mut GenerationContext,
    current: usize,
    next: usize,
    direction: Direction,
    entry: Option<Direction>,
) {
    let (current_type, next_type) = match direction {
        Direction::Left | Direction::Right => {
            let current_type = match entry {
                Some(Direction::Down) => SectionType::Landing,
                Some(Direction::Up) => SectionType::JumpLanding,
                None => SectionType::Drop,
                Some(_) => SectionType::Normal,
            };
            (current_type, SectionType::Normal)
        }
        Direction::Up => (SectionType::Jump, SectionType::JumpLanding),
        Direction::Down => {
            let current_type = if entry == Some(Direction::Down) {
                SectionType::Through
            } else {
                SectionType::Drop
            };
            (current_type, SectionType::JumpLanding)
        }
        // The walk only moves along the four axes.
        _ => return,
    };
    ctx.set_section_type(current, current_type);
    ctx.set_section_type(next, next_type);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{LevelDimensions, SizePreset};

    fn run(seed: u64, dims: LevelDimensions) -> GenerationContext {
        let mut ctx = GenerationContext::new(dims, seed);
        generate_paths(&mut ctx, &GeneratorConfig::default()).unwrap();
        ctx
    }

    fn step_direction(ctx: &GenerationContext, from: usize, to: usize) -> Direction {
        *Direction::CARDINAL
            .iter()
            .find(|&&d| ctx.section_neighbor(from, d) == Some(to))
            .expect("consecutive path sections must be adjacent")
    }

    #[test]
    fn path_runs_from_top_row_to_bottom_row() {
        for seed in 0..50 {
            let ctx = run(seed, SizePreset::Small.dimensions());
            let first = ctx.path[0];
            let last = *ctx.path.last().unwrap();
            assert!(first < 4, "seed {seed}: start {first} not in top row");
            assert!(last >= 12, "seed {seed}: end {last} not in bottom row");
            assert_eq!(ctx.start_section, Some(first));
            assert_eq!(ctx.end_section, Some(last));
        }
    }

    #[test]
    fn move_types_follow_the_walk() {
        for seed in 0..50 {
            let ctx = run(seed, SizePreset::Medium.dimensions());
            for i in 0..ctx.path.len() - 1 {
                let direction = step_direction(&ctx, ctx.path[i], ctx.path[i + 1]);
                let entry = (i > 0).then(|| step_direction(&ctx, ctx.path[i - 1], ctx.path[i]));
                let expected = match (direction, entry) {
                    (Direction::Up, _) => SectionType::Jump,
                    (Direction::Down, Some(Direction::Down)) => SectionType::Through,
                    (Direction::Down, _) => SectionType::Drop,
                    (_, Some(Direction::Down)) => SectionType::Landing,
                    (_, Some(Direction::Up)) => SectionType::JumpLanding,
                    (_, None) => SectionType::Drop,
                    (_, Some(_)) => SectionType::Normal,
                };
                assert_eq!(
                    ctx.section_type(ctx.path[i]),
                    expected,
                    "seed {seed}: section {} moving {direction:?} after {entry:?}",
                    ctx.path[i]
                );
            }
        }
    }

    #[test]
    fn two_row_grid_is_enough() {
        let dims = LevelDimensions {
            section_rows: 2,
            section_cols: 2,
            section_grid_rows: 2,
            section_grid_cols: 1,
        };
        let ctx = run(3, dims);
        assert_eq!(ctx.path, vec![0, 1]);
        assert_eq!(ctx.section_type(0), SectionType::Drop);
        // Entered from above, then the walk ends without another move.
        assert_eq!(ctx.section_type(1), SectionType::JumpLanding);
    }

    #[test]
    fn walk_reports_why_it_failed() {
        let mut ctx = GenerationContext::new(SizePreset::Huge.dimensions(), 4);
        assert_eq!(walk(&mut ctx, 0, 1), Err(WalkFailure::StepBudget(1)));
        assert_eq!(WalkFailure::StepBudget(1).to_string(), "exceeded 1 steps");
        assert_eq!(WalkFailure::Exhausted.to_string(), "exhausted every branch");

        let mut ctx = GenerationContext::new(SizePreset::Small.dimensions(), 4);
        let end = walk(&mut ctx, 2, 100_000).unwrap();
        assert!(ctx.is_bottom_section_row(end));
        assert_eq!(ctx.path.last(), Some(&end));
    }

    #[test]
    fn exhausted_step_budget_fails() {
        let mut ctx = GenerationContext::new(SizePreset::Huge.dimensions(), 1);
        let config = GeneratorConfig {
            max_path_attempts: 3,
            max_path_steps: 1,
            ..GeneratorConfig::default()
        };
        // One draw is never enough to leave the top row of an 8-row grid.
        match generate_paths(&mut ctx, &config) {
            Err(GenerationError::PathNotFound { attempts }) => assert_eq!(attempts, 3),
            other => panic!("Expected PathNotFound, got {other:?}"),
        }
        assert!(ctx.path.is_empty());
    }
}
