// Depth controller - adapts the search depth to the per-move time budget
//
// The controller only sees how long the previous search took and whether it
// explored every root branch. Its state is a small `Copy` value advanced by
// `next_state`, so a sequence of timings replays deterministically.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// How to shrink the depth after a search ran over budget
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// `max(1, depth / 2)`
    #[default]
    Halve,
    /// `max(1, depth - k)`
    Decrement(i32),
}

impl Backoff {
    fn apply(self, depth: i32) -> i32 {
        match self {
            Backoff::Halve => (depth / 2).max(1),
            Backoff::Decrement(step) => (depth - step).max(1),
        }
    }
}

/// Static depth and timing limits of one agent. Durations are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLimits {
    pub initial_depth: i32,
    pub first_move_depth: i32,
    pub max_depth: i32,
    /// Cap while fewer than `early_moves` moves have been made
    pub early_max_depth: i32,
    pub early_moves: u32,
    pub max_time_ms: u64,
    pub buffer_time_ms: u64,
    pub first_move_time_ms: u64,
    #[serde(default)]
    pub backoff: Backoff,
    /// Only deepen after a search that reached a heuristic value on every root branch
    #[serde(default)]
    pub grow_requires_full_simulation: bool,
}

impl Default for DepthLimits {
    fn default() -> Self {
        DepthLimits {
            initial_depth: 9,
            first_move_depth: 10,
            max_depth: 10,
            early_max_depth: 10,
            early_moves: 8,
            max_time_ms: 700,
            buffer_time_ms: 100,
            first_move_time_ms: 700,
            backoff: Backoff::Halve,
            grow_requires_full_simulation: false,
        }
    }
}

impl DepthLimits {
    pub fn max_time(&self) -> Duration {
        Duration::from_millis(self.max_time_ms)
    }

    pub fn buffer_time(&self) -> Duration {
        Duration::from_millis(self.buffer_time_ms)
    }

    pub fn first_move_time(&self) -> Duration {
        Duration::from_millis(self.first_move_time_ms)
    }

    /// Depth cap in force after `moves_made` moves
    pub fn cap(&self, moves_made: u32) -> i32 {
        if moves_made < self.early_moves {
            self.early_max_depth
        } else {
            self.max_depth
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_depth < 1 {
            return Err(ConfigError::depth_limits(format!(
                "initial depth {} is below 1",
                self.initial_depth
            )));
        }
        if self.initial_depth > self.early_max_depth {
            return Err(ConfigError::depth_limits(format!(
                "initial depth {} exceeds early cap {}",
                self.initial_depth, self.early_max_depth
            )));
        }
        if self.early_max_depth > self.max_depth {
            return Err(ConfigError::depth_limits(format!(
                "early cap {} exceeds max depth {}",
                self.early_max_depth, self.max_depth
            )));
        }
        if self.first_move_depth < 1 {
            return Err(ConfigError::depth_limits(format!(
                "first move depth {} is below 1",
                self.first_move_depth
            )));
        }
        if let Backoff::Decrement(step) = self.backoff {
            if step < 1 {
                return Err(ConfigError::depth_limits(format!(
                    "backoff step {step} is below 1"
                )));
            }
        }
        if self.buffer_time_ms >= self.max_time_ms {
            return Err(ConfigError::timing(format!(
                "buffer of {}ms leaves nothing of the {}ms budget",
                self.buffer_time_ms, self.max_time_ms
            )));
        }
        if self.first_move_time_ms == 0 {
            return Err(ConfigError::timing("first move budget is zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub moves_made: u32,
    pub depth: i32,
}

impl ControllerState {
    pub fn initial(limits: &DepthLimits) -> Self {
        ControllerState {
            moves_made: 0,
            depth: limits.initial_depth,
        }
    }
}

/// Depth for the next search given how the last one went
pub fn next_state(
    limits: &DepthLimits,
    state: ControllerState,
    elapsed: Duration,
    full_simulation: bool,
) -> ControllerState {
    let cap = limits.cap(state.moves_made);
    let depth = if elapsed >= limits.max_time() {
        limits.backoff.apply(state.depth)
    } else {
        let may_grow = !limits.grow_requires_full_simulation || full_simulation;
        if may_grow && elapsed + limits.buffer_time() < limits.max_time() && state.depth < cap {
            state.depth + 1
        } else {
            state.depth
        }
    };

    ControllerState {
        depth: depth.clamp(1, cap.max(1)),
        ..state
    }
}

#[derive(Debug, Clone)]
pub struct DepthController {
    limits: DepthLimits,
    state: ControllerState,
}

impl DepthController {
    pub fn new(limits: DepthLimits) -> Self {
        DepthController {
            state: ControllerState::initial(&limits),
            limits,
        }
    }

    pub fn limits(&self) -> &DepthLimits {
        &self.limits
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn moves_made(&self) -> u32 {
        self.state.moves_made
    }

    pub fn is_first_move(&self) -> bool {
        self.state.moves_made == 0
    }

    pub fn depth_for_turn(&self) -> i32 {
        if self.is_first_move() {
            self.limits.first_move_depth
        } else {
            self.state.depth
        }
    }

    /// Feed back the timing of the last search
    pub fn record(&mut self, elapsed: Duration, full_simulation: bool) {
        let next = next_state(&self.limits, self.state, elapsed, full_simulation);
        if next.depth != self.state.depth {
            debug!(
                "Depth {} -> {} after {}ms (full simulation: {})",
                self.state.depth,
                next.depth,
                elapsed.as_millis(),
                full_simulation
            );
        }
        self.state = next;
    }

    pub fn advance(&mut self) {
        self.state.moves_made += 1;
    }

    pub fn reset(&mut self) {
        self.state = ControllerState::initial(&self.limits);
    }
}
