/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use tracing::debug;

/// Lifecycle state of a pipeline.
///
/// States only move forward: `Starting → Running → Destroying → Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PipelineState {
    /// Actors are being spawned; broadcasts are not accepted yet.
    Starting = 0,
    /// Every actor was spawned; broadcasts are accepted.
    Running = 1,
    /// `destroy` was called; actors are stopping and broadcasts are dropped.
    Destroying = 2,
    /// Every actor loop has exited.
    Destroyed = 3,
}

impl PipelineState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Starting,
            1 => Self::Running,
            2 => Self::Destroying,
            _ => Self::Destroyed,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Destroying => write!(f, "destroying"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// Shared lifecycle bookkeeping for one pipeline.
///
/// Read by intakes on every broadcast and by handles; written by the pipeline
/// and by each actor as it exits.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: AtomicU8,
    live_actors: AtomicUsize,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: AtomicU8::new(PipelineState::Starting as u8),
            live_actors: AtomicUsize::new(0),
        }
    }
}

impl Lifecycle {
    pub(crate) fn state(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state() == PipelineState::Running
    }

    pub(crate) fn live_actors(&self) -> usize {
        self.live_actors.load(Ordering::Acquire)
    }

    /// Moves `from → to` if the pipeline is still in `from`.
    fn advance(&self, from: PipelineState, to: PipelineState) -> bool {
        let advanced = self
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if advanced {
            debug!(%from, %to, "pipeline state changed");
        }
        advanced
    }

    pub(crate) fn actor_spawned(&self) {
        self.live_actors.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn mark_running(&self) -> bool {
        self.advance(PipelineState::Starting, PipelineState::Running)
    }

    /// Returns `false` when the pipeline was already being destroyed.
    pub(crate) fn begin_destroy(&self) -> bool {
        let started = self.advance(PipelineState::Running, PipelineState::Destroying);
        if started && self.live_actors() == 0 {
            // Every actor already stopped on its own (consumer faults).
            self.advance(PipelineState::Destroying, PipelineState::Destroyed);
        }
        started
    }

    /// Called once by each actor as its task ends.
    pub(crate) fn actor_exited(&self) {
        let previous = self.live_actors.fetch_sub(1, Ordering::AcqRel);
        if previous == 1 {
            self.advance(PipelineState::Destroying, PipelineState::Destroyed);
        }
    }
}
