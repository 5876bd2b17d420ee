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
use std::sync::Arc;

use acton_ern::Ern;

use crate::common::lifecycle::Lifecycle;
use crate::common::PipelineState;

/// A read-only view of a pipeline, handed to consumers with every batch.
///
/// Useful for diagnostics and for telling pipelines apart when one consumer type
/// serves several of them. It exposes nothing that could reconfigure the pipeline.
#[derive(Clone)]
pub struct PipelineHandle {
    id: Ern,
    name: Arc<str>,
    element_type: &'static str,
    fan_out: usize,
    lifecycle: Arc<Lifecycle>,
}

impl PipelineHandle {
    pub(crate) fn new(
        id: Ern,
        name: &str,
        element_type: &'static str,
        fan_out: usize,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            id,
            name: Arc::from(name),
            element_type,
            fan_out,
            lifecycle,
        }
    }

    /// Unique identifier of the pipeline.
    #[must_use]
    pub fn id(&self) -> &Ern {
        &self.id
    }

    /// The name the pipeline was built with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type name of the elements this pipeline receives.
    #[must_use]
    pub const fn element_type(&self) -> &'static str {
        self.element_type
    }

    /// Number of workers behind the dispatcher; `0` when fan-out is disabled.
    #[must_use]
    pub const fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.lifecycle.state()
    }

    /// `true` while the pipeline accepts broadcasts.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// Number of actor loops that have not exited yet.
    #[must_use]
    pub fn live_actors(&self) -> usize {
        self.lifecycle.live_actors()
    }
}

impl fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("element_type", &self.element_type)
            .field("fan_out", &self.fan_out)
            .field("state", &self.state())
            .finish()
    }
}
