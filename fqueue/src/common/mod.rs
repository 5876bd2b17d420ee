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

//! Provides the registry, pipeline and lifecycle types, plus the configuration
//! system.
//!
//! # Key Re-exported Components:
//!
//! *   [`FQueueRegistry`]: routes broadcast elements to pipelines by type.
//! *   [`FQueue`]: a running pipeline and its lifecycle controls.
//! *   [`PipelineHandle`]: the read-only view consumers receive.
//! *   [`PipelineState`]: `Starting → Running → Destroying → Destroyed`.

// --- Public Re-exports ---
pub use fqueue::FQueue;
pub use lifecycle::PipelineState;
pub use pipeline_handle::PipelineHandle;
pub use registry::FQueueRegistry;

// --- Crate-Internal Re-exports ---
pub(crate) use intake::Intake;
pub(crate) use lifecycle::Lifecycle;
pub(crate) use pipeline_control::PipelineControl;
pub(crate) use types::*;

// --- Submodules ---

/// Crate-internal type aliases.
mod types;

/// Defines the [`FQueue`] pipeline type.
mod fqueue;
/// Entry mailbox of a pipeline.
mod intake;
/// Lifecycle states and live-actor bookkeeping.
mod lifecycle;
/// Stop signal, task tracking and registry membership of a pipeline.
mod pipeline_control;
/// Defines [`PipelineHandle`].
mod pipeline_handle;
/// Defines [`FQueueRegistry`].
mod registry;
/// Defines the configuration system.
pub mod config;
