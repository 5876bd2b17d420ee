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

//! Values exchanged between the pipeline and the code plugged into it.
//!
//! *   [`BatchReason`]: why a batch was flushed to the consumer.
//! *   [`ActorFault`]: why an actor loop ended, handed to the failure handler.
//! *   [`FQueueError`]: configuration errors reported when a pipeline is finalized.

// --- Public Re-exports ---
pub use actor_fault::ActorFault;
pub use batch_reason::BatchReason;
pub use fqueue_error::FQueueError;

// --- Submodules ---

/// Defines [`ActorFault`].
mod actor_fault;
/// Defines [`BatchReason`].
mod batch_reason;
/// Defines [`FQueueError`].
mod fqueue_error;
