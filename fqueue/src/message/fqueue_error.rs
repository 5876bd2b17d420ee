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

/// Errors reported when a pipeline is finalized.
///
/// Runtime conditions are never reported through this type: an unmatched
/// broadcast is simply not delivered, and a `destroy_and_await` that runs out of
/// time returns `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FQueueError {
    /// A required builder setting was never provided.
    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),

    /// A builder setting was provided more than once.
    #[error("setting `{0}` was configured more than once")]
    DuplicateSetting(&'static str),

    /// A builder setting has a value the pipeline cannot run with.
    #[error("invalid value for `{setting}`: {reason}")]
    InvalidSetting {
        /// Name of the offending setting.
        setting: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// `consume` was called outside of a Tokio runtime.
    #[error("pipelines must be started from within a Tokio runtime")]
    NoRuntime,

    /// The pipeline or one of its actors could not be given an identifier.
    #[error("could not build identifier: {0}")]
    Identity(String),
}
