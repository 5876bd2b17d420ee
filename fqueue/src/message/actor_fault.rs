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

use acton_ern::Ern;

/// The reason an actor's loop ended.
///
/// Every actor (worker or dispatcher) hands exactly one `ActorFault` to the
/// pipeline's failure handler as it terminates. A deliberate stop arrives through
/// the same channel as a genuine consumer failure; use [`ActorFault::is_shutdown`]
/// to tell them apart.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ActorFault {
    /// The pipeline was destroyed and the actor observed the stop signal.
    #[error("actor {actor} stopped by shutdown signal")]
    Shutdown {
        /// Identifier of the terminated actor.
        actor: Ern,
    },

    /// The consumer returned an error while a batch was being delivered.
    #[error("consumer of actor {actor} failed: {error:#}")]
    Consumer {
        /// Identifier of the terminated actor.
        actor: Ern,
        /// The error returned by the consumer.
        error: anyhow::Error,
    },

    /// The consumer panicked while a batch was being delivered.
    #[error("consumer of actor {actor} panicked: {message}")]
    Panic {
        /// Identifier of the terminated actor.
        actor: Ern,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// Every sender of the actor's mailbox went away without a stop signal.
    #[error("mailbox of actor {actor} closed")]
    MailboxClosed {
        /// Identifier of the terminated actor.
        actor: Ern,
    },
}

impl ActorFault {
    /// Identifier of the actor that terminated.
    #[must_use]
    pub const fn actor(&self) -> &Ern {
        match self {
            Self::Shutdown { actor }
            | Self::Consumer { actor, .. }
            | Self::Panic { actor, .. }
            | Self::MailboxClosed { actor } => actor,
        }
    }

    /// `true` when the actor ended because its pipeline was destroyed.
    #[must_use]
    pub const fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown { .. })
    }

    /// `true` when the consumer failed or panicked.
    #[must_use]
    pub const fn is_consumer_fault(&self) -> bool {
        matches!(self, Self::Consumer { .. } | Self::Panic { .. })
    }

    /// Extracts a readable message from a caught panic payload.
    pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
        payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string())
    }
}
