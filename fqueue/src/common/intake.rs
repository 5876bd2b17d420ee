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

use std::sync::Arc;
use std::time::Duration;

use acton_ern::Ern;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tracing::{trace, warn};

use crate::common::lifecycle::Lifecycle;
use crate::common::Outbox;
use crate::traits::Element;

/// The entry mailbox of a pipeline: the dispatcher when fan-out is enabled,
/// otherwise the single worker.
///
/// Elements are only accepted while the pipeline is running.
pub(crate) struct Intake<T: Element> {
    pipeline: Ern,
    outbox: Outbox<T>,
    lifecycle: Arc<Lifecycle>,
    send_timeout: Duration,
}

impl<T: Element> Clone for Intake<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            outbox: self.outbox.clone(),
            lifecycle: self.lifecycle.clone(),
            send_timeout: self.send_timeout,
        }
    }
}

impl<T: Element> Intake<T> {
    pub(crate) fn new(
        pipeline: Ern,
        outbox: Outbox<T>,
        lifecycle: Arc<Lifecycle>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            pipeline,
            outbox,
            lifecycle,
            send_timeout,
        }
    }

    /// Waits up to the send timeout for mailbox space. Returns `true` if queued.
    pub(crate) async fn offer(&self, element: T) -> bool {
        if !self.lifecycle.is_running() {
            trace!(pipeline = %self.pipeline, state = %self.lifecycle.state(), "pipeline not running, dropping element");
            return false;
        }

        match self.outbox.send_timeout(element, self.send_timeout).await {
            Ok(()) => true,
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(
                    pipeline = %self.pipeline,
                    timeout_ms = self.send_timeout.as_millis(),
                    "mailbox full, dropping element"
                );
                false
            }
            Err(SendTimeoutError::Closed(_)) => {
                trace!(pipeline = %self.pipeline, "mailbox closed, dropping element");
                false
            }
        }
    }

    /// Queues without waiting. Returns `true` if queued.
    pub(crate) fn try_offer(&self, element: T) -> bool {
        if !self.lifecycle.is_running() {
            trace!(pipeline = %self.pipeline, state = %self.lifecycle.state(), "pipeline not running, dropping element");
            return false;
        }

        match self.outbox.try_send(element) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(pipeline = %self.pipeline, "mailbox full, dropping element");
                false
            }
            Err(TrySendError::Closed(_)) => {
                trace!(pipeline = %self.pipeline, "mailbox closed, dropping element");
                false
            }
        }
    }
}
