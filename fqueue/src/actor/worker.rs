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

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use acton_ern::Ern;
use futures::FutureExt;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::actor::accumulator::{Accumulated, BatchAccumulator, Tick};
use crate::common::{BoxedConsumer, Inbox, NoopHandler, PipelineHandle};
use crate::message::{ActorFault, BatchReason};
use crate::traits::Element;

/// One batching actor: a mailbox, an accumulator, a flush timer and its own consumer.
///
/// Every event is handled to completion before the next one is looked at, so the
/// accumulator needs no locking.
pub(crate) struct Worker<T: Element> {
    id: Ern,
    inbox: Inbox<T>,
    accumulator: BatchAccumulator<T>,
    consumer: BoxedConsumer<T>,
    pipeline: PipelineHandle,
    flush_interval: Duration,
    on_noop: Option<NoopHandler>,
    cancellation_token: CancellationToken,
}

impl<T: Element> Worker<T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: Ern,
        inbox: Inbox<T>,
        accumulator: BatchAccumulator<T>,
        consumer: BoxedConsumer<T>,
        pipeline: PipelineHandle,
        flush_interval: Duration,
        on_noop: Option<NoopHandler>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            id,
            inbox,
            accumulator,
            consumer,
            pipeline,
            flush_interval,
            on_noop,
            cancellation_token,
        }
    }

    /// Runs the event loop until the stop signal or a fault, and returns why it ended.
    #[instrument(skip(self), fields(actor = %self.id))]
    pub(crate) async fn wake(mut self) -> ActorFault {
        let cancel_token = self.cancellation_token.clone();
        let mut cancel = Box::pin(cancel_token.cancelled());
        let mut next_tick = self.next_tick();

        loop {
            tokio::select! {
                biased;

                () = &mut cancel => {
                    let dropped = self.accumulator.discard();
                    trace!(dropped, "stop signal received, unflushed elements dropped");
                    return ActorFault::Shutdown { actor: self.id };
                }

                () = sleep_until(next_tick) => {
                    match self.accumulator.on_timer_tick() {
                        Tick::Flush(batch) => {
                            if let Err(fault) = self.deliver(BatchReason::TimeFlush, batch).await {
                                return fault;
                            }
                        }
                        Tick::Idle => {
                            trace!("flush interval elapsed with nothing buffered");
                            if let Some(on_noop) = &self.on_noop {
                                on_noop();
                            }
                        }
                    }
                    next_tick = self.next_tick();
                }

                incoming = self.inbox.recv() => {
                    let Some(element) = incoming else {
                        trace!("every sender dropped");
                        return ActorFault::MailboxClosed { actor: self.id };
                    };
                    match self.accumulator.add(element) {
                        Accumulated::Flush { reason, batch } => {
                            if let Err(fault) = self.deliver(reason, batch).await {
                                return fault;
                            }
                            next_tick = self.next_tick();
                        }
                        Accumulated::Pending => {
                            trace!(
                                buffered = self.accumulator.len(),
                                weight = self.accumulator.weight(),
                                "element buffered"
                            );
                        }
                    }
                }
            }
        }
    }

    /// Hands one batch to the consumer, turning an error or a panic into the actor's fault.
    async fn deliver(&mut self, reason: BatchReason, batch: Vec<T>) -> Result<(), ActorFault> {
        debug!(%reason, size = batch.len(), "delivering batch");
        let outcome = AssertUnwindSafe(self.consumer.consume(&self.pipeline, reason, batch))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(ActorFault::Consumer {
                actor: self.id.clone(),
                error,
            }),
            Err(payload) => Err(ActorFault::Panic {
                actor: self.id.clone(),
                message: ActorFault::panic_message(&*payload),
            }),
        }
    }

    fn next_tick(&self) -> Instant {
        let now = Instant::now();
        now.checked_add(self.flush_interval)
            .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365))
    }
}
