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
use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace, warn};

use crate::common::{Inbox, Outbox};
use crate::message::ActorFault;
use crate::traits::Element;

/// Cycles through `0..len` in a fixed order.
#[derive(Debug, Clone)]
pub(crate) struct RoundRobin {
    next: usize,
    len: usize,
}

impl RoundRobin {
    /// `len` must be at least 1.
    pub(crate) const fn new(len: usize) -> Self {
        Self { next: 0, len }
    }

    /// Returns the current index and moves on, whatever happens to the send.
    pub(crate) fn advance(&mut self) -> usize {
        let current = self.next;
        self.next = (self.next + 1) % self.len;
        current
    }
}

/// Entry actor of a fanned-out pipeline: forwards every element to exactly one worker.
pub(crate) struct Dispatcher<T: Element> {
    id: Ern,
    inbox: Inbox<T>,
    children: Vec<Outbox<T>>,
    round_robin: RoundRobin,
    cancellation_token: CancellationToken,
}

impl<T: Element> Dispatcher<T> {
    pub(crate) fn new(
        id: Ern,
        inbox: Inbox<T>,
        children: Vec<Outbox<T>>,
        cancellation_token: CancellationToken,
    ) -> Self {
        let round_robin = RoundRobin::new(children.len());
        Self {
            id,
            inbox,
            children,
            round_robin,
            cancellation_token,
        }
    }

    #[instrument(skip(self), fields(actor = %self.id, workers = self.children.len()))]
    pub(crate) async fn wake(mut self) -> ActorFault {
        let cancel_token = self.cancellation_token.clone();
        let mut cancel = Box::pin(cancel_token.cancelled());

        loop {
            tokio::select! {
                biased;

                () = &mut cancel => {
                    trace!("stop signal received");
                    return ActorFault::Shutdown { actor: self.id };
                }

                incoming = self.inbox.recv() => {
                    let Some(element) = incoming else {
                        trace!("every sender dropped");
                        return ActorFault::MailboxClosed { actor: self.id };
                    };

                    let worker = self.round_robin.advance();
                    let child = &self.children[worker];
                    // A full worker mailbox must not hide the stop signal.
                    tokio::select! {
                        biased;

                        () = &mut cancel => {
                            trace!(worker, "stop signal received while forwarding");
                            return ActorFault::Shutdown { actor: self.id };
                        }

                        sent = child.send(element) => {
                            if sent.is_err() {
                                warn!(worker, "worker mailbox closed, dropping element");
                            }
                        }
                    }
                }
            }
        }
    }
}
