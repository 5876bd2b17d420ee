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

//! Crate-internal type aliases for the callbacks and channels wired into a pipeline.

use std::sync::Arc;

use tokio::sync::mpsc::{Receiver, Sender};

use crate::message::ActorFault;
use crate::traits::Consumer;

/// Crate-internal: Called once per actor as its loop ends.
pub(crate) type FailureHandler = Arc<dyn Fn(&ActorFault) + Send + Sync + 'static>;

/// Crate-internal: Called when a flush timer fires on an empty buffer.
pub(crate) type NoopHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Crate-internal: Maps an element to its contribution towards the chunk size.
pub(crate) type WeightFn<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync + 'static>;

/// Crate-internal: The consumer owned by one worker.
pub(crate) type BoxedConsumer<T> = Box<dyn Consumer<T>>;

/// Crate-internal: Sending half of an actor mailbox.
pub(crate) type Outbox<T> = Sender<T>;

/// Crate-internal: Receiving half of an actor mailbox.
pub(crate) type Inbox<T> = Receiver<T>;
