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

//! The actors behind a pipeline and the helper that runs them.
//!
//! Each actor is one task on the pipeline's [`TaskTracker`]. Its loop returns the
//! [`ActorFault`] that ended it; [`spawn_actor`] reports that fault to the
//! failure handler exactly once and then updates the pipeline's lifecycle.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use acton_ern::Ern;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

use crate::common::{FailureHandler, Lifecycle};
use crate::message::ActorFault;

pub(crate) use accumulator::BatchAccumulator;
pub(crate) use dispatcher::Dispatcher;
pub(crate) use worker::Worker;

mod accumulator;
mod dispatcher;
mod worker;

/// Spawns one actor loop on `runtime`, tracked by `tracker`.
///
/// Panics escaping the loop are reported as [`ActorFault::Panic`]; a panicking
/// failure handler is logged and otherwise ignored.
pub(crate) fn spawn_actor<F>(
    tracker: &TaskTracker,
    runtime: &Handle,
    id: Ern,
    lifecycle: Arc<Lifecycle>,
    on_failure: Option<FailureHandler>,
    actor_loop: F,
) where
    F: Future<Output = ActorFault> + Send + 'static,
{
    lifecycle.actor_spawned();
    tracker.spawn_on(
        async move {
            let fault = match AssertUnwindSafe(actor_loop).catch_unwind().await {
                Ok(fault) => fault,
                Err(payload) => ActorFault::Panic {
                    actor: id,
                    message: ActorFault::panic_message(&*payload),
                },
            };

            if fault.is_shutdown() {
                debug!(actor = %fault.actor(), "actor stopped");
            } else if fault.is_consumer_fault() {
                error!(actor = %fault.actor(), %fault, "actor terminated by its consumer");
            } else {
                warn!(actor = %fault.actor(), %fault, "actor terminated");
            }

            if let Some(on_failure) = on_failure {
                if std::panic::catch_unwind(AssertUnwindSafe(|| on_failure(&fault))).is_err() {
                    error!(actor = %fault.actor(), "failure handler panicked");
                }
            }

            lifecycle.actor_exited();
        },
        runtime,
    );
}
