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

use std::any::TypeId;
use std::sync::{Arc, Weak};
use std::time::Duration;

use acton_ern::Ern;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, instrument, trace, warn};

use crate::common::lifecycle::Lifecycle;
use crate::common::registry::RouteTable;
use crate::common::PipelineState;

/// The element-type-independent half of a pipeline: stop signal, task tracking
/// and registry membership.
///
/// The registry keeps one per route so it can tear pipelines down without
/// knowing their element type.
#[derive(Debug, Clone)]
pub(crate) struct PipelineControl {
    serial: u64,
    id: Ern,
    element_type: TypeId,
    lifecycle: Arc<Lifecycle>,
    cancellation_token: CancellationToken,
    tracker: TaskTracker,
    routes: Weak<RouteTable>,
}

impl PipelineControl {
    pub(crate) fn new(
        serial: u64,
        id: Ern,
        element_type: TypeId,
        lifecycle: Arc<Lifecycle>,
        cancellation_token: CancellationToken,
        tracker: TaskTracker,
        routes: Weak<RouteTable>,
    ) -> Self {
        Self {
            serial,
            id,
            element_type,
            lifecycle,
            cancellation_token,
            tracker,
            routes,
        }
    }

    pub(crate) const fn serial(&self) -> u64 {
        self.serial
    }

    pub(crate) fn state(&self) -> PipelineState {
        self.lifecycle.state()
    }

    /// Signals every actor to stop and leaves the routing table. Returns at once.
    #[instrument(skip(self), fields(pipeline = %self.id))]
    pub(crate) fn destroy(&self) {
        if self.lifecycle.begin_destroy() {
            debug!(
                live_actors = self.lifecycle.live_actors(),
                "signalling stop to every actor"
            );
            self.cancellation_token.cancel();
            self.leave_routes();
        } else {
            trace!(state = %self.lifecycle.state(), "destroy already requested");
        }
    }

    /// Waits until every actor task has exited, or `timeout` elapsed.
    ///
    /// Returns `true` on full termination. Actors still running at the deadline
    /// are left alone.
    #[instrument(skip(self), fields(pipeline = %self.id))]
    pub(crate) async fn wait_for_exit(&self, timeout: Duration) -> bool {
        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok() {
            trace!("every actor exited");
            true
        } else {
            warn!(
                timeout_ms = timeout.as_millis(),
                live_actors = self.lifecycle.live_actors(),
                "actors still running after the await budget"
            );
            false
        }
    }

    fn leave_routes(&self) {
        let Some(routes) = self.routes.upgrade() else {
            return;
        };
        if let Some(mut registered) = routes.get_mut(&self.element_type) {
            registered.retain(|route| route.control.serial() != self.serial);
        }
        routes.remove_if(&self.element_type, |_, registered| registered.is_empty());
    }
}
