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

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use acton_ern::Ern;
use static_assertions::assert_impl_all;

use crate::common::pipeline_control::PipelineControl;
use crate::common::{PipelineHandle, PipelineState};
use crate::traits::Element;

/// A running pipeline for elements of type `T`.
///
/// Returned by [`BatchedFQueueBuilder::consume`](crate::builder::BatchedFQueueBuilder::consume).
/// Elements reach it through [`FQueueRegistry::send_broadcast`](crate::common::FQueueRegistry::send_broadcast);
/// this value only controls the pipeline's lifecycle.
///
/// Dropping an `FQueue` does not stop it: the registry keeps routing to it until
/// [`destroy`](Self::destroy) is called, directly or through
/// [`FQueueRegistry::shutdown_all`](crate::common::FQueueRegistry::shutdown_all).
pub struct FQueue<T: Element> {
    handle: PipelineHandle,
    control: PipelineControl,
    _element: PhantomData<fn(T)>,
}

assert_impl_all!(FQueue<String>: Send, Sync);

impl<T: Element> FQueue<T> {
    pub(crate) const fn new(handle: PipelineHandle, control: PipelineControl) -> Self {
        Self {
            handle,
            control,
            _element: PhantomData,
        }
    }

    /// A read-only handle, the same one consumers receive.
    #[must_use]
    pub fn handle(&self) -> PipelineHandle {
        self.handle.clone()
    }

    /// Unique identifier of the pipeline.
    #[must_use]
    pub fn id(&self) -> &Ern {
        self.handle.id()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.control.state()
    }

    /// Number of workers behind the dispatcher; `0` when fan-out is disabled.
    #[must_use]
    pub const fn fan_out(&self) -> usize {
        self.handle.fan_out()
    }

    /// Signals every actor to stop and returns immediately.
    ///
    /// From this point on broadcasts to the pipeline are dropped. Elements still
    /// buffered in workers are never flushed. Calling it again has no effect.
    pub fn destroy(&self) {
        self.control.destroy();
    }

    /// Signals every actor to stop, then waits until all of them exited or
    /// `timeout` elapsed.
    ///
    /// Returns `true` when every actor exited in time. On `false` the remaining
    /// actors (typically stuck in a consumer) keep running until they observe the
    /// stop signal; nothing is aborted.
    pub async fn destroy_and_await(&self, timeout: Duration) -> bool {
        self.control.destroy();
        self.control.wait_for_exit(timeout).await
    }
}

impl<T: Element> fmt::Debug for FQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FQueue").field("handle", &self.handle).finish()
    }
}
