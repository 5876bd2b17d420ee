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

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::builder::{BatchBuilder, Setting};
use crate::common::{FQueueRegistry, FailureHandler, NoopHandler};
use crate::message::ActorFault;
use crate::traits::Element;

/// First stage of the pipeline builder: settings that apply to the whole pipeline.
///
/// Obtained from [`FQueueRegistry::build_fqueue`]. Every setter may be called at
/// most once; call [`batch`](Self::batch) to configure batching.
#[must_use = "a builder does nothing until `consume` is called"]
pub struct FQueueBuilder<T: Element> {
    pub(crate) registry: FQueueRegistry,
    pub(crate) name: Setting<String>,
    pub(crate) fan_out: Setting<usize>,
    pub(crate) on_failure: Setting<FailureHandler>,
    pub(crate) on_noop: Setting<NoopHandler>,
    pub(crate) mailbox_capacity: Setting<usize>,
    _element: PhantomData<fn(T)>,
}

impl<T: Element> FQueueBuilder<T> {
    pub(crate) fn new(registry: FQueueRegistry) -> Self {
        Self {
            registry,
            name: Setting::new("name"),
            fan_out: Setting::new("fan_out"),
            on_failure: Setting::new("failure_handler"),
            on_noop: Setting::new("noop_handler"),
            mailbox_capacity: Setting::new("mailbox_capacity"),
            _element: PhantomData,
        }
    }

    /// Names the pipeline. The name shows up in actor identifiers and logs.
    ///
    /// Defaults to `defaults.pipeline_name` from the configuration. Names are 1 to 63
    /// alphanumerics, `-` or `_`, and may not start or end with `-` or `_`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name.set(name.into());
        self
    }

    /// Spreads elements round-robin over `workers` workers behind a dispatcher.
    ///
    /// `0` (the default) runs a single worker with no dispatcher.
    pub fn fan_out(mut self, workers: usize) -> Self {
        self.fan_out.set(workers);
        self
    }

    /// Called once per actor when its loop ends, with the reason it ended.
    ///
    /// A pipeline with fan-out `N` has `N + 1` actors, so a full shutdown calls the
    /// handler `N + 1` times.
    pub fn with_failure_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ActorFault) + Send + Sync + 'static,
    {
        self.on_failure.set(Arc::new(handler));
        self
    }

    /// Called every time a worker's flush interval elapses with nothing buffered.
    pub fn with_noop_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_noop.set(Arc::new(handler));
        self
    }

    /// Overrides `limits.mailbox_capacity` for every actor of this pipeline.
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity.set(capacity);
        self
    }

    /// Moves on to the batching settings.
    pub fn batch(self) -> BatchBuilder<T> {
        BatchBuilder::new(self)
    }
}

impl<T: Element> fmt::Debug for FQueueBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FQueueBuilder")
            .field("element_type", &type_name::<T>())
            .field("name", &self.name.is_set())
            .field("fan_out", &self.fan_out.is_set())
            .field("failure_handler", &self.on_failure.is_set())
            .field("noop_handler", &self.on_noop.is_set())
            .field("mailbox_capacity", &self.mailbox_capacity.is_set())
            .finish()
    }
}
