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

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use static_assertions::assert_impl_all;
use tracing::{debug, instrument, trace};

use crate::builder::FQueueBuilder;
use crate::common::config::{FQueueConfig, CONFIG};
use crate::common::intake::Intake;
use crate::common::pipeline_control::PipelineControl;
use crate::traits::Element;

/// One registered pipeline: its typed intake (erased) and its control half.
#[derive(Debug, Clone)]
pub(crate) struct Route {
    pub(crate) control: PipelineControl,
    intake: Arc<dyn Any + Send + Sync>,
}

/// Crate-internal: element `TypeId` → pipelines registered for it.
pub(crate) type RouteTable = DashMap<TypeId, Vec<Route>>;

/// Routes broadcast elements to the pipelines registered for their type.
///
/// The registry is an ordinary value: build one per application (or per test)
/// and clone it freely; clones share the same routing table. Pipelines are
/// created through [`FQueueRegistry::build_fqueue`] and register themselves when
/// their builder is finalized.
///
/// Several pipelines may be registered for one type; a broadcast reaches all of
/// them. A type with no pipeline silently swallows its broadcasts.
#[derive(Clone)]
pub struct FQueueRegistry {
    routes: Arc<RouteTable>,
    config: Arc<FQueueConfig>,
    next_serial: Arc<AtomicU64>,
}

assert_impl_all!(FQueueRegistry: Send, Sync, Clone);

impl Default for FQueueRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FQueueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FQueueRegistry")
            .field("element_types", &self.routes.len())
            .field("config", &self.config)
            .finish()
    }
}

impl FQueueRegistry {
    /// Creates an empty registry using the global [`CONFIG`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CONFIG.clone())
    }

    /// Creates an empty registry with an explicit configuration.
    #[must_use]
    pub fn with_config(config: FQueueConfig) -> Self {
        Self {
            routes: Arc::new(DashMap::new()),
            config: Arc::new(config),
            next_serial: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configuration pipelines built from this registry start with.
    #[must_use]
    pub fn config(&self) -> &FQueueConfig {
        &self.config
    }

    /// Starts building a pipeline for elements of type `T`.
    ///
    /// The pipeline is registered under `T` when the builder is finalized with
    /// [`consume`](crate::builder::BatchedFQueueBuilder::consume).
    #[must_use]
    pub fn build_fqueue<T: Element>(&self) -> FQueueBuilder<T> {
        FQueueBuilder::new(self.clone())
    }

    /// Hands `element` to every running pipeline registered for `T`.
    ///
    /// Waits up to `timeouts.broadcast_send_timeout_ms` for space in each full
    /// mailbox; a pipeline whose mailbox stays full loses the element. Returns the
    /// number of pipelines that accepted it (`0` when no pipeline matched).
    #[instrument(skip(self, element), fields(element_type = type_name::<T>()))]
    pub async fn send_broadcast<T: Element>(&self, element: T) -> usize {
        let intakes = self.intakes_for::<T>();
        let Some((last, rest)) = intakes.split_last() else {
            trace!("no pipeline registered, dropping element");
            return 0;
        };

        let mut sends: Vec<_> = rest
            .iter()
            .map(|intake| intake.offer(element.clone()))
            .collect();
        sends.push(last.offer(element));

        let accepted = join_all(sends).await.into_iter().filter(|queued| *queued).count();
        trace!(accepted, pipelines = intakes.len(), "broadcast handed off");
        accepted
    }

    /// Like [`send_broadcast`](Self::send_broadcast) but never waits: a full
    /// mailbox drops the element for that pipeline.
    ///
    /// Usable from synchronous producers.
    pub fn try_send_broadcast<T: Element>(&self, element: T) -> usize {
        let intakes = self.intakes_for::<T>();
        let Some((last, rest)) = intakes.split_last() else {
            trace!(element_type = type_name::<T>(), "no pipeline registered, dropping element");
            return 0;
        };

        let mut accepted = rest
            .iter()
            .filter(|intake| intake.try_offer(element.clone()))
            .count();
        if last.try_offer(element) {
            accepted += 1;
        }
        accepted
    }

    /// Number of live pipelines registered for `T`.
    #[must_use]
    pub fn pipeline_count<T: Element>(&self) -> usize {
        self.routes
            .get(&TypeId::of::<T>())
            .map_or(0, |registered| registered.len())
    }

    /// `true` when no pipeline is registered for any type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Destroys every registered pipeline and waits for all of them within one
    /// shared `timeout`.
    ///
    /// Returns `true` when every actor of every pipeline exited in time.
    #[instrument(skip(self))]
    pub async fn shutdown_all(&self, timeout: Duration) -> bool {
        // Collect first: destroying a pipeline mutates the routing table.
        let controls: Vec<PipelineControl> = self
            .routes
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .map(|route| route.control.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(pipelines = controls.len(), "shutting down registry");
        for control in &controls {
            control.destroy();
        }

        let waits = controls.iter().map(|control| control.wait_for_exit(timeout));
        join_all(waits).await.into_iter().all(|exited| exited)
    }

    /// [`shutdown_all`](Self::shutdown_all) with the configured
    /// `timeouts.shutdown_timeout_ms` budget.
    pub async fn shutdown(&self) -> bool {
        self.shutdown_all(self.config.shutdown_timeout()).await
    }

    pub(crate) fn next_serial(&self) -> u64 {
        self.next_serial.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn route_table(&self) -> Weak<RouteTable> {
        Arc::downgrade(&self.routes)
    }

    pub(crate) fn register<T: Element>(&self, control: PipelineControl, intake: Intake<T>) {
        trace!(element_type = type_name::<T>(), serial = control.serial(), "registering pipeline");
        self.routes
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Route {
                control,
                intake: Arc::new(intake),
            });
    }

    fn intakes_for<T: Element>(&self) -> Vec<Intake<T>> {
        self.routes
            .get(&TypeId::of::<T>())
            .map(|registered| {
                registered
                    .iter()
                    .filter_map(|route| (*route.intake).downcast_ref::<Intake<T>>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}
