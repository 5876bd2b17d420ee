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

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use acton_ern::prelude::{Account, Category, Domain, EntityRoot, Ern, ErnBuilder, ErnError, Part};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, instrument};

use crate::actor::{spawn_actor, BatchAccumulator, Dispatcher, Worker};
use crate::builder::{FQueueBuilder, Setting};
use crate::common::{FQueue, Intake, Lifecycle, PipelineControl, PipelineHandle, WeightFn};
use crate::message::FQueueError;
use crate::traits::{Consumer, Element};

/// Second stage of the pipeline builder: when batches flush.
///
/// [`with_chunk_size`](Self::with_chunk_size) and
/// [`with_flush_interval`](Self::with_flush_interval) are required.
#[must_use = "a builder does nothing until `consume` is called"]
pub struct BatchBuilder<T: Element> {
    pipeline: FQueueBuilder<T>,
    chunk_size: Setting<u64>,
    flush_interval: Setting<Duration>,
    weight_fn: Setting<WeightFn<T>>,
}

impl<T: Element> BatchBuilder<T> {
    pub(crate) const fn new(pipeline: FQueueBuilder<T>) -> Self {
        Self {
            pipeline,
            chunk_size: Setting::new("chunk_size"),
            flush_interval: Setting::new("flush_interval"),
            weight_fn: Setting::new("weight_fn"),
        }
    }

    /// A batch flushes as soon as the summed weight of its elements reaches `chunk_size`.
    ///
    /// Must be at least 1.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size.set(chunk_size);
        self
    }

    /// A non-empty batch flushes once this much time passed since the last flush.
    ///
    /// Must be greater than zero.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval.set(interval);
        self
    }

    /// Weight of one element. Defaults to 1, making the chunk size an element count.
    pub fn with_weight_fn<F>(mut self, weigh: F) -> Self
    where
        F: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        self.weight_fn.set(Arc::new(weigh));
        self
    }

    /// Closes the batching stage.
    pub fn done(self) -> BatchedFQueueBuilder<T> {
        BatchedFQueueBuilder { batch: self }
    }
}

impl<T: Element> fmt::Debug for BatchBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchBuilder")
            .field("pipeline", &self.pipeline)
            .field("chunk_size", &self.chunk_size.is_set())
            .field("flush_interval", &self.flush_interval.is_set())
            .field("weight_fn", &self.weight_fn.is_set())
            .finish()
    }
}

/// Final stage of the pipeline builder.
#[must_use = "a builder does nothing until `consume` is called"]
pub struct BatchedFQueueBuilder<T: Element> {
    batch: BatchBuilder<T>,
}

impl<T: Element> fmt::Debug for BatchedFQueueBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchedFQueueBuilder")
            .field("batch", &self.batch)
            .finish()
    }
}

/// Builder settings after validation.
struct PipelineSettings<T> {
    name: String,
    fan_out: usize,
    mailbox_capacity: usize,
    chunk_size: u64,
    flush_interval: Duration,
    weight_fn: WeightFn<T>,
}

impl<T: Element> BatchedFQueueBuilder<T> {
    /// Starts the pipeline and registers it for elements of type `T`.
    ///
    /// `factory` is called once per worker; each worker owns the consumer it gets.
    ///
    /// # Errors
    ///
    /// * [`FQueueError::MissingSetting`] when the chunk size or flush interval was
    ///   never given.
    /// * [`FQueueError::DuplicateSetting`] when a setter was called twice.
    /// * [`FQueueError::InvalidSetting`] for a zero chunk size, flush interval or
    ///   mailbox capacity.
    /// * [`FQueueError::NoRuntime`] outside of a Tokio runtime.
    /// * [`FQueueError::Identity`] when the pipeline name is not a valid identifier
    ///   (see [`FQueueBuilder::named`]).
    ///
    /// Nothing is spawned or registered when an error is returned.
    #[instrument(skip_all, fields(element_type = type_name::<T>()))]
    pub fn consume<C, F>(self, mut factory: F) -> Result<FQueue<T>, FQueueError>
    where
        C: Consumer<T>,
        F: FnMut() -> C,
    {
        let BatchBuilder {
            pipeline,
            chunk_size,
            flush_interval,
            weight_fn,
        } = self.batch;
        let FQueueBuilder {
            registry,
            name,
            fan_out,
            on_failure,
            on_noop,
            mailbox_capacity,
            ..
        } = pipeline;

        let settings = PipelineSettings {
            name: name
                .optional()?
                .unwrap_or_else(|| registry.config().defaults.pipeline_name.clone()),
            fan_out: fan_out.optional()?.unwrap_or(0),
            mailbox_capacity: mailbox_capacity
                .optional()?
                .unwrap_or(registry.config().limits.mailbox_capacity),
            chunk_size: chunk_size.required()?,
            flush_interval: flush_interval.required()?,
            weight_fn: weight_fn.optional()?.unwrap_or_else(unit_weight),
        };
        let on_failure = on_failure.optional()?;
        let on_noop = on_noop.optional()?;
        settings.validate()?;

        let runtime = Handle::try_current().map_err(|_| FQueueError::NoRuntime)?;

        let serial = registry.next_serial();
        let id = pipeline_identity(&settings.name, serial)?;
        let worker_count = settings.fan_out.max(1);
        let worker_ids = (0..worker_count)
            .map(|index| child_identity(&id, &format!("worker_{index}")))
            .collect::<Result<Vec<Ern>, FQueueError>>()?;
        let dispatcher_id = if settings.fan_out > 0 {
            Some(child_identity(&id, "dispatcher")?)
        } else {
            None
        };

        let lifecycle = Arc::new(Lifecycle::default());
        let cancellation_token = CancellationToken::new();
        let tracker = TaskTracker::new();
        let handle = PipelineHandle::new(
            id.clone(),
            &settings.name,
            type_name::<T>(),
            settings.fan_out,
            lifecycle.clone(),
        );

        let mut outboxes = Vec::with_capacity(worker_count);
        for worker_id in worker_ids {
            let (outbox, inbox) = mpsc::channel(settings.mailbox_capacity);
            outboxes.push(outbox);
            let worker = Worker::new(
                worker_id.clone(),
                inbox,
                BatchAccumulator::new(settings.chunk_size, settings.weight_fn.clone()),
                Box::new(factory()),
                handle.clone(),
                settings.flush_interval,
                on_noop.clone(),
                cancellation_token.clone(),
            );
            spawn_actor(
                &tracker,
                &runtime,
                worker_id,
                lifecycle.clone(),
                on_failure.clone(),
                worker.wake(),
            );
        }

        let entry = match dispatcher_id {
            Some(dispatcher_id) => {
                let (outbox, inbox) = mpsc::channel(settings.mailbox_capacity);
                let dispatcher = Dispatcher::new(
                    dispatcher_id.clone(),
                    inbox,
                    outboxes,
                    cancellation_token.clone(),
                );
                spawn_actor(
                    &tracker,
                    &runtime,
                    dispatcher_id,
                    lifecycle.clone(),
                    on_failure,
                    dispatcher.wake(),
                );
                outbox
            }
            // Exactly one worker without fan-out.
            None => outboxes.swap_remove(0),
        };

        tracker.close();
        lifecycle.mark_running();

        let control = PipelineControl::new(
            serial,
            id.clone(),
            TypeId::of::<T>(),
            lifecycle.clone(),
            cancellation_token,
            tracker,
            registry.route_table(),
        );
        let intake = Intake::new(
            id.clone(),
            entry,
            lifecycle,
            registry.config().broadcast_send_timeout(),
        );
        registry.register(control.clone(), intake);

        info!(
            pipeline = %id,
            fan_out = settings.fan_out,
            chunk_size = settings.chunk_size,
            flush_interval = ?settings.flush_interval,
            mailbox_capacity = settings.mailbox_capacity,
            "pipeline running"
        );
        Ok(FQueue::new(handle, control))
    }
}

impl<T> PipelineSettings<T> {
    fn validate(&self) -> Result<(), FQueueError> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size", "must be at least 1"));
        }
        if self.flush_interval.is_zero() {
            return Err(invalid("flush_interval", "must be greater than zero"));
        }
        if self.mailbox_capacity == 0 {
            return Err(invalid("mailbox_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(setting: &'static str, reason: &str) -> FQueueError {
    FQueueError::InvalidSetting {
        setting,
        reason: reason.to_string(),
    }
}

fn unit_weight<T: Element>() -> WeightFn<T> {
    Arc::new(|_: &T| 1_u64)
}

/// `ern:fqueue:pipeline:{name}:{name}_{unique}/{serial}`; the name must be a valid ERN account.
fn pipeline_identity(name: &str, serial: u64) -> Result<Ern, FQueueError> {
    let build = || -> Result<Ern, ErnError> {
        ErnBuilder::new()
            .with::<Domain>("fqueue")?
            .with::<Category>("pipeline")?
            .with::<Account>(name)?
            .with::<EntityRoot>(name)?
            .with::<Part>(serial.to_string())?
            .build()
    };
    build().map_err(|e| FQueueError::Identity(format!("`{name}`: {e}")))
}

fn child_identity(parent: &Ern, part: &str) -> Result<Ern, FQueueError> {
    parent
        .add_part(part)
        .map_err(|e| FQueueError::Identity(format!("`{parent}/{part}`: {e}")))
}
