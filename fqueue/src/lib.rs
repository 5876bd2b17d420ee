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

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # FQueue
//!
//! An in-process batching and fan-out broadcast engine built on Tokio.
//!
//! Producers broadcast typed elements through an [`FQueueRegistry`](crate::common::FQueueRegistry).
//! Every pipeline ([`FQueue`](crate::common::FQueue)) registered for the element's type
//! accumulates elements into batches and hands each batch to a consumer.
//!
//! ## Key Concepts
//!
//! - **Registry (`FQueueRegistry`)**: owns the `TypeId` → pipelines routing table and the
//!   broadcast entry point. Created explicitly; there is no global registry.
//! - **Pipeline (`FQueue`)**: one worker, or a dispatcher plus `N` workers when fan-out is
//!   enabled. Owns the lifecycle (`destroy`, `destroy_and_await`).
//! - **Workers**: one Tokio task each, with a bounded mailbox, a batch accumulator, a flush
//!   timer and a consumer instance of their own.
//! - **Batches**: flushed when the accumulated weight reaches the chunk size
//!   ([`BatchReason::MaxWeightReached`](crate::message::BatchReason)) or when the flush
//!   interval elapses with a non-empty buffer ([`BatchReason::TimeFlush`](crate::message::BatchReason)).
//! - **Failure reporting**: every actor reports exactly one [`ActorFault`](crate::message::ActorFault)
//!   to the failure handler when its loop ends, whether by shutdown or by a consumer fault.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use fqueue::prelude::*;
//!
//! let registry = FQueueRegistry::new();
//! let fqueue = registry
//!     .build_fqueue::<String>()
//!     .fan_out(4)
//!     .batch()
//!     .with_chunk_size(100)
//!     .with_flush_interval(Duration::from_millis(500))
//!     .done()
//!     .consume(|| |_: &PipelineHandle, reason: BatchReason, batch: Vec<String>| {
//!         println!("{reason}: {} elements", batch.len());
//!         Ok(())
//!     })?;
//!
//! registry.send_broadcast("hello".to_string()).await;
//! fqueue.destroy_and_await(Duration::from_secs(5)).await;
//! ```

/// Registry, pipeline handles, lifecycle and configuration.
pub(crate) mod common;

/// The actors: batch accumulator, worker loop and fan-out dispatcher.
pub(crate) mod actor;

/// The staged pipeline builder.
pub(crate) mod builder;

/// Batch reasons, actor faults and configuration errors.
pub(crate) mod message;

/// Consumer and element contracts.
pub(crate) mod traits;

/// Configuration loaded from `$XDG_CONFIG_HOME/fqueue/config.toml`.
pub mod config {
    pub use crate::common::config::{
        DefaultsConfig, FQueueConfig, LimitsConfig, TimeoutConfig, CONFIG,
    };
}

/// A prelude module for conveniently importing the most commonly used items.
///
/// ## External Crates
/// *   [`async_trait::async_trait`](https://docs.rs/async-trait/latest/async_trait/attr.async_trait.html):
///     needed to implement [`Consumer`](crate::traits::Consumer) on your own types.
///
/// ## Core Types
/// *   [`crate::common::FQueueRegistry`]: routing table and broadcast entry point.
/// *   [`crate::common::FQueue`]: a running pipeline.
/// *   [`crate::common::PipelineHandle`]: read-only view handed to consumers.
/// *   [`crate::common::PipelineState`]: lifecycle state of a pipeline.
/// *   [`crate::builder::FQueueBuilder`], [`crate::builder::BatchBuilder`],
///     [`crate::builder::BatchedFQueueBuilder`]: the staged builder.
/// *   [`crate::message::BatchReason`], [`crate::message::ActorFault`],
///     [`crate::message::FQueueError`].
/// *   [`crate::traits::Consumer`], [`crate::traits::Element`].
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::builder::{BatchBuilder, BatchedFQueueBuilder, FQueueBuilder};
    pub use crate::common::{FQueue, FQueueRegistry, PipelineHandle, PipelineState};
    pub use crate::message::{ActorFault, BatchReason, FQueueError};
    pub use crate::traits::{Consumer, Element};
}
