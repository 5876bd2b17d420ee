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

use async_trait::async_trait;

use crate::common::PipelineHandle;
use crate::message::BatchReason;
use crate::traits::Element;

/// Receives the batches flushed by one worker.
///
/// A pipeline calls its consumer factory once per worker, so each worker owns a
/// separate consumer and its state needs no synchronization. `consume` is only
/// ever invoked from that worker's loop, one batch at a time.
///
/// Returning an error (or panicking) stops the worker: the fault is reported to
/// the pipeline's failure handler and the worker is not restarted.
///
/// Closures with the signature
/// `FnMut(&PipelineHandle, BatchReason, Vec<T>) -> anyhow::Result<()>` implement
/// this trait; implement it directly when the consumer needs to `.await`.
///
/// ```rust,ignore
/// struct BulkWriter { client: Client }
///
/// #[async_trait]
/// impl Consumer<Row> for BulkWriter {
///     async fn consume(&mut self, _: &PipelineHandle, _: BatchReason, batch: Vec<Row>) -> anyhow::Result<()> {
///         self.client.insert_many(batch).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Consumer<T: Element>: Send + 'static {
    /// Handles one flushed batch. `batch` is never empty and keeps arrival order.
    async fn consume(
        &mut self,
        pipeline: &PipelineHandle,
        reason: BatchReason,
        batch: Vec<T>,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl<T, F> Consumer<T> for F
where
    T: Element,
    F: FnMut(&PipelineHandle, BatchReason, Vec<T>) -> anyhow::Result<()> + Send + 'static,
{
    async fn consume(
        &mut self,
        pipeline: &PipelineHandle,
        reason: BatchReason,
        batch: Vec<T>,
    ) -> anyhow::Result<()> {
        self(pipeline, reason, batch)
    }
}
