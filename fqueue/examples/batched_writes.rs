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

//! Batches simulated database writes across four workers.
//!
//! Run with `RUST_LOG=fqueue=debug cargo run --example batched_writes`.

use std::time::Duration;

use fqueue::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Row {
    id: u64,
    payload: String,
}

/// Pretends to write a batch with one round trip.
struct BulkWriter {
    written: usize,
}

#[async_trait]
impl Consumer<Row> for BulkWriter {
    async fn consume(
        &mut self,
        pipeline: &PipelineHandle,
        reason: BatchReason,
        batch: Vec<Row>,
    ) -> anyhow::Result<()> {
        let bytes: usize = batch.iter().map(|row| row.payload.len()).sum();
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.written += batch.len();
        info!(
            pipeline = %pipeline.id(),
            %reason,
            rows = batch.len(),
            first = batch[0].id,
            bytes,
            total = self.written,
            "batch written"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let registry = FQueueRegistry::new();
    let writes = registry
        .build_fqueue::<Row>()
        .named("writes")
        .fan_out(4)
        .with_failure_handler(|fault: &ActorFault| {
            if !fault.is_shutdown() {
                tracing::error!(%fault, "writer stopped");
            }
        })
        .batch()
        .with_chunk_size(4096)
        .with_flush_interval(Duration::from_millis(250))
        .with_weight_fn(|row: &Row| row.payload.len() as u64)
        .done()
        .consume(|| BulkWriter { written: 0 })?;

    for id in 0..1_000_u64 {
        let row = Row {
            id,
            payload: "x".repeat(64 + (id % 64) as usize),
        };
        registry.send_broadcast(row).await;
    }

    // Let the timers flush what is left below the chunk size.
    tokio::time::sleep(Duration::from_millis(500)).await;

    if !writes.destroy_and_await(Duration::from_secs(5)).await {
        tracing::warn!("writers did not stop in time");
    }
    Ok(())
}
