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

//! Test support for FQueue pipelines.
//!
//! ```rust,ignore
//! use fqueue_test::prelude::*;
//!
//! #[fqueue_test]
//! async fn batches_arrive() -> anyhow::Result<()> {
//!     // build a registry, broadcast, assert...
//!     Ok(())
//! }
//! ```

pub use fqueue_test_macro::fqueue_test;

mod panic_watch;

/// Items most tests want in scope.
pub mod prelude {
    pub use fqueue_test_macro::fqueue_test;
}

#[doc(hidden)]
pub mod __private {
    pub use tokio;
    pub use tracing;

    pub use crate::panic_watch::PanicWatch;
}
