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

use std::any::Any;

/// A marker trait for types that can be broadcast through an
/// [`FQueueRegistry`](crate::common::FQueueRegistry).
///
/// Routing is by the element's concrete type. `Clone` is required because a
/// single broadcast reaches every pipeline registered for the type.
///
/// A blanket implementation covers every `Any + Clone + Send` type, so payload
/// types only need to derive `Clone`.
pub trait Element: Any + Clone + Send + 'static {}

impl<T> Element for T where T: Any + Clone + Send + 'static {}
