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

use derive_new::new;
use static_assertions::assert_impl_all;

/// A point-to-point message routed by recipient name.
///
/// Created once per send and never mutated afterwards. The bus routes on
/// `recipient` only and never inspects or rewrites `content`.
#[derive(new, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Name of the agent (or external caller) that produced the message.
    pub sender: String,
    /// Name of the mailbox this message is delivered to.
    pub recipient: String,
    /// Opaque payload; meaningful only to the recipient's handler.
    pub content: String,
}

// Messages cross task boundaries on every send.
assert_impl_all!(Message: Send, Sync);
