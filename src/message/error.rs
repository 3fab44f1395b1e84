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

/// Represents errors the bus raises synchronously to its callers.
///
/// Handler failures are deliberately absent: they are logged and discarded
/// inside the runner's receive loop and never surface through this type.
#[derive(Debug)]
pub enum BusError {
    /// A receive was attempted for a name that has no mailbox.
    AgentNotRegistered(String),
    /// An agent was added under a name that is already recorded.
    AgentAlreadyExists(String),
    /// A mailbox was torn down while a receive was parked on it.
    MailboxClosed(String),
}

impl std::fmt::Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BusError::AgentNotRegistered(name) => {
                write!(f, "Agent {} is not registered", name)
            }
            BusError::AgentAlreadyExists(name) => {
                write!(f, "Agent {} already exists", name)
            }
            BusError::MailboxClosed(name) => {
                write!(f, "Mailbox for agent {} is closed", name)
            }
        }
    }
}

impl std::error::Error for BusError {}
