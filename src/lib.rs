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

//! # Mailbus
//!
//! An in-process message bus that lets independently running agents exchange
//! asynchronous point-to-point messages and react to them through
//! user-supplied handlers, built on Tokio.
//!
//! ## Key Concepts
//!
//! - **Messages (`Message`)**: Immutable `{sender, recipient, content}`
//!   values routed solely by recipient name.
//! - **Mailbox Registry (`MailboxRegistry`)**: Shared owner of every agent's
//!   FIFO mailbox, safe for concurrent senders and receivers.
//! - **Runners (`AgentRunner`)**: One per agent; each drives an independent
//!   receive loop that hands messages to the agent's handler.
//! - **Orchestration (`AgentManager`)**: Creates runners against a shared
//!   registry and fans start/stop out across all of them.
//! - **Handlers (`Handler`)**: User-supplied per-message logic whose only
//!   observable effect is further sends through the registry.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailbus::prelude::*;
//!
//! let manager = AgentManager::new();
//! manager.add_agent("echo", |message: Message, registry: MailboxRegistry| -> HandlerFuture {
//!     Box::pin(async move {
//!         let _ = registry.send(Message::new(
//!             message.recipient.clone(),
//!             message.sender.clone(),
//!             message.content.clone(),
//!         ));
//!         Ok(())
//!     })
//! })?;
//! manager.start_all();
//! ```

/// Defines the runner that drives one agent's receive loop.
pub(crate) mod agent;

/// Shared runtime pieces: registry, orchestrator, and configuration.
pub(crate) mod common;

/// Defines the message value and the bus error taxonomy.
pub(crate) mod message;

/// Capability traits supplied by or consumed from the outside world.
pub(crate) mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use async_trait;

    pub use crate::agent::{AgentRunner, RunnerState};
    pub use crate::common::{AgentManager, BusConfig, DeliveryStatus, MailboxRegistry, CONFIG};
    pub use crate::message::{BusError, Message};
    pub use crate::traits::{Handler, HandlerFuture, Provider};
}
