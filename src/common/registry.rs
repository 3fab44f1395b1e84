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

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use static_assertions::assert_impl_all;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{instrument, trace, warn};

use crate::common::CONFIG;
use crate::message::{BusError, Message};

/// Outcome of a [`send`](MailboxRegistry::send).
///
/// A message addressed to a name with no mailbox is dropped rather than
/// raised as an error; this value is the caller's only synchronous signal
/// that it happened (drops are also logged, see
/// [`BehaviorConfig`](crate::common::BusConfig)).
#[must_use = "a dropped delivery is only observable through this value"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The message was appended to the recipient's mailbox.
    Delivered,
    /// No mailbox exists for the recipient; the message was discarded.
    Dropped,
}

impl DeliveryStatus {
    /// Returns `true` if the message reached a mailbox.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered)
    }
}

/// One agent's FIFO queue. The sender half serves every producer; the
/// receiver half sits behind an async lock so dequeues can be handed out by
/// name while staying serialized.
#[derive(Debug, Clone)]
struct Mailbox {
    outbox: UnboundedSender<Message>,
    inbox: Arc<Mutex<UnboundedReceiver<Message>>>,
}

impl Mailbox {
    fn new() -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        Mailbox {
            outbox,
            inbox: Arc::new(Mutex::new(inbox)),
        }
    }
}

/// Shared owner of every agent's mailbox, keyed by agent name.
///
/// The registry is a cheap-clone handle: clones share the same underlying
/// map, so handlers and runners can each hold one without coordination.
/// Mailbox internals are never exposed; all access goes through name-based
/// lookup, keeping mailbox lifetime centrally controlled.
#[derive(Debug, Clone, Default)]
pub struct MailboxRegistry {
    mailboxes: Arc<DashMap<String, Mailbox>>,
}

impl MailboxRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mailbox for `name` if one does not exist.
    ///
    /// Idempotent: repeat calls are no-ops and leave any pending messages in
    /// place.
    #[instrument(skip(self))]
    pub fn register(&self, name: &str) {
        self.mailboxes
            .entry(name.to_string())
            .or_insert_with(Mailbox::new);
        trace!(agent = name, "mailbox registered");
    }

    /// Appends `message` to its recipient's mailbox.
    ///
    /// Never blocks the caller: mailboxes are unbounded. A message addressed
    /// to an unregistered name is dropped, reported only through the
    /// returned [`DeliveryStatus`].
    #[instrument(skip(self, message), fields(recipient = %message.recipient))]
    pub fn send(&self, message: Message) -> DeliveryStatus {
        match self.mailboxes.get(&message.recipient) {
            Some(mailbox) => {
                if mailbox.outbox.send(message).is_ok() {
                    DeliveryStatus::Delivered
                } else {
                    // The receiver half only drops when the entry is removed.
                    DeliveryStatus::Dropped
                }
            }
            None => {
                if CONFIG.behavior.log_dropped_messages {
                    warn!(
                        sender = %message.sender,
                        recipient = %message.recipient,
                        "no mailbox for recipient, message dropped"
                    );
                }
                DeliveryStatus::Dropped
            }
        }
    }

    /// Removes and returns the oldest pending message for `name`, waiting
    /// indefinitely for one to arrive.
    ///
    /// # Errors
    ///
    /// [`BusError::AgentNotRegistered`] if `name` has no mailbox;
    /// [`BusError::MailboxClosed`] if the mailbox is torn down mid-wait.
    #[instrument(skip(self))]
    pub async fn receive(&self, name: &str) -> Result<Message, BusError> {
        let mailbox = self.lookup(name)?;
        let mut inbox = mailbox.inbox.lock().await;
        inbox
            .recv()
            .await
            .ok_or_else(|| BusError::MailboxClosed(name.to_string()))
    }

    /// Like [`receive`](Self::receive), but gives up after `wait`.
    ///
    /// `Ok(None)` is the distinguished "no message" result; an elapsed
    /// timeout is not an error for a registered agent.
    #[instrument(skip(self))]
    pub async fn receive_timeout(
        &self,
        name: &str,
        wait: Duration,
    ) -> Result<Option<Message>, BusError> {
        let mailbox = self.lookup(name)?;
        let mut inbox = mailbox.inbox.lock().await;
        match tokio::time::timeout(wait, inbox.recv()).await {
            Ok(Some(message)) => Ok(Some(message)),
            Ok(None) => Err(BusError::MailboxClosed(name.to_string())),
            Err(_) => Ok(None),
        }
    }

    /// Returns `true` if a mailbox exists for `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.mailboxes.contains_key(name)
    }

    /// Number of registered mailboxes.
    pub fn mailbox_count(&self) -> usize {
        self.mailboxes.len()
    }

    // Clones the mailbox out of the map so no shard guard is held across an
    // await.
    fn lookup(&self, name: &str) -> Result<Mailbox, BusError> {
        self.mailboxes
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BusError::AgentNotRegistered(name.to_string()))
    }
}

// The registry is shared by every runner and handler in the process.
assert_impl_all!(MailboxRegistry: Send, Sync);
