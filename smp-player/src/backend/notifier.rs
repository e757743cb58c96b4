//! Generation-tagged signal channel from backend to controller
//!
//! Every load attempt gets a fresh generation number. Backend callbacks
//! (ready, completed, failed) carry the generation of the load they
//! belong to, so the controller can discard signals from a resource that
//! has already been superseded or released.

use tokio::sync::mpsc;
use tracing::trace;

/// Asynchronous signals a player resource delivers to the controller
#[derive(Debug, Clone)]
pub enum ResourceSignal {
    /// Preparation finished; the resource can be started
    Ready { generation: u64 },

    /// The loaded track played to its natural end
    Completed { generation: u64 },

    /// Unrecoverable resource error
    Failed { generation: u64, message: String },
}

impl ResourceSignal {
    /// Generation of the load attempt this signal belongs to
    pub fn generation(&self) -> u64 {
        match self {
            ResourceSignal::Ready { generation }
            | ResourceSignal::Completed { generation }
            | ResourceSignal::Failed { generation, .. } => *generation,
        }
    }
}

/// Sender handed to a player resource at prepare time.
///
/// Cloneable so a backend can signal from timers or worker threads.
/// Sends never block; delivery failures mean the controller is gone and
/// are silently dropped.
#[derive(Debug, Clone)]
pub struct ResourceNotifier {
    generation: u64,
    tx: mpsc::UnboundedSender<ResourceSignal>,
}

impl ResourceNotifier {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<ResourceSignal>) -> Self {
        Self { generation, tx }
    }

    /// Generation this notifier is tagged with
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Signal that preparation finished
    pub fn ready(&self) {
        self.send(ResourceSignal::Ready {
            generation: self.generation,
        });
    }

    /// Signal natural end of the loaded track
    pub fn completed(&self) {
        self.send(ResourceSignal::Completed {
            generation: self.generation,
        });
    }

    /// Signal an unrecoverable resource error
    pub fn failed(&self, message: impl Into<String>) {
        self.send(ResourceSignal::Failed {
            generation: self.generation,
            message: message.into(),
        });
    }

    fn send(&self, signal: ResourceSignal) {
        if self.tx.send(signal).is_err() {
            trace!("controller gone, dropping resource signal");
        }
    }
}
