//! Cancellation shared by every worker loop.
//!
//! Nothing is ever sent on the channel. Dropping the signal's sender disconnects
//! it, which every listener sees at once, both in `select!` and in `try_recv`.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// The owning side of the cancellation channel.
pub struct ShutdownSignal {
    sender: Option<Sender<()>>,
    receiver: Receiver<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        ShutdownSignal {
            sender: Some(sender),
            receiver,
        }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.receiver.clone(),
        }
    }

    /// Broadcasts shutdown to every listener. Idempotent.
    pub fn trigger(&mut self) {
        self.sender.take();
    }

    pub fn is_triggered(&self) -> bool {
        self.sender.is_none()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A cheap, clonable view of a `ShutdownSignal`.
#[derive(Clone)]
pub struct ShutdownListener {
    receiver: Receiver<()>,
}

impl ShutdownListener {
    pub fn is_shutdown(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// The raw channel, for use in `select!`. Becomes ready once shutdown is triggered.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_reaches_every_listener() {
        let mut signal = ShutdownSignal::new();
        let a = signal.listener();
        let b = a.clone();
        assert!(!a.is_shutdown());

        signal.trigger();
        signal.trigger();

        assert!(signal.is_triggered());
        assert!(a.is_shutdown());
        assert!(b.is_shutdown());
        assert!(b.receiver().recv().is_err());
    }
}
