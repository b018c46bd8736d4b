//! # Work Queue
//!
//! A locked double-ended queue of pending work with a wake-up channel.
//!
//! Every push wakes the consumer through a one-slot channel, so a burst of
//! pushes costs at most one pending wake-up. Duplicate suppression is done
//! under the queue's own lock: `push_*_if_absent` and `push_back_if` check and
//! insert in one critical section, so a concurrent `pop_front` can never slip
//! between the check and the insert.

use std::collections::VecDeque;
use std::sync::RwLockWriteGuard;

use crossbeam_channel::{Receiver, Sender};

use crate::core::MtResource;

pub struct WorkQueue<T: Send + Sync> {
    items: MtResource<VecDeque<T>>,
    waker: Sender<()>,
    wake_receiver: Receiver<()>,
}

impl<T: PartialEq + Send + Sync + 'static> WorkQueue<T> {
    pub fn new() -> Self {
        let (waker, wake_receiver) = crossbeam_channel::bounded(1);
        WorkQueue {
            items: MtResource::new(VecDeque::new()),
            waker,
            wake_receiver,
        }
    }

    fn wake(&self) {
        // A full slot already means a wake-up is pending.
        let _ = self.waker.try_send(());
    }

    /// Receives a message whenever something is pushed.
    pub fn wake_receiver(&self) -> Receiver<()> {
        self.wake_receiver.clone()
    }

    pub fn push_front(&self, item: T) {
        self.items.get_mut().push_front(item);
        self.wake();
    }

    pub fn push_back(&self, item: T) {
        self.items.get_mut().push_back(item);
        self.wake();
    }

    /// Returns `true` if the item was queued.
    pub fn push_front_if_absent(&self, item: T) -> bool {
        self.push_if(item, true, |_| true)
    }

    /// Returns `true` if the item was queued.
    pub fn push_back_if_absent(&self, item: T) -> bool {
        self.push_if(item, false, |_| true)
    }

    /// Appends `item` if it is not queued and `condition` holds.
    ///
    /// `condition` runs with the queue lock held, so it may consult other
    /// stores but must not touch this queue.
    pub fn push_back_if(&self, item: T, condition: impl FnOnce(&T) -> bool) -> bool {
        self.push_if(item, false, condition)
    }

    fn push_if(&self, item: T, front: bool, condition: impl FnOnce(&T) -> bool) -> bool {
        let queued = {
            let mut items = self.items.get_mut();
            if items.contains(&item) || !condition(&item) {
                false
            } else {
                if front {
                    items.push_front(item);
                } else {
                    items.push_back(item);
                }
                true
            }
        };
        if queued {
            self.wake();
        }
        queued
    }

    /// Moves `item` to the front, inserting it if it was not queued.
    pub fn promote_front(&self, item: T) {
        {
            let mut items = self.items.get_mut();
            items.retain(|queued| *queued != item);
            items.push_front(item);
        }
        self.wake();
    }

    pub fn pop_front(&self) -> Option<T> {
        self.items.get_mut().pop_front()
    }

    pub fn drain(&self) -> Vec<T> {
        self.items.get_mut().drain(..).collect()
    }

    /// Keeps only the items matching `predicate`. Returns how many were dropped.
    pub fn retain(&self, predicate: impl FnMut(&T) -> bool) -> usize {
        let mut items = self.items.get_mut();
        let before = items.len();
        items.retain(predicate);
        before - items.len()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.get().contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.get().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.get().len()
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.get().iter().cloned().collect()
    }

    /// Holds the queue lock, for multi-step operations that must stay atomic
    /// with respect to other pushes and pops.
    pub fn lock(&self) -> RwLockWriteGuard<'_, VecDeque<T>> {
        self.items.get_mut()
    }
}

impl<T: PartialEq + Send + Sync + 'static> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
