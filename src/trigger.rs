//! Flashbulb trigger queue
//!
//! Sensors and other event sources run outside the frame loop, possibly in
//! interrupt context. They post triggers into a bounded queue guarded by a
//! critical section; the composer drains it at the start of every frame.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::{flashbulb::FlashBulbId, strip::StripList};

/// Request to start a flashbulb
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashTrigger {
    /// Trigger a registered event
    Registered(FlashBulbId),
    /// Flash an arbitrary strip set
    Strips(StripList),
}

/// Error returned when the queue is full, carrying the rejected trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError(pub FlashTrigger);

/// Bounded, interrupt-safe trigger queue
pub struct TriggerQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<FlashTrigger, SIZE>>>,
}

impl<const SIZE: usize> TriggerQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for posting triggers, any number may coexist
    pub const fn sender(&self) -> TriggerSender<'_, SIZE> {
        TriggerSender { queue: self }
    }

    /// Handle for draining triggers
    pub const fn receiver(&self) -> TriggerReceiver<'_, SIZE> {
        TriggerReceiver { queue: self }
    }

    pub fn try_send(&self, trigger: FlashTrigger) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(trigger).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Option<FlashTrigger> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for TriggerQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct TriggerSender<'a, const SIZE: usize> {
    queue: &'a TriggerQueue<SIZE>,
}

impl<const SIZE: usize> TriggerSender<'_, SIZE> {
    /// Post a trigger, handing it back if the queue is full
    pub fn try_send(&self, trigger: FlashTrigger) -> Result<(), TrySendError> {
        self.queue.try_send(trigger)
    }
}

#[derive(Clone, Copy)]
pub struct TriggerReceiver<'a, const SIZE: usize> {
    queue: &'a TriggerQueue<SIZE>,
}

impl<const SIZE: usize> TriggerReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<FlashTrigger> {
        self.queue.try_receive()
    }

    /// Iterate over the queued triggers, removing them
    pub fn drain(&self) -> impl Iterator<Item = FlashTrigger> + '_ {
        core::iter::from_fn(|| self.try_receive())
    }
}
