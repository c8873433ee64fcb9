// Bounded queue of device events waiting for the next update

use super::device::DeviceEvent;
use log::warn;
use std::collections::VecDeque;

/// FIFO of normalised device events.
///
/// Intake pushes, `update` drains. When full, the oldest event is dropped.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<DeviceEvent>,
    capacity: usize,
    dropped: usize,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: DeviceEvent) {
        if self.events.len() >= self.capacity {
            if let Some(oldest) = self.events.pop_front() {
                self.dropped += 1;
                warn!("Input queue full, dropping {:?}", oldest.input);
            }
        }
        self.events.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = DeviceEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Take every queued event in arrival order
    pub fn drain(&mut self) -> Vec<DeviceEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to overflow since creation
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(256)
    }
}
