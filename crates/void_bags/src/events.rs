//! Bag events

/// Feedback cue for an interactive transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferCue {
    /// At least one unit moved
    Success,
    /// Nothing moved
    Failure,
}

impl TransferCue {
    /// Cue for a moved quantity
    pub fn for_moved(moved: u32) -> Self {
        if moved > 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Events emitted by a bag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BagEvent {
    /// Contents changed by a transfer
    ContentsChanged {
        /// Total units moved by the call
        moved: u32,
    },
    /// Outcome of an interactive transfer
    Feedback(TransferCue),
    /// A child bag was added to or removed from a composite
    ChildrenChanged,
}

/// Queue of pending events
#[derive(Debug, Clone, Default)]
pub(crate) struct EventQueue {
    events: Vec<BagEvent>,
}

impl EventQueue {
    /// Record the outcome of one public transfer call
    pub(crate) fn transfer(&mut self, moved: u32) {
        if moved > 0 {
            self.events.push(BagEvent::ContentsChanged { moved });
        }
        self.events.push(BagEvent::Feedback(TransferCue::for_moved(moved)));
    }

    pub(crate) fn push(&mut self, event: BagEvent) {
        self.events.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<BagEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue() {
        assert_eq!(TransferCue::for_moved(3), TransferCue::Success);
        assert_eq!(TransferCue::for_moved(0), TransferCue::Failure);
    }

    #[test]
    fn test_failed_transfer_has_only_feedback() {
        let mut queue = EventQueue::default();
        queue.transfer(0);

        assert_eq!(
            queue.drain(),
            vec![BagEvent::Feedback(TransferCue::Failure)]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_successful_transfer() {
        let mut queue = EventQueue::default();
        queue.transfer(12);

        assert_eq!(
            queue.drain(),
            vec![
                BagEvent::ContentsChanged { moved: 12 },
                BagEvent::Feedback(TransferCue::Success),
            ]
        );
    }
}
