/// Event with its emission sequence number, for traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub sequence: u64,
    pub payload: E,
}

/// FIFO event queue.
///
/// Producers emit while handling input; consumers drain after the producer
/// has returned, so handlers never run re-entrantly.
#[derive(Debug)]
pub struct EventBus<E> {
    next_sequence: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_sequence: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, payload: E) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.events.push(Event { sequence, payload });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit("a");
        bus.emit("b");
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].sequence, 1);
        assert_eq!(events[1].payload, "b");
    }

    #[test]
    fn drain_clears_events_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.emit(1);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
        bus.emit(2);
        assert_eq!(bus.drain()[0].sequence, 1);
    }
}
