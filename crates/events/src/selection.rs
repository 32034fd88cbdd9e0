//! Active market event selection.

use types::MarketEvent;

/// Outcome of a [`EventSelection::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// No event was active; one is now.
    Selected,
    /// The active event was selected again and is now cleared.
    Deselected,
    /// A different event replaced the active one.
    Replaced,
}

/// Holds at most one active event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSelection {
    active: Option<MarketEvent>,
}

impl EventSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&MarketEvent> {
        self.active.as_ref()
    }

    pub fn is_active(&self, event_id: &str) -> bool {
        self.active.as_ref().is_some_and(|e| e.event_id == event_id)
    }

    /// Select `event`, or clear the selection if it is already active.
    pub fn toggle(&mut self, event: MarketEvent) -> SelectionChange {
        let change = match &self.active {
            Some(current) if current.event_id == event.event_id => SelectionChange::Deselected,
            Some(_) => SelectionChange::Replaced,
            None => SelectionChange::Selected,
        };
        self.active = match change {
            SelectionChange::Deselected => None,
            SelectionChange::Selected | SelectionChange::Replaced => Some(event),
        };
        change
    }

    /// Clear the selection. Returns the previously active event.
    pub fn clear(&mut self) -> Option<MarketEvent> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::EventType;

    fn event(id: &str) -> MarketEvent {
        MarketEvent::new(id, EventType::Negative, 0.3, 0.2, 0.2, "")
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut sel = EventSelection::new();
        assert_eq!(sel.toggle(event("drought")), SelectionChange::Selected);
        assert!(sel.is_active("drought"));
        assert_eq!(sel.toggle(event("drought")), SelectionChange::Deselected);
        assert!(sel.active().is_none());
    }

    #[test]
    fn test_toggle_replaces() {
        let mut sel = EventSelection::new();
        sel.toggle(event("drought"));
        assert_eq!(sel.toggle(event("strike")), SelectionChange::Replaced);
        assert!(sel.is_active("strike"));
        assert!(!sel.is_active("drought"));
    }

    #[test]
    fn test_clear() {
        let mut sel = EventSelection::new();
        assert!(sel.clear().is_none());
        sel.toggle(event("drought"));
        assert_eq!(sel.clear().map(|e| e.event_id), Some("drought".to_string()));
        assert!(sel.active().is_none());
    }
}
