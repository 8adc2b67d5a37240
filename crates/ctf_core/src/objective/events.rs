//! Objective events and the synchronous observer channel

use super::eligibility::DenyReason;
use super::host::ScoreReason;
use super::state::ObjectState;
use crate::types::{HolderId, ObjectiveId, Position, TeamId};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveEvent {
    StateChanged { from: ObjectState, to: ObjectState },
    HolderChanged { holder: Option<HolderId> },
    PickedUp { holder: HolderId, team: TeamId, was_home: bool },
    /// Grab-from-home stat credit for the holder and their team
    GrabCredited { holder: HolderId, team: TeamId },
    Dropped {
        last_holder: Option<HolderId>,
        instigator: Option<HolderId>,
        location: Position,
        movement_enabled: bool,
    },
    /// One gradual-return hop; `remaining` samples left on the trail
    ReturnStep { to: Position, remaining: usize },
    ReturnedHome { last_holder: Option<HolderId> },
    GhostPlaced { at: Position },
    GhostCleared,
    PickupDenied { candidate: HolderId, reason: DenyReason },
    Scored { reason: ScoreReason, scorer: Option<HolderId> },
    /// Team-level "objective status changed" notice (bots re-plan on this)
    StatusChanged { instigator: Option<HolderId> },
    PingCleared,
}

impl ObjectiveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveEvent::StateChanged { .. } => "state_changed",
            ObjectiveEvent::HolderChanged { .. } => "holder_changed",
            ObjectiveEvent::PickedUp { .. } => "picked_up",
            ObjectiveEvent::GrabCredited { .. } => "grab_credited",
            ObjectiveEvent::Dropped { .. } => "dropped",
            ObjectiveEvent::ReturnStep { .. } => "return_step",
            ObjectiveEvent::ReturnedHome { .. } => "returned_home",
            ObjectiveEvent::GhostPlaced { .. } => "ghost_placed",
            ObjectiveEvent::GhostCleared => "ghost_cleared",
            ObjectiveEvent::PickupDenied { .. } => "pickup_denied",
            ObjectiveEvent::Scored { .. } => "scored",
            ObjectiveEvent::StatusChanged { .. } => "status_changed",
            ObjectiveEvent::PingCleared => "ping_cleared",
        }
    }
}

pub trait ObjectiveObserver {
    fn on_event(&mut self, objective: ObjectiveId, event: &ObjectiveEvent);
}

impl<F> ObjectiveObserver for F
where
    F: FnMut(ObjectiveId, &ObjectiveEvent),
{
    fn on_event(&mut self, objective: ObjectiveId, event: &ObjectiveEvent) {
        self(objective, event)
    }
}

/// Ordered observer list, invoked synchronously in subscription order
#[derive(Default)]
pub struct EventChannel {
    observers: Vec<Box<dyn ObjectiveObserver>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl ObjectiveObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn emit(&mut self, objective: ObjectiveId, event: ObjectiveEvent) {
        tracing::trace!(%objective, event = event.name(), "objective event");
        for observer in self.observers.iter_mut() {
            observer.on_event(objective, &event);
        }
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventChannel").field("observers", &self.observers.len()).finish()
    }
}

/// Shared recorder; clone it into a channel and read it back later
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Rc<RefCell<Vec<(ObjectiveId, ObjectiveEvent)>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(ObjectiveId, ObjectiveEvent)> {
        self.inner.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.inner.borrow().iter().filter(|(_, e)| e.name() == name).count()
    }

    pub fn last(&self) -> Option<ObjectiveEvent> {
        self.inner.borrow().last().map(|(_, e)| e.clone())
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl ObjectiveObserver for EventLog {
    fn on_event(&mut self, objective: ObjectiveId, event: &ObjectiveEvent) {
        self.inner.borrow_mut().push((objective, event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observers_run_in_subscription_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();

        let first = Rc::clone(&order);
        channel.subscribe(move |_: ObjectiveId, _: &ObjectiveEvent| first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        channel.subscribe(move |_: ObjectiveId, _: &ObjectiveEvent| second.borrow_mut().push(2));

        channel.emit(ObjectiveId(0), ObjectiveEvent::GhostCleared);
        channel.emit(ObjectiveId(0), ObjectiveEvent::PingCleared);
        assert_eq!(*order.borrow(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_event_log_records_clones() {
        let log = EventLog::new();
        let mut channel = EventChannel::new();
        channel.subscribe(log.clone());

        channel.emit(ObjectiveId(3), ObjectiveEvent::HolderChanged { holder: Some(HolderId(1)) });
        assert_eq!(log.count("holder_changed"), 1);
        assert_eq!(log.events()[0].0, ObjectiveId(3));

        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event =
            ObjectiveEvent::Scored { reason: ScoreReason::Captured, scorer: Some(HolderId(4)) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "scored");
        assert_eq!(json["reason"], "captured");
    }
}
