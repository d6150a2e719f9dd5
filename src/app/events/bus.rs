//! Event-Bus: ein typisierter Kanal pro Event-Art, höchstens ein Handler je Kanal.

use super::event::*;
use crate::app::EventLog;
use std::fmt;

/// Ein typisierter Kanal mit höchstens einem Handler.
pub struct Channel<E> {
    handler: Option<Box<dyn FnMut(&E)>>,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self { handler: None }
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscribed", &self.handler.is_some())
            .finish()
    }
}

impl<E> Channel<E> {
    /// Registriert den Handler. Ein vorhandener Handler wird ersetzt;
    /// Rückgabe `true`, wenn das der Fall war.
    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> bool {
        self.handler.replace(Box::new(handler)).is_some()
    }

    /// Entfernt den Handler
    pub fn unsubscribe(&mut self) {
        self.handler = None;
    }

    /// Ist ein Handler registriert?
    pub fn is_subscribed(&self) -> bool {
        self.handler.is_some()
    }

    fn deliver(&mut self, event: &E) -> bool {
        match self.handler.as_mut() {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

/// Event-Bus der Ansicht: ein Kanal pro Event-Art.
///
/// Jedes Event wird zusätzlich im begrenzten [`EventLog`] und in der
/// Ausgangs-Queue abgelegt, aus der ein Controller die Events einer Geste
/// gesammelt abholen kann.
#[derive(Debug)]
pub struct EventBus {
    /// `node:selected`
    pub node_selected: Channel<NodeSelected>,
    /// `node:move`
    pub node_move: Channel<NodeMove>,
    /// `node:remove`
    pub node_remove: Channel<NodeRemove>,
    /// `edge:move`
    pub edge_move: Channel<EdgeMove>,
    /// `edge:connectionSrc`
    pub edge_connection_src: Channel<EdgeConnection>,
    /// `edge:connectionDst`
    pub edge_connection_dst: Channel<EdgeConnection>,
    /// `edge:combine`
    pub edge_combine: Channel<EdgeCombine>,
    /// `edge:remove`
    pub edge_remove: Channel<EdgeRemove>,
    /// `trigger:update`
    pub trigger_update: Channel<TriggerUpdate>,
    /// `trigger:remove`
    pub trigger_remove: Channel<TriggerRemove>,
    /// `action:update`
    pub action_update: Channel<ActionUpdate>,
    /// `object:deselected`
    pub object_deselected: Channel<ObjectDeselected>,
    log: EventLog,
    outbox: Vec<ViewEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EventLog::DEFAULT_LIMIT)
    }
}

impl EventBus {
    /// Erstellt einen Bus ohne Handler mit begrenztem Log
    pub fn new(log_limit: usize) -> Self {
        Self {
            node_selected: Channel::default(),
            node_move: Channel::default(),
            node_remove: Channel::default(),
            edge_move: Channel::default(),
            edge_connection_src: Channel::default(),
            edge_connection_dst: Channel::default(),
            edge_combine: Channel::default(),
            edge_remove: Channel::default(),
            trigger_update: Channel::default(),
            trigger_remove: Channel::default(),
            action_update: Channel::default(),
            object_deselected: Channel::default(),
            log: EventLog::with_limit(log_limit),
            outbox: Vec::new(),
        }
    }

    /// Stellt ein Event an den Handler seiner Art zu.
    pub fn emit(&mut self, event: ViewEvent) {
        let delivered = match &event {
            ViewEvent::NodeSelected(e) => self.node_selected.deliver(e),
            ViewEvent::NodeMove(e) => self.node_move.deliver(e),
            ViewEvent::NodeRemove(e) => self.node_remove.deliver(e),
            ViewEvent::EdgeMove(e) => self.edge_move.deliver(e),
            ViewEvent::EdgeConnectionSrc(e) => self.edge_connection_src.deliver(e),
            ViewEvent::EdgeConnectionDst(e) => self.edge_connection_dst.deliver(e),
            ViewEvent::EdgeCombine(e) => self.edge_combine.deliver(e),
            ViewEvent::EdgeRemove(e) => self.edge_remove.deliver(e),
            ViewEvent::TriggerUpdate(e) => self.trigger_update.deliver(e),
            ViewEvent::TriggerRemove(e) => self.trigger_remove.deliver(e),
            ViewEvent::ActionUpdate(e) => self.action_update.deliver(e),
            ViewEvent::ObjectDeselected(e) => self.object_deselected.deliver(e),
        };
        if !delivered {
            log::debug!("Kein Handler für {}", event.name());
        }

        self.log.record(event.clone());
        self.outbox.push(event);
    }

    /// Holt alle seit dem letzten Aufruf ausgelösten Events ab
    pub fn take_emitted(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Begrenzter Verlauf aller Events
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}
