use crossbeam_channel::{unbounded, Receiver, Sender};
use lineascope_core::{AssetId, LineageDirection, LineageEdge, LineageNode, ResolvedColumn};
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // ========================================================================
    // Pointer input (canvas coordinates)
    // ========================================================================
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    Click {
        x: f32,
        y: f32,
    },

    // ========================================================================
    // View commands
    // ========================================================================
    /// Focus a different asset. The current graph is kept until the new
    /// lineage result arrives (a failed fetch must leave it intact).
    SelectAsset {
        id: AssetId,
        direction: LineageDirection,
        depth: u32,
    },
    ExpandNode {
        id: AssetId,
    },
    CollapseNode {
        id: AssetId,
    },
    /// Flip between normal interaction and relationship-authoring clicks.
    EditMode {
        enabled: bool,
    },
    ClearGraph,
    FitToContent,

    // ========================================================================
    // Data completions (the other end of a fetch command)
    // ========================================================================
    /// A fresh lineage query result. Replaces the whole graph.
    LineageLoaded {
        nodes: Vec<LineageNode>,
        edges: Vec<LineageEdge>,
    },
    LineageFailed {
        error: String,
    },
    /// Column lineage resolved for one asset. `generation` must match the
    /// node's current generation or the payload is discarded as stale.
    ColumnDataLoaded {
        asset_id: AssetId,
        generation: u64,
        columns: Vec<ResolvedColumn>,
    },
    ColumnDataFailed {
        asset_id: AssetId,
        generation: u64,
        error: String,
    },

    // ========================================================================
    // Relationship authoring
    // ========================================================================
    RelationshipCreated {
        id: String,
    },
    RelationshipDeleted {
        id: String,
    },

    // ========================================================================
    // Notifications
    // ========================================================================
    ShowNotice {
        level: NoticeLevel,
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        bus.publish(Event::ExpandNode {
            id: AssetId::new("dw.fact_orders"),
        });

        let received = bus.receiver().recv().unwrap();
        match received {
            Event::ExpandNode { id } => assert_eq!(id.as_str(), "dw.fact_orders"),
            _ => panic!("Expected ExpandNode event"),
        }
    }

    #[test]
    fn test_dispatch_to_drains_queue_in_order() {
        struct Recorder(Vec<String>);
        impl EventListener for Recorder {
            fn handle_event(&mut self, event: &Event) {
                if let Event::ShowNotice { message, .. } = event {
                    self.0.push(message.clone());
                }
            }
        }

        let bus = EventBus::new();
        bus.publish(Event::ShowNotice {
            level: NoticeLevel::Info,
            message: "first".to_string(),
        });
        bus.publish(Event::ShowNotice {
            level: NoticeLevel::Warning,
            message: "second".to_string(),
        });

        let mut recorder = Recorder(Vec::new());
        bus.dispatch_to(&mut recorder);
        assert_eq!(recorder.0, vec!["first", "second"]);
    }

    #[test]
    fn test_column_data_event_carries_generation() {
        let bus = EventBus::new();
        bus.publish(Event::ColumnDataLoaded {
            asset_id: AssetId::new("a"),
            generation: 3,
            columns: vec![],
        });

        match bus.receiver().recv().unwrap() {
            Event::ColumnDataLoaded { generation, .. } => assert_eq!(generation, 3),
            _ => panic!("Expected ColumnDataLoaded"),
        }
    }
}
