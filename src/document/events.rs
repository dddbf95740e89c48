use std::sync::mpsc;

/// Events emitted by the document manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A file was loaded; carries the new text
    FileRead { text: String },
    /// The document was cleared; text is always empty
    Reset { text: String },
}

impl DocumentEvent {
    /// Canonical event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "read-file",
            Self::Reset { .. } => "reset-file",
        }
    }

    /// Text carried by the event
    pub fn text(&self) -> &str {
        match self {
            Self::FileRead { text } | Self::Reset { text } => text,
        }
    }
}

/// Fan-out of document events to any number of listeners
#[derive(Debug, Default)]
pub struct EventHub {
    listeners: Vec<mpsc::Sender<DocumentEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<DocumentEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Deliver an event to every live listener, dropping disconnected ones
    pub fn emit(&mut self, event: DocumentEvent) {
        tracing::trace!("Emitting {} to {} listener(s)", event.name(), self.listeners.len());
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
