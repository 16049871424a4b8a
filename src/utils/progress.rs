use tokio::sync::mpsc;

/// Forwards progress messages to whoever renders them, usually a CLI spinner.
pub struct ProgressReporter(Option<mpsc::UnboundedSender<String>>);

impl ProgressReporter {
    pub fn new(tx: Option<mpsc::UnboundedSender<String>>) -> Self {
        Self(tx)
    }

    /// Reporter that discards every message.
    pub fn silent() -> Self {
        Self(None)
    }

    pub fn report(&self, message: impl Into<String>) {
        if let Some(tx) = &self.0 {
            // The receiver going away only means nobody is watching anymore.
            let _ = tx.send(message.into());
        }
    }
}
