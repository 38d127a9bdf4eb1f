//! Player session event listener

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::session::SessionEvent;
use super::AppController;

impl AppController {
    /// Mirror session events into the status panel; failures also raise the
    /// error overlay.
    pub fn start_session_event_listener(&self, mut events: UnboundedReceiver<SessionEvent>) -> JoinHandle<()> {
        let model = self.model.clone();
        tracing::info!("Starting player session event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if model.should_quit().await {
                    tracing::debug!("Session event listener shutting down");
                    break;
                }

                if let SessionEvent::Superseded { reference } = &event {
                    tracing::trace!(reference = %reference, "Superseded request dropped");
                    continue;
                }

                let line = event.status_line();
                tracing::trace!(status = %line, "SessionEvent");
                if event.is_failure() {
                    model.set_error(line.clone()).await;
                }
                model.push_status(line).await;
            }
        })
    }
}
