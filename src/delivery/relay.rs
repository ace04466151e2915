use crate::{delivery::{Delivery, DeliveryReceipt, DeliveryRequest},
            error::{ExportError, Result},
            export::ExportFormat};
use tokio::{sync::{mpsc, oneshot}, task::JoinHandle};

/// Requests that can wait in the relay before senders are held up
const RELAY_CAPACITY: usize = 8;

struct Envelope {
    request: DeliveryRequest,
    reply: oneshot::Sender<Result<DeliveryReceipt>>,
}

/// Sending half of the delivery relay
#[derive(Clone)]
pub struct DeliverySender {
    tx: mpsc::Sender<Envelope>,
}

impl DeliverySender {
    /// Queue a document for delivery
    ///
    /// Returns once the request is queued; the outcome arrives through the
    /// returned [`PendingDelivery`].
    pub async fn dispatch(&self, request: DeliveryRequest) -> Result<PendingDelivery> {
        let format = request.payload.format();
        let (reply, rx) = oneshot::channel();

        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| ExportError::DeliveryUnavailable("delivery relay has shut down".to_string()))?;

        log::debug!("Dispatched {} document for delivery", format);
        Ok(PendingDelivery { format, rx })
    }
}

/// Outcome of a dispatched delivery, available once it completes
#[derive(Debug)]
pub struct PendingDelivery {
    format: ExportFormat,
    rx: oneshot::Receiver<Result<DeliveryReceipt>>,
}

impl PendingDelivery {
    /// Format of the document being delivered
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Wait for the delivery collaborator to finish
    pub async fn wait(self) -> Result<DeliveryReceipt> {
        self.rx.await.map_err(|_| {
            ExportError::DeliveryUnavailable("delivery relay dropped the request".to_string())
        })?
    }
}

/// Start a relay task that feeds requests to `delivery`, one at a time
///
/// The task ends when every [`DeliverySender`] has been dropped.
pub fn spawn<D>(delivery: D) -> (DeliverySender, JoinHandle<()>)
where
    D: Delivery + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Envelope>(RELAY_CAPACITY);

    let handle = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let outcome = delivery.deliver(&envelope.request).await;
            if let Err(e) = &outcome {
                log::warn!("Delivery of '{}' failed: {}", envelope.request.title, e);
            }
            // The requester may have stopped listening
            let _ = envelope.reply.send(outcome);
        }
        log::debug!("Delivery relay stopped");
    });

    (DeliverySender { tx }, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportPayload;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recording {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Delivery for Recording {
        async fn deliver(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt> {
            self.seen.lock().unwrap().push(request.title.clone());
            Ok(DeliveryReceipt {
                path: PathBuf::from(format!("{}{}", request.title, request.payload.format().extension())),
                bytes: request.payload.body()?.len(),
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl Delivery for Failing {
        async fn deliver(&self, _request: &DeliveryRequest) -> Result<DeliveryReceipt> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn request(title: &str) -> DeliveryRequest {
        DeliveryRequest {
            payload: ExportPayload::Markdown("# hi".to_string()),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_and_wait() {
        let recording = Recording::default();
        let (sender, handle) = spawn(recording.clone());

        let pending = sender.dispatch(request("chat")).await.unwrap();
        assert_eq!(pending.format(), ExportFormat::Markdown);

        let receipt = pending.wait().await.unwrap();
        assert_eq!(receipt.path, PathBuf::from("chat.md"));
        assert_eq!(receipt.bytes, 4);

        drop(sender);
        handle.await.unwrap();
        assert_eq!(*recording.seen.lock().unwrap(), vec!["chat".to_string()]);
    }

    #[tokio::test]
    async fn test_requests_delivered_in_order() {
        let recording = Recording::default();
        let (sender, handle) = spawn(recording.clone());

        let first = sender.dispatch(request("one")).await.unwrap();
        let second = sender.dispatch(request("two")).await.unwrap();
        second.wait().await.unwrap();
        first.wait().await.unwrap();

        drop(sender);
        handle.await.unwrap();
        assert_eq!(*recording.seen.lock().unwrap(), vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let (sender, _handle) = spawn(Failing);

        let pending = sender.dispatch(request("chat")).await.unwrap();
        let err = pending.wait().await.unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown() {
        let (sender, handle) = spawn(Recording::default());
        handle.abort();
        let _ = handle.await;

        let result = sender.dispatch(request("late")).await;
        assert!(matches!(result, Err(ExportError::DeliveryUnavailable(_))));
    }
}
