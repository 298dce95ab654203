use flume::{Receiver, Sender, WeakSender};
use tokio::sync::oneshot::channel as oneshot_channel;

use crate::dto::command::{Command, Responder};
use crate::error::PlayerError;

pub(crate) fn inbox() -> (InboxSender, Receiver<Command>) {
    let (tx, rx) = flume::unbounded();
    (InboxSender { tx }, rx)
}

/// Sending half of a room's inbox. Commands and transport events share the same queue, so the
/// player sees them strictly in arrival order.
#[derive(Clone, Debug)]
pub(crate) struct InboxSender {
    tx: Sender<Command>,
}

impl InboxSender {
    pub(crate) async fn request<T>(
        &self,
        command: impl FnOnce(Responder<T>) -> Command,
    ) -> Result<T, PlayerError> {
        let (oneshot_tx, oneshot_rx) = oneshot_channel();
        self.tx
            .send_async(command(oneshot_tx))
            .await
            .map_err(|_| PlayerError::Closed)?;
        oneshot_rx.await.map_err(|_| PlayerError::Closed)
    }

    /// A handle that does not keep the player task alive.
    pub(crate) fn downgrade(&self) -> WeakSender<Command> {
        self.tx.downgrade()
    }

    pub(crate) fn same_inbox(&self, other: &Self) -> bool {
        self.tx.same_channel(&other.tx)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.tx.is_disconnected()
    }
}
