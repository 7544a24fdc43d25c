use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use wedplan_core::notification::{role_room, user_room};
use wedplan_core::types::{DbId, Timestamp};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    pub user_id: DbId,
    /// Rooms this connection receives pushes for.
    pub rooms: HashSet<String>,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Wire shape of a pushed event: `{ "event": ..., "data": ... }`.
#[derive(Debug, Serialize)]
pub struct PushEvent<'a, T: Serialize> {
    pub event: &'a str,
    pub data: &'a T,
}

/// Manages all active WebSocket connections.
///
/// Every connection joins the `user:{id}` room of its user and the
/// `role:{role}` room of its role. Thread-safe via interior `RwLock`; wrap in
/// `Arc` to share.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection for an authenticated user.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
        role: &str,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let rooms = HashSet::from([user_room(user_id), role_room(role)]);
        let conn = WsConnection {
            user_id,
            rooms,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Send a message to every connection in `room`.
    ///
    /// Closed channels are skipped; they are cleaned up when their receive
    /// loop ends. Returns the number of connections the message was queued on.
    pub async fn send_to_room(&self, room: &str, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values().filter(|c| c.rooms.contains(room)) {
            if conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Serialize `data` as a `{ event, data }` text frame and push it to `room`.
    pub async fn emit<T: Serialize>(
        &self,
        room: &str,
        event: &str,
        data: &T,
    ) -> Result<usize, serde_json::Error> {
        let text = serde_json::to_string(&PushEvent { event, data })?;
        Ok(self.send_to_room(room, Message::Text(text.into())).await)
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn text(msg: Message) -> Value {
        match msg {
            Message::Text(t) => serde_json::from_str(t.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pushes_reach_user_and_role_rooms() {
        let manager = WsManager::new();
        let mut admin = manager.add("a".into(), 1, "admin").await;
        let mut vendor = manager.add("v".into(), 2, "vendor").await;

        let sent = manager
            .emit("role:admin", "new_notification", &json!({ "id": 7 }))
            .await
            .unwrap();
        assert_eq!(sent, 1);
        let frame = text(admin.try_recv().unwrap());
        assert_eq!(frame["event"], "new_notification");
        assert_eq!(frame["data"]["id"], 7);
        assert!(vendor.try_recv().is_err());

        assert_eq!(manager.emit("user:2", "new_notification", &json!({})).await.unwrap(), 1);
        assert!(vendor.try_recv().is_ok());
        assert!(admin.try_recv().is_err());
    }

    #[tokio::test]
    async fn removed_connections_receive_nothing() {
        let manager = WsManager::new();
        let _rx = manager.add("a".into(), 1, "admin").await;
        manager.remove("a").await;
        assert_eq!(manager.connection_count().await, 0);
        assert_eq!(manager.send_to_room("user:1", Message::Close(None)).await, 0);
    }

    #[tokio::test]
    async fn shutdown_sends_close_frames() {
        let manager = WsManager::new();
        let mut rx = manager.add("a".into(), 1, "team_member").await;
        assert_eq!(manager.connection_count().await, 1);
        manager.shutdown_all().await;
        assert!(matches!(rx.try_recv().unwrap(), Message::Close(None)));
        assert_eq!(manager.connection_count().await, 0);
    }
}
