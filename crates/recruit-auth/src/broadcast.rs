//! 프로필 사진 변경 브로드캐스트.
//!
//! 프로필 편집기가 발행하고, 구독자는 소유권 없이 듣기만 합니다.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// 이벤트 이름.
pub const PHOTO_UPDATED_EVENT: &str = "photoUpdated";

/// 사진 변경 이벤트 페이로드 (`{"photoUrl": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdated {
    pub photo_url: String,
}

/// 사진 변경 이벤트 버스.
#[derive(Debug, Clone)]
pub struct PhotoBus {
    sender: broadcast::Sender<PhotoUpdated>,
}

impl PhotoBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 이벤트 발행. 이벤트를 받은 구독자 수를 반환하며, 구독자가 없어도 에러가 아닙니다.
    pub fn publish(&self, photo_url: impl Into<String>) -> usize {
        let event = PhotoUpdated {
            photo_url: photo_url.into(),
        };
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event = PHOTO_UPDATED_EVENT, delivered, "Photo update published");
        delivered
    }

    /// 구독.
    pub fn subscribe(&self) -> broadcast::Receiver<PhotoUpdated> {
        self.sender.subscribe()
    }
}

impl Default for PhotoBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let event = PhotoUpdated {
            photo_url: "https://cdn.example.com/a.png".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"photoUrl": "https://cdn.example.com/a.png"})
        );
    }

    #[tokio::test]
    async fn test_publish_without_listeners() {
        let bus = PhotoBus::default();
        assert_eq!(bus.publish("x.png"), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.publish("y.png"), 1);
        assert_eq!(rx.recv().await.unwrap().photo_url, "y.png");
    }
}
