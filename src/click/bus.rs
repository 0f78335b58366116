//! # 事件总线
//!
//! ## 设计思路
//!
//! 显式的总线对象替代进程级全局事件流：由宿主持有，可被任意多次订阅，
//! 每个订阅者从订阅时刻起收到之后发布的每一个事件（不回放历史、无缓冲上限）。
//!
//! ## 实现思路
//!
//! 每个订阅者一条 `tokio::sync::mpsc` 无界通道；发布时逐个克隆发送，
//! 接收端已关闭的订阅者在发布时顺手清理。

use std::sync::Mutex;

use tokio::sync::mpsc;

/// 多订阅者广播总线。
pub struct EventBus<T> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<T>>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新建订阅；只会收到订阅之后发布的事件。
    pub fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        match self.subscribers.lock() {
            Ok(mut guard) => guard.push(sender),
            Err(_) => log::error!("❌ 事件总线订阅者锁已中毒，订阅将收不到事件"),
        }
        Subscription { receiver }
    }

    /// 发布事件，返回成功投递的订阅者数量。
    pub fn publish(&self, event: T) -> usize {
        let mut guard = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!("❌ 事件总线订阅者锁已中毒，事件被丢弃");
                return 0;
            }
        };

        guard.retain(|sender| sender.send(event.clone()).is_ok());
        guard.len()
    }
}

/// 单个订阅者的接收端，丢弃即退订。
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// 等待下一个事件；总线被丢弃后返回 `None`。
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// 非阻塞地取出一个已到达的事件。
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_every_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(1u32), 2);
        assert_eq!(bus.publish(2u32), 2);

        assert_eq!(first.try_recv(), Some(1));
        assert_eq!(first.try_recv(), Some(2));
        assert_eq!(second.try_recv(), Some(1));
        assert_eq!(second.try_recv(), Some(2));
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn late_subscriber_gets_no_replay() {
        let bus = EventBus::new();
        let mut early = bus.subscribe();
        bus.publish("before");

        let mut late = bus.subscribe();
        bus.publish("after");

        assert_eq!(early.try_recv(), Some("before"));
        assert_eq!(early.try_recv(), Some("after"));
        assert_eq!(late.try_recv(), Some("after"));
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_publish() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        drop(dropped);

        assert_eq!(bus.publish(7u8), 1);
        assert_eq!(bus.publish(9u8), 1);
        drop(kept);
        assert_eq!(bus.publish(8u8), 0);
    }

    #[tokio::test]
    async fn recv_waits_for_published_event() {
        let bus = std::sync::Arc::new(EventBus::new());
        let mut sub = bus.subscribe();

        let publisher = std::sync::Arc::clone(&bus);
        tokio::spawn(async move {
            publisher.publish(String::from("tap"));
        });

        assert_eq!(sub.recv().await.as_deref(), Some("tap"));
    }
}
