use std::ops::Deref;
use std::slice::Iter;
use std::sync::Arc;
use std::vec::IntoIter;

use super::DomainEvent;

/// 聚合的待分发事件缓冲，按记录顺序排列
///
/// - 追加（`record`）严格保序，允许逻辑上相同的事件出现多次；
/// - 读取（`as_slice` / 迭代）不消费缓冲，未变更时多次读取结果一致；
/// - 清空（`clear`）幂等；`take` 取走全部事件并留下空缓冲，
///   供编排方在提交成功后统一分发。
#[derive(Debug, Default)]
pub struct PendingEvents {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个事件；只应由聚合自身的状态变更方法调用
    pub fn record<E: DomainEvent>(&mut self, event: E) {
        self.events.push(Arc::new(event));
    }

    /// 获取事件列表的只读视图
    pub fn as_slice(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    /// 获取事件数量
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 判断是否为空
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 迭代事件引用（不消费缓冲）
    pub fn iter(&self) -> Iter<'_, Arc<dyn DomainEvent>> {
        self.events.iter()
    }

    /// 清空缓冲；对空缓冲调用是无副作用的空操作
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 取走全部事件，留下空缓冲
    pub fn take(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }
}

impl Deref for PendingEvents {
    type Target = [Arc<dyn DomainEvent>];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}

impl IntoIterator for PendingEvents {
    type Item = Arc<dyn DomainEvent>;
    type IntoIter = IntoIter<Arc<dyn DomainEvent>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a PendingEvents {
    type Item = &'a Arc<dyn DomainEvent>;
    type IntoIter = Iter<'a, Arc<dyn DomainEvent>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::any::Any;

    #[derive(Debug)]
    struct Numbered {
        n: usize,
        occurred_at: DateTime<Utc>,
    }

    impl Numbered {
        fn new(n: usize) -> Self {
            Self {
                n,
                occurred_at: Utc::now(),
            }
        }
    }

    impl DomainEvent for Numbered {
        fn event_type(&self) -> &'static str {
            "numbered"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.occurred_at
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn number_of(event: &Arc<dyn DomainEvent>) -> usize {
        event.as_any().downcast_ref::<Numbered>().unwrap().n
    }

    #[test]
    fn starts_empty() {
        let buffer = PendingEvents::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.as_slice().is_empty());
    }

    #[test]
    fn record_grows_by_one_and_preserves_order() {
        let mut buffer = PendingEvents::new();
        for n in 0..5 {
            buffer.record(Numbered::new(n));
            assert_eq!(buffer.len(), n + 1);
        }

        let order: Vec<usize> = buffer.iter().map(number_of).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    // 相同逻辑变更触发两次就是两条记录，不做去重
    #[test]
    fn duplicates_are_kept() {
        let mut buffer = PendingEvents::new();
        buffer.record(Numbered::new(1));
        buffer.record(Numbered::new(1));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn reads_are_not_destructive() {
        let mut buffer = PendingEvents::new();
        buffer.record(Numbered::new(1));
        buffer.record(Numbered::new(2));

        let first: Vec<usize> = buffer.iter().map(number_of).collect();
        let second: Vec<usize> = buffer.iter().map(number_of).collect();
        assert_eq!(first, second);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn clear_empties_and_is_idempotent() {
        let mut buffer = PendingEvents::new();
        buffer.record(Numbered::new(1));
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());

        // 对空缓冲重复清空是无副作用的空操作
        buffer.clear();
        assert!(buffer.is_empty());

        buffer.record(Numbered::new(2));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn take_drains_everything() {
        let mut buffer = PendingEvents::new();
        buffer.record(Numbered::new(1));
        buffer.record(Numbered::new(2));

        let drained = buffer.take();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
        assert_eq!(number_of(&drained[0]), 1);
        assert_eq!(number_of(&drained[1]), 2);
    }
}
