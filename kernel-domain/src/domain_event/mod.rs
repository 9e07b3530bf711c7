//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`）、聚合的待分发缓冲
//! （`PendingEvents`）与属性变更载荷（`FieldChanged`）。

mod domain_event_trait;
mod field_changed;
mod pending_events;

pub use domain_event_trait::DomainEvent;
pub use field_changed::FieldChanged;
pub use pending_events::PendingEvents;
