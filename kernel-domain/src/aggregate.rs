//! 聚合根（Aggregate Root）抽象
//!
//! 聚合根是一致性边界，也是自身领域事件的唯一来源：
//! - 状态变更方法在修改状态的同时向私有缓冲记录事件；
//! - 聚合从不分发自己的事件；由编排方在提交成功后读取、分发并清空。
//!   这一解耦保证只有提交成功的变更才会对外广播。
//!
use crate::domain_event::PendingEvents;
use crate::entity::Entity;

/// 聚合根接口
///
/// 实现方持有一个私有的 [`PendingEvents`] 字段：`events` 返回其只读视图，
/// `clear_events` 清空它。事件追加（`PendingEvents::record`）只应发生在
/// 聚合自身的状态变更方法内部，不要为外部调用方提供追加入口。
///
/// 缓冲不是线程安全的；同一聚合实例的并发修改由调用方串行化
/// （通常一个实例同一时刻只属于一个工作单元）。
pub trait AggregateRoot: Entity {
    /// 自构造或上次清空以来记录的事件（只读、保序、可重复读取）
    fn events(&self) -> &PendingEvents;

    /// 清空事件缓冲；对空缓冲调用是无副作用的空操作
    fn clear_events(&mut self);
}
