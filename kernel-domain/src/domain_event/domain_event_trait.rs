use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 领域事件是已经发生的事实：
/// - `occurred_at` 在构造时以 `Utc::now()` 一次性确定，不提供修改入口；
/// - 载荷在构造时从来源（通常是聚合）拷贝出快照，事件创建后来源的
///   变化不影响事件内容；
/// - `as_any` 暴露具体运行时类型，供分发器按确切类型路由。
pub trait DomainEvent: Send + Sync + fmt::Debug + 'static {
    /// 事件类型的稳定名称（形如 `customer.renamed`，不要依赖 `type_name`）
    fn event_type(&self) -> &'static str;

    /// 事件发生时间（构造时打点的 UTC 时间）
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 以 `Any` 形式暴露自身，供向下转型到具体事件类型
    fn as_any(&self) -> &dyn Any;
}
