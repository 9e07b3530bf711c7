//! 事件处理器契约（Handle）
//!
//! 处理器是外部能力，不属于内核本身；每个处理器只针对一个具体事件类型。
//!
use crate::domain_event::DomainEvent;
use async_trait::async_trait;

/// 针对单一事件类型 `E` 的处理器
///
/// 分发器只调用异步入口 `handle`。`handle_blocking` 仅为无法 await 的
/// 调用方提供，在当前线程上驱动 `handle` 完成；二者实现其一即可，
/// 另一个作为薄包装。
///
/// 同一事件类型的多个处理器之间没有顺序约定，实现时不要依赖
/// 相对执行顺序。
#[async_trait]
pub trait Handle<E: DomainEvent>: Send + Sync {
    /// 处理事件；失败以 `anyhow::Error` 报告给分发器
    async fn handle(&self, event: &E) -> anyhow::Result<()>;

    /// 在当前线程阻塞驱动 `handle` 完成；不要在异步运行时内调用
    fn handle_blocking(&self, event: &E) -> anyhow::Result<()> {
        futures_executor::block_on(self.handle(event))
    }

    /// 处理器名称，用于失败归因
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
