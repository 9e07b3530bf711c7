//! 领域事件分发器（EventDispatcher）
//!
//! 给定一个事件实例：
//! - 取其最具体的运行时类型（`as_any().type_id()`）；
//! - 通过 `HandlerResolver` 查找为该确切类型注册的全部处理器，
//!   父类型或相关类型的处理器不参与；
//! - 逐个 await，快速失败：任一处理器失败即中止本次分发，后续处理器
//!   不再执行，错误携带失败处理器的名称与原因；
//! - 没有任何匹配处理器时视为成功的空操作。
//!
//! 分发器自身不产生副作用，也不做日志、重试或吞错；这些属于
//! 持有提交/回滚边界的编排层。
//!
use crate::domain_event::DomainEvent;
use crate::error::{DomainError, DomainResult};
use crate::eventing::registry::HandlerResolver;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 领域事件分发协议
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// 分发一个事件，await 全部匹配处理器完成
    async fn dispatch(&self, event: &dyn DomainEvent) -> DomainResult<()> {
        let cancellation = CancellationToken::new();
        self.dispatch_with(event, &cancellation).await
    }

    /// 带取消信号的分发
    ///
    /// 每个处理器启动前检查取消：已取消则跳过该处理器与其后的全部处理器，
    /// 返回 [`DomainError::DispatchCancelled`]。已在执行中的处理器由其
    /// 自身负责响应取消，分发器不强行打断。
    async fn dispatch_with(
        &self,
        event: &dyn DomainEvent,
        cancellation: &CancellationToken,
    ) -> DomainResult<()>;

    /// 在当前线程阻塞驱动分发完成，供非异步调用方使用；
    /// 不做 spawn-and-forget，也不要在异步运行时内调用
    fn dispatch_blocking(&self, event: &dyn DomainEvent) -> DomainResult<()> {
        futures_executor::block_on(self.dispatch(event))
    }
}

/// 以显式解析器依赖构造的内存分发器
///
/// 解析后端通过构造函数显式传入，不依赖任何全局容器或环境状态。
pub struct InMemoryEventDispatcher {
    resolver: Arc<dyn HandlerResolver>,
}

impl InMemoryEventDispatcher {
    pub fn new(resolver: Arc<dyn HandlerResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl EventDispatcher for InMemoryEventDispatcher {
    async fn dispatch_with(
        &self,
        event: &dyn DomainEvent,
        cancellation: &CancellationToken,
    ) -> DomainResult<()> {
        let handlers = self.resolver.resolve(event.as_any().type_id());

        for handler in handlers {
            if cancellation.is_cancelled() {
                return Err(DomainError::DispatchCancelled {
                    event_type: event.event_type().to_string(),
                });
            }
            handler.call(event).await?;
        }

        Ok(())
    }
}
