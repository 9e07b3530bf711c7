//! 处理器注册表（HandlerRegistry）
//!
//! 以事件具体类型的 `TypeId` 为键、类型擦除的适配器列表为值：
//! - 注册在启动阶段一次性完成，分发阶段只读；
//! - 同一事件类型可注册任意数量的处理器，列表保持注册顺序；
//! - 不使用运行时反射与全局容器，类型到处理器的映射全部显式注册。
//!
use crate::domain_event::DomainEvent;
use crate::error::{DomainError, DomainResult};
use crate::eventing::handler::Handle;
use dashmap::DashMap;
use std::any::TypeId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type ErasedHandlerFuture<'a> = Pin<Box<dyn Future<Output = DomainResult<()>> + Send + 'a>>;

type ErasedHandlerFn =
    Arc<dyn for<'a> Fn(&'a dyn DomainEvent) -> ErasedHandlerFuture<'a> + Send + Sync>;

/// 类型擦除后的事件处理器适配器
///
/// 持有处理器名称与一个擦除调用闭包；闭包内部将 `&dyn DomainEvent`
/// 向下转型回注册时的具体事件类型后调用原处理器，并把处理器的失败
/// 包装为携带处理器名称的 [`DomainError::EventHandler`]。
#[derive(Clone)]
pub struct ErasedEventHandler {
    name: Arc<str>,
    invoke: ErasedHandlerFn,
}

impl ErasedEventHandler {
    /// 将类型化处理器包装为擦除适配器
    pub fn new<E, H>(handler: Arc<H>) -> Self
    where
        E: DomainEvent,
        H: Handle<E> + 'static,
    {
        let name: Arc<str> = Arc::from(handler.handler_name());
        let invoke: ErasedHandlerFn = {
            let name = name.clone();
            Arc::new(move |event: &dyn DomainEvent| {
                let handler = handler.clone();
                let name = name.clone();
                Box::pin(async move {
                    // 注册键与闭包捕获同一泛型 E，正常情况下转型不会失败
                    match event.as_any().downcast_ref::<E>() {
                        Some(typed) => handler.handle(typed).await.map_err(|err| {
                            DomainError::event_handler(name.as_ref(), format!("{err:#}"))
                        }),
                        None => Err(DomainError::TypeMismatch {
                            expected: std::any::type_name::<E>().to_string(),
                            found: event.event_type().to_string(),
                        }),
                    }
                })
            })
        };

        Self { name, invoke }
    }

    /// 处理器名称（注册时从处理器实例取得）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 调用适配器处理给定事件
    pub async fn call(&self, event: &dyn DomainEvent) -> DomainResult<()> {
        (self.invoke)(event).await
    }
}

/// 处理器解析协议：按事件具体类型返回全部已注册处理器
///
/// 这是内核对外唯一必需的集成点：任何注册表、服务定位器或静态映射，
/// 实现该协议后都可以作为分发器的解析后端。对分发器而言解析是只读的。
pub trait HandlerResolver: Send + Sync {
    /// 返回为该 `TypeId` 注册的全部处理器（注册顺序）；没有则为空列表
    fn resolve(&self, event_type_id: TypeId) -> Vec<ErasedEventHandler>;
}

/// 基于内存的处理器注册表
pub struct InMemoryHandlerRegistry {
    handlers: DashMap<TypeId, Vec<ErasedEventHandler>>,
}

impl Default for InMemoryHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为事件类型 `E` 注册一个处理器；同一类型可注册多个
    pub fn register<E, H>(&self, handler: Arc<H>)
    where
        E: DomainEvent,
        H: Handle<E> + 'static,
    {
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(ErasedEventHandler::new::<E, H>(handler));
    }

    /// 已注册处理器总数（跨全部事件类型）
    pub fn len(&self) -> usize {
        self.handlers.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandlerResolver for InMemoryHandlerRegistry {
    fn resolve(&self, event_type_id: TypeId) -> Vec<ErasedEventHandler> {
        self.handlers
            .get(&event_type_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
