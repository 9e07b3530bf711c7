use crate::{
    command::Command, command_bus::CommandBus, command_handler::CommandHandler,
    context::AppContext, error::AppError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type CmdHandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>>;

type CmdHandlerFn =
    Arc<dyn for<'a> Fn(Box<dyn Any + Send>, &'a AppContext) -> CmdHandlerFuture<'a> + Send + Sync>;

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 注册不同 Command 对应的 Handler，一个命令类型一个处理器；
/// - 重复注册同一命令类型是错误；
/// - 运行时以类型擦除（Any）方式调度。
pub struct InMemoryCommandBus {
    handlers: DashMap<TypeId, (&'static str, CmdHandlerFn)>,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器；同一命令类型重复注册返回 `AlreadyRegistered`
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();

        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegistered(C::NAME));
        }

        let f: CmdHandlerFn = {
            let handler = handler.clone();

            Arc::new(move |boxed_cmd, ctx| {
                let handler = handler.clone();

                Box::pin(async move {
                    // 注册键与闭包捕获同一泛型 C，正常情况下 downcast 不会失败
                    match boxed_cmd.downcast::<C>() {
                        Ok(cmd) => handler.handle(ctx, *cmd).await,
                        Err(_) => Err(AppError::TypeMismatch {
                            expected: C::NAME,
                            found: "unknown",
                        }),
                    }
                })
            })
        };

        self.handlers.insert(key, (C::NAME, f));
        Ok(())
    }

    /// 已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|entry| entry.value().0).collect()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>
    where
        C: Command,
    {
        // 取消信号在处理器解析之前检查
        if ctx.is_cancelled() {
            return Err(AppError::Cancelled(C::NAME));
        }

        let Some(f) = self.handlers.get(&TypeId::of::<C>()).map(|h| h.value().1.clone()) else {
            return Err(AppError::HandlerNotFound(C::NAME));
        };

        (f)(Box::new(cmd), ctx).await
    }
}
