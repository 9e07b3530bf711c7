use crate::{
    context::AppContext, error::AppError, query::Query, query_bus::QueryBus,
    query_handler::QueryHandler,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxAnySend = Box<dyn Any + Send>;

type QueryHandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

type QueryHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> QueryHandlerFuture<'a> + Send + Sync>;

/// 基于内存的 QueryBus 实现
/// - 通过 TypeId 注册不同 Query 对应的 Handler，一个查询类型一个处理器；
/// - 重复注册同一查询类型是错误；
/// - 以类型擦除方式调度，并在调用端还原 DTO 类型。
pub struct InMemoryQueryBus {
    handlers: DashMap<TypeId, (&'static str, QueryHandlerFn)>,
}

impl Default for InMemoryQueryBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册查询处理器；同一查询类型重复注册返回 `AlreadyRegistered`
    pub fn register<Q, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let key = TypeId::of::<Q>();

        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegistered(Q::NAME));
        }

        let f: QueryHandlerFn = {
            let handler = handler.clone();

            Arc::new(move |boxed_q, ctx| {
                let handler = handler.clone();

                Box::pin(async move {
                    match boxed_q.downcast::<Q>() {
                        Ok(q) => {
                            let dto = handler.handle(ctx, *q).await?;
                            Ok(Box::new(dto) as BoxAnySend)
                        }
                        Err(_) => Err(AppError::TypeMismatch {
                            expected: Q::NAME,
                            found: "unknown",
                        }),
                    }
                })
            })
        };

        self.handlers.insert(key, (Q::NAME, f));
        Ok(())
    }

    /// 已注册的查询名列表（只读视图）
    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|entry| entry.value().0).collect()
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query,
    {
        // 取消信号在处理器解析之前检查
        if ctx.is_cancelled() {
            return Err(AppError::Cancelled(Q::NAME));
        }

        let Some(f) = self.handlers.get(&TypeId::of::<Q>()).map(|h| h.value().1.clone()) else {
            return Err(AppError::HandlerNotFound(Q::NAME));
        };

        let out = (f)(Box::new(q), ctx).await?;

        match out.downcast::<Q::Dto>() {
            Ok(dto) => Ok(*dto),
            Err(_) => Err(AppError::TypeMismatch {
                expected: Q::NAME,
                found: "unknown",
            }),
        }
    }
}
