use crate::{context::AppContext, error::AppError, query::Query};
use async_trait::async_trait;

/// 查询总线（Query Bus）
///
/// - 按查询的具体类型路由到唯一对应的处理器；
/// - 分发前检查上下文的取消信号；
/// - 对外返回与查询关联的 DTO 类型。
#[async_trait]
pub trait QueryBus: Send + Sync {
    /// 分发查询到对应处理器，返回该查询的 DTO
    async fn dispatch<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query;
}
