use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令处理器：每个命令类型恰好对应一个处理器
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}
