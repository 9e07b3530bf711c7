//! 应用层上下文（AppContext）
//!
//! 承载一次应用层调用（命令/查询）的横切信息：链路追踪标识、
//! 操作主体与取消信号。总线在解析处理器前检查取消信号；
//! 已进入处理器的调用由处理器自身决定是否继续响应取消。
//!
use bon::Builder;
use tokio_util::sync::CancellationToken;

/// 一次命令/查询调用的横切上下文
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 关联ID（链路追踪）
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 触发调用的主体类型（如用户、系统）
    actor_type: Option<String>,
    /// 触发调用的主体ID
    actor_id: Option<String>,
    /// 取消信号
    #[builder(default)]
    cancellation: CancellationToken,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
