//! DDD 共享内核领域层（kernel-domain）
//!
//! 提供以 DDD 为中心的通用构件，用于在应用中实现：
//! - 实体（`entity`）：基于标识的相等语义
//! - 领域事件（`domain_event`）：不可变事实与聚合的待分发缓冲
//! - 聚合根（`aggregate`）：一致性边界与事件来源
//! - 事件分发（`eventing`）：处理器契约、类型键注册表与分发器
//! - 规约（`specification`）与值对象（`value_object`）等通用模式
//!
//! 本 crate 不做持久化、传输与 UI；仓储、查询引擎等协作方通过
//! 窄接口接入（如 `eventing::HandlerResolver`）。
//!
//! 典型用法：
//! 1. 定义聚合，在状态变更方法内向私有缓冲记录事件；
//! 2. 启动时向 `InMemoryHandlerRegistry` 注册各事件类型的处理器；
//! 3. 编排方在提交成功后取走聚合缓冲中的事件，逐个交给
//!    `InMemoryEventDispatcher` 分发；
//! 4. 查询侧以 `QuerySpecification` 描述过滤/排序/分页意图，
//!    由外部查询引擎解释执行。
//!
pub mod aggregate;
pub mod domain_event;
pub mod entity;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod specification;
pub mod value_object;
