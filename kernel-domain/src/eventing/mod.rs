//! 事件分发子系统（eventing）
//!
//! 提供领域事件从聚合缓冲到处理器的进程内分发：
//! - `Handle<E>`：针对单一事件类型的处理器契约；
//! - `HandlerResolver` / `InMemoryHandlerRegistry`：以事件具体类型的
//!   `TypeId` 为键的处理器解析协议与内存注册表；
//! - `EventDispatcher` / `InMemoryEventDispatcher`：按事件的运行时类型
//!   查找全部处理器并逐个 await，快速失败。
//!
//! 分发是进程内、单进程语义；不提供跨进程投递、未送达持久化
//! 与 exactly-once 保证。
//!
pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{EventDispatcher, InMemoryEventDispatcher};
pub use handler::Handle;
pub use registry::{ErasedEventHandler, HandlerResolver, InMemoryHandlerRegistry};
