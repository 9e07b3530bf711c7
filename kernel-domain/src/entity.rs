//! 实体（Entity）基础抽象
//!
//! 为实体与聚合提供统一的标识（Id）与基于标识的相等语义。
//!
use std::fmt::Display;
use std::hash::Hash;

/// 具备唯一标识的实体抽象
///
/// 实体的相等只看标识：同一具体类型、`id()` 相等即相等，属性差异不参与
/// 比较。标识在构造时给定（由持久化协作方分配，或业务上预先确定的自然键），
/// 正常流程中创建后不再变更；本层不提供修改入口，也不做运行时强制。
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可比较、可哈希与可显示
    type Id: Clone + Eq + Hash + Display + Send + Sync;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}

/// 为实体类型生成基于标识的 `PartialEq` / `Eq` / `Hash` 实现
///
/// 相等的实体必然得到相同的哈希值，可安全用作 `HashMap` / `HashSet` 的键。
/// 标识为默认值（如 0、空串）的实体同样按值比较，不做哨兵处理。
/// 跨类型比较在 Rust 中不可表达（`PartialEq<Self>`），天然不相等也不报错。
#[macro_export]
macro_rules! entity_identity {
    ($ty:ty) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::entity::Entity::id(self) == $crate::entity::Entity::id(other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash($crate::entity::Entity::id(self), state);
            }
        }
    };
}
