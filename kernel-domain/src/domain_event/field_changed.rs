use serde::{Deserialize, Serialize};

/// 属性变更载荷，携带变更前后的快照值
///
/// 事件构造时应传入拷贝出来的值而非引用，保证事件内容不随来源变化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChanged<T> {
    old: T,
    new: T,
}

impl<T> FieldChanged<T> {
    pub fn new(old: T, new: T) -> Self {
        Self { old, new }
    }

    pub fn old_value(&self) -> &T {
        &self.old
    }

    pub fn new_value(&self) -> &T {
        &self.new
    }
}

impl<T> FieldChanged<T>
where
    T: PartialEq,
{
    pub fn is_changed(&self) -> bool {
        self.old != self.new
    }
}
