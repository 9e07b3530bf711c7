//! 规约（Specification）
//!
//! 以纯数据描述一次查询的过滤/预加载/排序/分组/分页意图，
//! 由外部查询引擎解释执行；构造规约本身没有任何副作用。
//!
//! 具体规约在自己的构造逻辑中装配一个 [`QuerySpecification`]；
//! 装配完成后规约只读。
//!
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 过滤谓词：判定单个候选对象是否满足
pub type Criteria<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// 键选择器：从对象中取出一个可比较、可哈希的字段值，用于排序与分组
pub type KeySelector<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// 排序/分组字段的取值
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Time(DateTime<Utc>),
}

/// 两个谓词的与组合
pub fn and<T: 'static>(left: Criteria<T>, right: Criteria<T>) -> Criteria<T> {
    Arc::new(move |candidate| left(candidate) && right(candidate))
}

/// 两个谓词的或组合
pub fn or<T: 'static>(left: Criteria<T>, right: Criteria<T>) -> Criteria<T> {
    Arc::new(move |candidate| left(candidate) || right(candidate))
}

/// 谓词取反
pub fn not<T: 'static>(inner: Criteria<T>) -> Criteria<T> {
    Arc::new(move |candidate| !inner(candidate))
}

/// 规约：某实体类型上一次查询意图的只读描述
pub trait Specification<T>: Send + Sync {
    /// 过滤谓词；`None` 表示不过滤
    fn criteria(&self) -> Option<&Criteria<T>>;

    /// 以静态标识表达的预加载导航属性
    fn includes(&self) -> &[&'static str];

    /// 以字符串路径表达的预加载导航属性，用于无法静态表达的嵌套路径
    fn include_paths(&self) -> &[String];

    /// 升序排序键
    fn order_by(&self) -> Option<&KeySelector<T>>;

    /// 降序排序键；与升序同时设置时，解释方以降序为准
    fn order_by_descending(&self) -> Option<&KeySelector<T>>;

    /// 分组键
    fn group_by(&self) -> Option<&KeySelector<T>>;

    /// 跳过的记录数；仅在分页开启时有意义
    fn skip(&self) -> usize;

    /// 取出的记录数；仅在分页开启时有意义
    fn take(&self) -> usize;

    /// 是否开启分页；skip=0、take=0 配合开启标志是合法的一页，
    /// 与未开启分页不同
    fn is_paging_enabled(&self) -> bool;

    /// 判定候选对象是否满足过滤谓词（无谓词时恒为真）
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.criteria().is_none_or(|criteria| criteria(candidate))
    }
}

/// 供具体规约在构造函数中装配的基础规约值
pub struct QuerySpecification<T> {
    criteria: Option<Criteria<T>>,
    includes: Vec<&'static str>,
    include_paths: Vec<String>,
    order_by: Option<KeySelector<T>>,
    order_by_descending: Option<KeySelector<T>>,
    group_by: Option<KeySelector<T>>,
    skip: usize,
    take: usize,
    paging_enabled: bool,
}

impl<T> Default for QuerySpecification<T> {
    fn default() -> Self {
        Self {
            criteria: None,
            includes: Vec::new(),
            include_paths: Vec::new(),
            order_by: None,
            order_by_descending: None,
            group_by: None,
            skip: 0,
            take: 0,
            paging_enabled: false,
        }
    }
}

impl<T> QuerySpecification<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以过滤谓词创建规约（常见形态：构造时一次性给定谓词）
    pub fn with_criteria(criteria: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        let mut spec = Self::new();
        spec.set_criteria(criteria);
        spec
    }

    /// 设置过滤谓词；重复设置时后者覆盖前者
    pub fn set_criteria(&mut self, criteria: impl Fn(&T) -> bool + Send + Sync + 'static) {
        self.criteria = Some(Arc::new(criteria));
    }

    /// 设置已组合好的过滤谓词（配合 [`and`] / [`or`] / [`not`] 使用）
    pub fn set_criteria_arc(&mut self, criteria: Criteria<T>) {
        self.criteria = Some(criteria);
    }

    /// 追加一个静态标识形式的预加载导航属性
    pub fn add_include(&mut self, navigation: &'static str) {
        self.includes.push(navigation);
    }

    /// 追加一个字符串路径形式的预加载导航属性（如 `"orders.lines.product"`）
    pub fn add_include_path(&mut self, path: impl Into<String>) {
        self.include_paths.push(path.into());
    }

    /// 设置升序排序键
    pub fn apply_order_by(&mut self, selector: impl Fn(&T) -> FieldValue + Send + Sync + 'static) {
        self.order_by = Some(Arc::new(selector));
    }

    /// 设置降序排序键；与升序同时设置时解释方以降序为准
    pub fn apply_order_by_descending(
        &mut self,
        selector: impl Fn(&T) -> FieldValue + Send + Sync + 'static,
    ) {
        self.order_by_descending = Some(Arc::new(selector));
    }

    /// 设置分组键
    pub fn apply_group_by(&mut self, selector: impl Fn(&T) -> FieldValue + Send + Sync + 'static) {
        self.group_by = Some(Arc::new(selector));
    }

    /// 开启分页并设置 skip/take；skip=0、take=0 也是合法的一页
    pub fn apply_paging(&mut self, skip: usize, take: usize) {
        self.skip = skip;
        self.take = take;
        self.paging_enabled = true;
    }
}

impl<T> Specification<T> for QuerySpecification<T> {
    fn criteria(&self) -> Option<&Criteria<T>> {
        self.criteria.as_ref()
    }

    fn includes(&self) -> &[&'static str] {
        &self.includes
    }

    fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    fn order_by(&self) -> Option<&KeySelector<T>> {
        self.order_by.as_ref()
    }

    fn order_by_descending(&self) -> Option<&KeySelector<T>> {
        self.order_by_descending.as_ref()
    }

    fn group_by(&self) -> Option<&KeySelector<T>> {
        self.group_by.as_ref()
    }

    fn skip(&self) -> usize {
        self.skip
    }

    fn take(&self) -> usize {
        self.take
    }

    fn is_paging_enabled(&self) -> bool {
        self.paging_enabled
    }
}
