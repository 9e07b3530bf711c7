//! 端到端分发流程：聚合缓冲 -> 编排方 -> 注册表 -> 处理器

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel_domain::aggregate::AggregateRoot;
use kernel_domain::domain_event::{DomainEvent, FieldChanged, PendingEvents};
use kernel_domain::entity::Entity;
use kernel_domain::entity_identity;
use kernel_domain::error::{DomainError, DomainResult};
use kernel_domain::eventing::{
    EventDispatcher, Handle, InMemoryEventDispatcher, InMemoryHandlerRegistry,
};
use kernel_domain::value_object::FullName;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct CustomerRenamed {
    customer_id: u64,
    name: FieldChanged<FullName>,
    occurred_at: DateTime<Utc>,
}

impl DomainEvent for CustomerRenamed {
    fn event_type(&self) -> &'static str {
        "customer.renamed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct CustomerArchived {
    customer_id: u64,
    occurred_at: DateTime<Utc>,
}

impl DomainEvent for CustomerArchived {
    fn event_type(&self) -> &'static str {
        "customer.archived"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Customer {
    id: u64,
    name: FullName,
    archived: bool,
    events: PendingEvents,
}

impl Customer {
    fn new(id: u64, name: FullName) -> Self {
        Self {
            id,
            name,
            archived: false,
            events: PendingEvents::new(),
        }
    }

    fn update_name(&mut self, first: &str, last: &str) -> DomainResult<()> {
        let new_name = FullName::new(first, last)?;
        self.events.record(CustomerRenamed {
            customer_id: self.id,
            name: FieldChanged::new(self.name.clone(), new_name.clone()),
            occurred_at: Utc::now(),
        });
        self.name = new_name;
        Ok(())
    }

    fn archive(&mut self) {
        self.archived = true;
        self.events.record(CustomerArchived {
            customer_id: self.id,
            occurred_at: Utc::now(),
        });
    }
}

impl Entity for Customer {
    type Id = u64;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

entity_identity!(Customer);

impl AggregateRoot for Customer {
    fn events(&self) -> &PendingEvents {
        &self.events
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }
}

/// 编排方的典型形态：提交成功后逐个分发缓冲事件，随后清空
async fn dispatch_pending(
    customer: &mut Customer,
    dispatcher: &InMemoryEventDispatcher,
) -> DomainResult<()> {
    for event in customer.events().iter() {
        dispatcher.dispatch(event.as_ref()).await?;
    }
    customer.clear_events();
    Ok(())
}

/// 改名事件的读模型投影
#[derive(Default)]
struct NameProjection {
    names: Mutex<HashMap<u64, String>>,
    applied: AtomicUsize,
}

#[async_trait]
impl Handle<CustomerRenamed> for NameProjection {
    async fn handle(&self, event: &CustomerRenamed) -> anyhow::Result<()> {
        self.names
            .lock()
            .unwrap()
            .insert(event.customer_id, event.name.new_value().to_string());
        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "name-projection"
    }
}

/// 改名事件的审计记录
#[derive(Default)]
struct AuditTrail {
    entries: Mutex<Vec<String>>,
}

#[async_trait]
impl Handle<CustomerRenamed> for AuditTrail {
    async fn handle(&self, event: &CustomerRenamed) -> anyhow::Result<()> {
        self.entries.lock().unwrap().push(format!(
            "customer {} renamed {} -> {}",
            event.customer_id,
            event.name.old_value(),
            event.name.new_value(),
        ));
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "audit-trail"
    }
}

struct ArchiveProbe {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Handle<CustomerArchived> for ArchiveProbe {
    async fn handle(&self, _event: &CustomerArchived) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// 同一事件类型的两个处理器各运行一次
#[tokio::test]
async fn both_handlers_observe_one_renamed_event() {
    let registry = InMemoryHandlerRegistry::new();
    let projection = Arc::new(NameProjection::default());
    let audit = Arc::new(AuditTrail::default());
    registry.register::<CustomerRenamed, _>(projection.clone());
    registry.register::<CustomerRenamed, _>(audit.clone());

    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));
    let mut customer = Customer::new(1, FullName::new("Test", "Customer").unwrap());
    customer.update_name("New", "Name").unwrap();

    dispatch_pending(&mut customer, &dispatcher).await.unwrap();

    assert_eq!(projection.applied.load(Ordering::SeqCst), 1);
    assert_eq!(
        projection.names.lock().unwrap().get(&1).unwrap(),
        "New Name"
    );
    let entries = audit.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], "customer 1 renamed Test Customer -> New Name");
    assert!(customer.events().is_empty());
}

// 按确切运行时类型路由：归档事件的处理器不关心改名事件，反之亦然
#[tokio::test]
async fn handlers_only_see_their_exact_event_type() {
    let registry = InMemoryHandlerRegistry::new();
    let projection = Arc::new(NameProjection::default());
    let archive_calls = Arc::new(AtomicUsize::new(0));
    registry.register::<CustomerRenamed, _>(projection.clone());
    registry.register::<CustomerArchived, _>(Arc::new(ArchiveProbe {
        calls: archive_calls.clone(),
    }));

    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));
    let mut customer = Customer::new(2, FullName::new("Test", "Customer").unwrap());
    customer.update_name("New", "Name").unwrap();
    customer.archive();

    dispatch_pending(&mut customer, &dispatcher).await.unwrap();

    assert_eq!(projection.applied.load(Ordering::SeqCst), 1);
    assert_eq!(archive_calls.load(Ordering::SeqCst), 1);
}

// 没有处理器的事件是合法的静默空操作
#[tokio::test]
async fn unhandled_event_dispatches_successfully() {
    let dispatcher = InMemoryEventDispatcher::new(Arc::new(InMemoryHandlerRegistry::new()));
    let mut customer = Customer::new(3, FullName::new("Test", "Customer").unwrap());
    customer.archive();

    dispatch_pending(&mut customer, &dispatcher).await.unwrap();
    assert!(customer.archived);
    assert!(customer.events().is_empty());
}

struct FailingProjection;

#[async_trait]
impl Handle<CustomerRenamed> for FailingProjection {
    async fn handle(&self, _event: &CustomerRenamed) -> anyhow::Result<()> {
        anyhow::bail!("read model out of sync")
    }

    fn handler_name(&self) -> &str {
        "failing-projection"
    }
}

// 处理器失败向编排方传播，错误点名失败的处理器；缓冲保持未清空
#[tokio::test]
async fn handler_failure_propagates_to_the_orchestrator() {
    let registry = InMemoryHandlerRegistry::new();
    registry.register::<CustomerRenamed, _>(Arc::new(FailingProjection));
    let audit = Arc::new(AuditTrail::default());
    registry.register::<CustomerRenamed, _>(audit.clone());

    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));
    let mut customer = Customer::new(4, FullName::new("Test", "Customer").unwrap());
    customer.update_name("New", "Name").unwrap();

    let err = dispatch_pending(&mut customer, &dispatcher)
        .await
        .unwrap_err();
    match err {
        DomainError::EventHandler { handler, reason } => {
            assert_eq!(handler, "failing-projection");
            assert!(reason.contains("read model out of sync"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // 快速失败：后续处理器未执行；编排方未走到清空一步
    assert!(audit.entries.lock().unwrap().is_empty());
    assert_eq!(customer.events().len(), 1);
}

// 多次提交循环：每轮分发后缓冲清空，处理器看到的总量随轮次累加
#[tokio::test]
async fn repeated_commit_cycles_accumulate_in_handlers_only() {
    let registry = InMemoryHandlerRegistry::new();
    let projection = Arc::new(NameProjection::default());
    registry.register::<CustomerRenamed, _>(projection.clone());

    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));
    let mut customer = Customer::new(5, FullName::new("Test", "Customer").unwrap());

    for (round, first) in ["One", "Two", "Three"].iter().enumerate() {
        customer.update_name(first, "Name").unwrap();
        dispatch_pending(&mut customer, &dispatcher).await.unwrap();

        assert!(customer.events().is_empty());
        assert_eq!(projection.applied.load(Ordering::SeqCst), round + 1);
    }

    assert_eq!(
        projection.names.lock().unwrap().get(&5).unwrap(),
        "Three Name"
    );
}
