//! 端到端演示：命令总线 -> 聚合 -> 事件缓冲 -> 分发器 -> 处理器 -> 查询总线
//!
//! 编排方（这里的命令处理器）在"提交"成功后才取走缓冲事件并逐个分发；
//! 读侧通过投影处理器维护的读模型回答查询。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel_application::command::Command;
use kernel_application::command_bus::CommandBus;
use kernel_application::command_handler::CommandHandler;
use kernel_application::context::AppContext;
use kernel_application::dto::Dto;
use kernel_application::error::AppError;
use kernel_application::query::Query;
use kernel_application::query_bus::QueryBus;
use kernel_application::query_handler::QueryHandler;
use kernel_application::{InMemoryCommandBus, InMemoryQueryBus};
use kernel_domain::aggregate::AggregateRoot;
use kernel_domain::domain_event::{DomainEvent, FieldChanged, PendingEvents};
use kernel_domain::entity::Entity;
use kernel_domain::entity_identity;
use kernel_domain::error::DomainResult;
use kernel_domain::eventing::{
    EventDispatcher, Handle, InMemoryEventDispatcher, InMemoryHandlerRegistry,
};
use kernel_domain::value_object::{EmailAddress, FullName};
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ---- 领域：聚合与事件 ----

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

struct Customer {
    id: u64,
    name: FullName,
    email: EmailAddress,
    events: PendingEvents,
}

impl Customer {
    fn new(id: u64, name: FullName, email: EmailAddress) -> Self {
        Self {
            id,
            name,
            email,
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

    /// 供编排方在提交成功后取走缓冲事件
    fn take_events(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        self.events.take()
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

// ---- 事件处理器 ----

struct RenameAudit;

#[async_trait]
impl Handle<CustomerRenamed> for RenameAudit {
    async fn handle(&self, event: &CustomerRenamed) -> anyhow::Result<()> {
        println!(
            "[audit] customer {} renamed {} -> {} at {}",
            event.customer_id,
            event.name.old_value(),
            event.name.new_value(),
            event.occurred_at(),
        );
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "rename-audit"
    }
}

/// 读模型：客户ID到当前姓名
#[derive(Default)]
struct NameProjection {
    names: Mutex<HashMap<u64, String>>,
}

#[async_trait]
impl Handle<CustomerRenamed> for NameProjection {
    async fn handle(&self, event: &CustomerRenamed) -> anyhow::Result<()> {
        self.names
            .lock()
            .unwrap()
            .insert(event.customer_id, event.name.new_value().to_string());
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "name-projection"
    }
}

// ---- 应用层：命令与查询 ----

type CustomerStore = Arc<Mutex<HashMap<u64, Customer>>>;

#[derive(Debug)]
struct RenameCustomer {
    id: u64,
    first: String,
    last: String,
}

impl Command for RenameCustomer {
    const NAME: &'static str = "rename-customer";
}

struct RenameCustomerHandler {
    store: CustomerStore,
    dispatcher: Arc<InMemoryEventDispatcher>,
}

#[async_trait]
impl CommandHandler<RenameCustomer> for RenameCustomerHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: RenameCustomer) -> Result<(), AppError> {
        // 提交边界：锁内完成状态变更并取走事件，出锁即视为提交成功
        let events = {
            let mut store = self.store.lock().unwrap();
            let customer = store
                .get_mut(&cmd.id)
                .ok_or_else(|| AppError::Infra(format!("customer {} not found", cmd.id)))?;
            customer.update_name(&cmd.first, &cmd.last)?;
            customer.take_events()
        };

        // 只有提交成功的变更才对外广播
        for event in events {
            self.dispatcher.dispatch(event.as_ref()).await?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct GetCustomerName {
    id: u64,
}

impl Query for GetCustomerName {
    const NAME: &'static str = "get-customer-name";
    type Dto = CustomerNameDto;
}

#[derive(Debug, Serialize)]
struct CustomerNameDto {
    id: u64,
    name: Option<String>,
}

impl Dto for CustomerNameDto {}

struct GetCustomerNameHandler {
    projection: Arc<NameProjection>,
}

#[async_trait]
impl QueryHandler<GetCustomerName> for GetCustomerNameHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: GetCustomerName,
    ) -> Result<CustomerNameDto, AppError> {
        let name = self.projection.names.lock().unwrap().get(&q.id).cloned();
        Ok(CustomerNameDto { id: q.id, name })
    }
}

// ---- 装配 ----

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 事件侧：注册表一次性装配，分发器显式持有解析器
    let registry = InMemoryHandlerRegistry::new();
    let projection = Arc::new(NameProjection::default());
    registry.register::<CustomerRenamed, _>(Arc::new(RenameAudit));
    registry.register::<CustomerRenamed, _>(projection.clone());
    let dispatcher = Arc::new(InMemoryEventDispatcher::new(Arc::new(registry)));

    // 写侧存储与种子数据
    let store: CustomerStore = Arc::new(Mutex::new(HashMap::new()));
    store.lock().unwrap().insert(
        1,
        Customer::new(
            1,
            FullName::new("Test", "Customer")?,
            EmailAddress::parse("test@example.com")?,
        ),
    );

    // 应用层总线
    let command_bus = InMemoryCommandBus::new();
    command_bus.register::<RenameCustomer, _>(Arc::new(RenameCustomerHandler {
        store: store.clone(),
        dispatcher,
    }))?;

    let query_bus = InMemoryQueryBus::new();
    query_bus.register::<GetCustomerName, _>(Arc::new(GetCustomerNameHandler {
        projection: projection.clone(),
    }))?;

    let ctx = AppContext::builder()
        .maybe_correlation_id(Some("cor-demo".into()))
        .maybe_actor_type(Some("user".into()))
        .maybe_actor_id(Some("u-1".into()))
        .build();

    command_bus
        .dispatch(
            &ctx,
            RenameCustomer {
                id: 1,
                first: "New".into(),
                last: "Name".into(),
            },
        )
        .await?;

    let dto = query_bus.dispatch(&ctx, GetCustomerName { id: 1 }).await?;
    println!("query result: id={} name={:?}", dto.id, dto.name);

    {
        let store = store.lock().unwrap();
        let customer = store.get(&1).unwrap();
        println!(
            "aggregate state: {} <{}>, buffered events: {}",
            customer.name,
            customer.email,
            customer.events().len()
        );
    }

    Ok(())
}
