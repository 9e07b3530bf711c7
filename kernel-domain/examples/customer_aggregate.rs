//! 聚合到处理器的完整链路：
//! 聚合在状态变更时记录事件，编排方在提交成功后取走缓冲并逐个分发。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel_domain::aggregate::AggregateRoot;
use kernel_domain::domain_event::{DomainEvent, FieldChanged, PendingEvents};
use kernel_domain::entity::Entity;
use kernel_domain::entity_identity;
use kernel_domain::error::DomainResult;
use kernel_domain::eventing::{
    EventDispatcher, Handle, InMemoryEventDispatcher, InMemoryHandlerRegistry,
};
use kernel_domain::value_object::{EmailAddress, FullName};
use std::any::Any;
use std::sync::Arc;

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
        // 快照在赋值前拷贝，事件携带变更前后的完整取值
        self.events.record(CustomerRenamed {
            customer_id: self.id,
            name: FieldChanged::new(self.name.clone(), new_name.clone()),
            occurred_at: Utc::now(),
        });
        self.name = new_name;
        Ok(())
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

struct RenameAudit;

#[async_trait]
impl Handle<CustomerRenamed> for RenameAudit {
    async fn handle(&self, event: &CustomerRenamed) -> anyhow::Result<()> {
        println!(
            "[audit] customer {} renamed {} -> {}",
            event.customer_id,
            event.name.old_value(),
            event.name.new_value(),
        );
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "rename-audit"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let registry = InMemoryHandlerRegistry::new();
    registry.register::<CustomerRenamed, _>(Arc::new(RenameAudit));
    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));

    let mut customer = Customer::new(
        1,
        FullName::new("Test", "Customer")?,
        EmailAddress::parse("test@example.com")?,
    );

    customer.update_name("New", "Name")?;
    customer.update_name("Final", "Name")?;
    println!(
        "{} <{}> buffered {} events",
        customer.name,
        customer.email,
        customer.events().len()
    );

    // 编排方：此处是"提交成功"的边界；之后才允许对外广播
    for event in customer.events().iter() {
        dispatcher.dispatch(event.as_ref()).await?;
    }
    customer.clear_events();
    println!("buffer cleared: {} events left", customer.events().len());

    Ok(())
}
