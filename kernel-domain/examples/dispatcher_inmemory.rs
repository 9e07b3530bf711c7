//! 内存注册表 + 分发器的最小用法：
//! 注册两个处理器，分发一个事件，再演示无人处理的事件是静默空操作。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel_domain::domain_event::DomainEvent;
use kernel_domain::eventing::{
    EventDispatcher, Handle, InMemoryEventDispatcher, InMemoryHandlerRegistry,
};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
struct UserRegistered {
    username: String,
    occurred_at: DateTime<Utc>,
}

impl UserRegistered {
    fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for UserRegistered {
    fn event_type(&self) -> &'static str {
        "user.registered"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct UserDeleted {
    occurred_at: DateTime<Utc>,
}

impl DomainEvent for UserDeleted {
    fn event_type(&self) -> &'static str {
        "user.deleted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct WelcomeEmailer;

#[async_trait]
impl Handle<UserRegistered> for WelcomeEmailer {
    async fn handle(&self, event: &UserRegistered) -> anyhow::Result<()> {
        println!("sending welcome mail to {}", event.username);
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "welcome-emailer"
    }
}

struct SignupCounter;

#[async_trait]
impl Handle<UserRegistered> for SignupCounter {
    async fn handle(&self, event: &UserRegistered) -> anyhow::Result<()> {
        println!(
            "counting signup of {} at {}",
            event.username,
            event.occurred_at()
        );
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "signup-counter"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 启动时一次性注册；之后注册表对分发器只读
    let registry = InMemoryHandlerRegistry::new();
    registry.register::<UserRegistered, _>(Arc::new(WelcomeEmailer));
    registry.register::<UserRegistered, _>(Arc::new(SignupCounter));

    let dispatcher = InMemoryEventDispatcher::new(Arc::new(registry));

    // 两个处理器都会被顺序 await
    dispatcher.dispatch(&UserRegistered::new("alice")).await?;

    // 没有任何处理器的事件类型：成功的空操作
    dispatcher
        .dispatch(&UserDeleted {
            occurred_at: Utc::now(),
        })
        .await?;
    println!("user.deleted had no handlers, dispatch was a no-op");

    Ok(())
}
