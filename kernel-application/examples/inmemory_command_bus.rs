use async_trait::async_trait;
use kernel_application::InMemoryCommandBus;
use kernel_application::command::Command;
use kernel_application::command_bus::CommandBus;
use kernel_application::command_handler::CommandHandler;
use kernel_application::context::AppContext;
use kernel_application::error::AppError;
use std::sync::Arc;

#[derive(Debug)]
struct RegisterCustomer {
    name: String,
}

impl Command for RegisterCustomer {
    const NAME: &'static str = "register-customer";
}

struct RegisterCustomerHandler;

#[async_trait]
impl CommandHandler<RegisterCustomer> for RegisterCustomerHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: RegisterCustomer) -> Result<(), AppError> {
        println!("RegisterCustomer: name={}", cmd.name);
        Ok(())
    }
}

#[derive(Debug)]
struct ArchiveCustomer {
    id: u64,
}

impl Command for ArchiveCustomer {
    const NAME: &'static str = "archive-customer";
}

struct ArchiveCustomerHandler;

#[async_trait]
impl CommandHandler<ArchiveCustomer> for ArchiveCustomerHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: ArchiveCustomer) -> Result<(), AppError> {
        println!("ArchiveCustomer: id={}", cmd.id);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = InMemoryCommandBus::new();
    bus.register::<RegisterCustomer, _>(Arc::new(RegisterCustomerHandler))?;
    bus.register::<ArchiveCustomer, _>(Arc::new(ArchiveCustomerHandler))?;

    let ctx = AppContext::builder()
        .maybe_correlation_id(Some("cor-1".into()))
        .maybe_actor_type(Some("user".into()))
        .maybe_actor_id(Some("u-1".into()))
        .build();

    bus.dispatch(
        &ctx,
        RegisterCustomer {
            name: "Alice".into(),
        },
    )
    .await?;
    bus.dispatch(&ctx, ArchiveCustomer { id: 42 }).await?;

    // 未注册的命令 -> HandlerNotFound
    #[derive(Debug)]
    struct UpdateCustomer;

    impl Command for UpdateCustomer {
        const NAME: &'static str = "update-customer";
    }

    if let Err(AppError::HandlerNotFound(name)) = bus.dispatch(&ctx, UpdateCustomer).await {
        println!("no handler for {name}");
    }

    Ok(())
}
