use async_trait::async_trait;
use kernel_application::InMemoryQueryBus;
use kernel_application::context::AppContext;
use kernel_application::dto::Dto;
use kernel_application::error::AppError;
use kernel_application::query::Query;
use kernel_application::query_bus::QueryBus;
use kernel_application::query_handler::QueryHandler;
use serde::Serialize;
use std::sync::Arc;

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
    name: String,
}

impl Dto for CustomerNameDto {}

struct GetCustomerNameHandler;

#[async_trait]
impl QueryHandler<GetCustomerName> for GetCustomerNameHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: GetCustomerName,
    ) -> Result<CustomerNameDto, AppError> {
        Ok(CustomerNameDto {
            id: q.id,
            name: "Alice Example".into(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = InMemoryQueryBus::new();
    bus.register::<GetCustomerName, _>(Arc::new(GetCustomerNameHandler))?;

    let ctx = AppContext::default();
    let dto = bus.dispatch(&ctx, GetCustomerName { id: 7 }).await?;
    println!("{}", serde_json::to_string(&dto)?);

    Ok(())
}
