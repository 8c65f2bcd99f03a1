use crate::store::CustomerDirectory;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct CustomersRepo {
    pub pool: PgPool,
}

#[async_trait]
impl CustomerDirectory for CustomersRepo {
    async fn gateway_customer_id(&self, customer_id: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT gateway_customer_id FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|r| r.get::<Option<String>, _>("gateway_customer_id")))
    }
}
