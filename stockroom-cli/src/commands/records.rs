//! Record gateway commands

use anyhow::{anyhow, Result};
use colored::Colorize;
use serde::Serialize;
use stockroom_api_types::{InvoiceNo, ProductId, SupplierId, TransactionId, Username};
use stockroom_core::AppContext;
use stockroom_records::{BatchKey, ChatService, Record, RecordGateway, RecordService, RecordServices};

use super::{print_json, signed_in};
use crate::cli::{Entity, RecordAction};

pub async fn handle_records(ctx: &AppContext, entity: Entity, action: &RecordAction) -> Result<()> {
    signed_in(ctx)?;
    let services = RecordServices::new(ctx.api());

    match entity {
        Entity::Products => run(&services.products, action, |k, _| Ok(ProductId::new(k))).await,
        Entity::Suppliers => run(&services.suppliers, action, |k, _| Ok(SupplierId::new(k))).await,
        Entity::Invoices => run(&services.invoices, action, |k, _| Ok(InvoiceNo::new(k))).await,
        Entity::Batches => run(&services.batches, action, batch_key).await,
        Entity::Transactions => {
            run(&services.transactions, action, |k, _| Ok(TransactionId::new(k))).await
        }
        Entity::Users => run(&services.users, action, |k, _| Ok(Username::new(k))).await,
    }
}

pub async fn handle_batches_for(ctx: &AppContext, product_id: &str) -> Result<()> {
    signed_in(ctx)?;
    let services = RecordServices::new(ctx.api());
    let batches = services
        .batches
        .list_for_product(&ProductId::new(product_id))
        .await?;
    print_json(&batches)
}

pub async fn handle_chat(ctx: &AppContext, prompt: &[String]) -> Result<()> {
    signed_in(ctx)?;
    let documents = ChatService::new(ctx.api().clone())
        .query(&prompt.join(" "))
        .await?;
    if documents.is_empty() {
        println!("{}", "No results".yellow());
        return Ok(());
    }
    print_json(&documents)
}

async fn run<R, F>(service: &RecordService<R>, action: &RecordAction, parse_key: F) -> Result<()>
where
    R: Record + Serialize,
    F: Fn(&str, Option<&str>) -> Result<R::Key>,
{
    match action {
        RecordAction::List => {
            let records = service.list().await?;
            eprintln!("{} {}", records.len(), R::COLLECTION);
            print_json(&records)
        }
        RecordAction::Get { key, invoice } => {
            let key = parse_key(key, invoice.as_deref())?;
            print_json(&service.get(&key).await?)
        }
        RecordAction::Delete { key, invoice } => {
            let key = parse_key(key, invoice.as_deref())?;
            service.delete(&key).await?;
            println!("{} Deleted {} {}", "✓".green(), R::ENTITY, key);
            Ok(())
        }
    }
}

fn batch_key(product_id: &str, invoice: Option<&str>) -> Result<BatchKey> {
    let invoice = invoice.ok_or_else(|| anyhow!("Batches are keyed by product and invoice; pass --invoice"))?;
    Ok(BatchKey::new(product_id, invoice))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_key_requires_invoice() {
        assert!(batch_key("TEA", None).is_err());
        assert_eq!(batch_key("TEA", Some("INV-1")).unwrap().to_string(), "TEA/INV-1");
    }
}
