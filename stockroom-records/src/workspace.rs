//! Data behind the product batches page

use stockroom_api_types::{Invoice, Product};
use tracing::warn;

use crate::error::RecordResult;
use crate::service::RecordGateway;

/// Products to pick from and the invoices batches can be booked against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWorkspace {
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
}

/// Load the batch page. Products are required; invoices are not, and a
/// failure to load them leaves the list empty.
pub async fn load_batch_workspace(
    products: &dyn RecordGateway<Product>,
    invoices: &dyn RecordGateway<Invoice>,
) -> RecordResult<BatchWorkspace> {
    let products = products.list().await?;
    let invoices = match invoices.list().await {
        Ok(invoices) => invoices,
        Err(e) => {
            warn!("Failed to load invoices, continuing without them: {}", e);
            Vec::new()
        }
    };
    Ok(BatchWorkspace { products, invoices })
}
