//! Entity descriptions for the generic gateway

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_api_types::{
    Invoice, InvoiceDraft, InvoiceNo, Product, ProductBatch, ProductBatchDraft, ProductDraft,
    ProductId, Supplier, SupplierDraft, SupplierId, Transaction, TransactionDraft, TransactionId,
    User, UserUpdate, Username,
};

use crate::validate::Validate;

/// Business key of a record, as URL path segments under its collection
pub trait RecordKey: fmt::Display + Send + Sync {
    fn segments(&self) -> Vec<&str>;
}

macro_rules! single_segment_key {
    ($($id:ty),* $(,)?) => {
        $(
            impl RecordKey for $id {
                fn segments(&self) -> Vec<&str> {
                    vec![self.as_str()]
                }
            }
        )*
    };
}

single_segment_key!(ProductId, SupplierId, InvoiceNo, TransactionId, Username);

/// A product batch is keyed by the product and the invoice it arrived on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub product_id: ProductId,
    pub invoice_no: InvoiceNo,
}

impl BatchKey {
    pub fn new(product_id: impl Into<ProductId>, invoice_no: impl Into<InvoiceNo>) -> Self {
        Self {
            product_id: product_id.into(),
            invoice_no: invoice_no.into(),
        }
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.invoice_no)
    }
}

impl RecordKey for BatchKey {
    fn segments(&self) -> Vec<&str> {
        vec![self.product_id.as_str(), self.invoice_no.as_str()]
    }
}

/// An entity served under `/{COLLECTION}`
pub trait Record: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Singular name used in messages and logs
    const ENTITY: &'static str;

    type Key: RecordKey;
    /// Body of create and update requests
    type Draft: Serialize + Validate + Send + Sync;

    fn key(&self) -> Self::Key;
}

/// Entities the backend accepts POSTs for
pub trait CreatableRecord: Record {}

impl Record for Product {
    const COLLECTION: &'static str = "products";
    const ENTITY: &'static str = "product";
    type Key = ProductId;
    type Draft = ProductDraft;

    fn key(&self) -> ProductId {
        self.id.clone()
    }
}

impl CreatableRecord for Product {}

impl Record for Supplier {
    const COLLECTION: &'static str = "suppliers";
    const ENTITY: &'static str = "supplier";
    type Key = SupplierId;
    type Draft = SupplierDraft;

    fn key(&self) -> SupplierId {
        self.supplier_id.clone()
    }
}

impl CreatableRecord for Supplier {}

impl Record for Invoice {
    const COLLECTION: &'static str = "invoices";
    const ENTITY: &'static str = "invoice";
    type Key = InvoiceNo;
    type Draft = InvoiceDraft;

    fn key(&self) -> InvoiceNo {
        self.invoice_no.clone()
    }
}

impl CreatableRecord for Invoice {}

impl Record for ProductBatch {
    const COLLECTION: &'static str = "product-batches";
    const ENTITY: &'static str = "batch";
    type Key = BatchKey;
    type Draft = ProductBatchDraft;

    fn key(&self) -> BatchKey {
        BatchKey::new(self.product_id.clone(), self.invoice_no.clone())
    }
}

impl CreatableRecord for ProductBatch {}

impl Record for Transaction {
    const COLLECTION: &'static str = "transactions";
    const ENTITY: &'static str = "transaction";
    type Key = TransactionId;
    type Draft = TransactionDraft;

    fn key(&self) -> TransactionId {
        self.transaction_id.clone()
    }
}

impl CreatableRecord for Transaction {}

/// Users are created through signup, never through the gateway
impl Record for User {
    const COLLECTION: &'static str = "users";
    const ENTITY: &'static str = "user";
    type Key = Username;
    type Draft = UserUpdate;

    fn key(&self) -> Username {
        self.username.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_key_segments() {
        let key = BatchKey::new("P 1", "INV/9");
        assert_eq!(key.segments(), vec!["P 1", "INV/9"]);
        assert_eq!(key.to_string(), "P 1/INV/9");
    }
}
