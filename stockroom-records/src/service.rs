//! Uniform CRUD over the backend collections

use std::marker::PhantomData;

use async_trait::async_trait;
use stockroom_api_types::{
    Invoice, Product, ProductBatch, ProductId, Supplier, Transaction, TransactionId,
    TransactionItem, TransactionItemDraft, User,
};
use stockroom_http::{ApiClient, HttpError};
use tracing::{debug, info, warn};

use crate::error::{RecordError, RecordResult};
use crate::record::{CreatableRecord, Record, RecordKey};
use crate::validate::Validate;

/// Read, update and delete for one entity type
#[async_trait]
pub trait RecordGateway<R: Record>: Send + Sync {
    async fn list(&self) -> RecordResult<Vec<R>>;

    async fn get(&self, key: &R::Key) -> RecordResult<R>;

    /// Full replace; the draft is validated before anything is sent
    async fn update(&self, key: &R::Key, draft: &R::Draft) -> RecordResult<R>;

    async fn delete(&self, key: &R::Key) -> RecordResult<()>;
}

/// Create, for entities that support it
#[async_trait]
pub trait RecordCreator<R: CreatableRecord>: RecordGateway<R> {
    /// The draft is validated before anything is sent
    async fn create(&self, draft: &R::Draft) -> RecordResult<R>;
}

/// HTTP-backed gateway for `R`. Calls carry the session token; a 401 purges
/// the session and surfaces as [`RecordError::Unauthorized`].
pub struct RecordService<R> {
    api: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for RecordService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordService")
            .field("record", &std::any::type_name::<R>())
            .finish()
    }
}

pub type ProductService = RecordService<Product>;
pub type SupplierService = RecordService<Supplier>;
pub type InvoiceService = RecordService<Invoice>;
pub type ProductBatchService = RecordService<ProductBatch>;
pub type TransactionService = RecordService<Transaction>;
pub type UserService = RecordService<User>;

impl<R: Record> RecordService<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _record: PhantomData,
        }
    }

    fn item_path(key: &R::Key) -> Vec<&str> {
        let mut path = vec![R::COLLECTION];
        path.extend(key.segments());
        path
    }

    fn failure(action: &str, err: HttpError) -> RecordError {
        warn!("Failed to {} {}: {}", action, R::ENTITY, err);
        RecordError::from_http(R::ENTITY, err)
    }
}

#[async_trait]
impl<R: Record> RecordGateway<R> for RecordService<R> {
    async fn list(&self) -> RecordResult<Vec<R>> {
        debug!("Listing {}", R::COLLECTION);
        self.api
            .get(&[R::COLLECTION])
            .await
            .map_err(|e| Self::failure("list", e))
    }

    async fn get(&self, key: &R::Key) -> RecordResult<R> {
        self.api
            .get(&Self::item_path(key))
            .await
            .map_err(|e| Self::failure("load", e))
    }

    async fn update(&self, key: &R::Key, draft: &R::Draft) -> RecordResult<R> {
        draft.validate()?;
        let updated: Option<R> = self
            .api
            .put(&Self::item_path(key), draft)
            .await
            .map_err(|e| Self::failure("update", e))?;
        info!("Updated {} {}", R::ENTITY, key);

        match updated {
            Some(record) => Ok(record),
            None => self.get(key).await,
        }
    }

    async fn delete(&self, key: &R::Key) -> RecordResult<()> {
        self.api
            .delete(&Self::item_path(key))
            .await
            .map_err(|e| Self::failure("delete", e))?;
        info!("Deleted {} {}", R::ENTITY, key);
        Ok(())
    }
}

#[async_trait]
impl<R: CreatableRecord> RecordCreator<R> for RecordService<R> {
    async fn create(&self, draft: &R::Draft) -> RecordResult<R> {
        draft.validate()?;
        let created: R = self
            .api
            .post(&[R::COLLECTION], draft)
            .await
            .map_err(|e| Self::failure("create", e))?;
        info!("Created {} {}", R::ENTITY, created.key());
        Ok(created)
    }
}

impl RecordService<ProductBatch> {
    /// Every batch received for one product
    pub async fn list_for_product(&self, product_id: &ProductId) -> RecordResult<Vec<ProductBatch>> {
        self.api
            .get(&[ProductBatch::COLLECTION, "product", product_id.as_str()])
            .await
            .map_err(|e| Self::failure("list", e))
    }
}

/// Line items under `/transactions/{id}/items`, keyed by product
impl RecordService<Transaction> {
    pub async fn list_items(&self, transaction_id: &TransactionId) -> RecordResult<Vec<TransactionItem>> {
        self.api
            .get(&[Transaction::COLLECTION, transaction_id.as_str(), "items"])
            .await
            .map_err(|e| Self::failure("list items of", e))
    }

    pub async fn get_item(
        &self,
        transaction_id: &TransactionId,
        product_id: &ProductId,
    ) -> RecordResult<TransactionItem> {
        self.api
            .get(&Self::line_path(transaction_id, product_id))
            .await
            .map_err(|e| Self::failure("load item of", e))
    }

    pub async fn add_item(
        &self,
        transaction_id: &TransactionId,
        item: &TransactionItemDraft,
    ) -> RecordResult<TransactionItem> {
        item.validate()?;
        let body = Self::line_body(transaction_id, item);
        let created = self
            .api
            .post(&[Transaction::COLLECTION, transaction_id.as_str(), "items"], &body)
            .await
            .map_err(|e| Self::failure("add item to", e))?;
        info!("Added {} to transaction {}", item.product_id, transaction_id);
        Ok(created)
    }

    pub async fn update_item(
        &self,
        transaction_id: &TransactionId,
        item: &TransactionItemDraft,
    ) -> RecordResult<TransactionItem> {
        item.validate()?;
        let body = Self::line_body(transaction_id, item);
        let updated: Option<TransactionItem> = self
            .api
            .put(&Self::line_path(transaction_id, &item.product_id), &body)
            .await
            .map_err(|e| Self::failure("update item of", e))?;
        Ok(updated.unwrap_or(body))
    }

    pub async fn delete_item(&self, transaction_id: &TransactionId, product_id: &ProductId) -> RecordResult<()> {
        self.api
            .delete(&Self::line_path(transaction_id, product_id))
            .await
            .map_err(|e| Self::failure("delete item of", e))?;
        info!("Removed {} from transaction {}", product_id, transaction_id);
        Ok(())
    }

    fn line_path<'a>(transaction_id: &'a TransactionId, product_id: &'a ProductId) -> [&'a str; 4] {
        [
            Transaction::COLLECTION,
            transaction_id.as_str(),
            "items",
            product_id.as_str(),
        ]
    }

    fn line_body(transaction_id: &TransactionId, item: &TransactionItemDraft) -> TransactionItem {
        TransactionItem {
            transaction_id: Some(transaction_id.clone()),
            product_id: item.product_id.clone(),
            qty: item.qty,
            unit_price: item.unit_price,
        }
    }
}

/// One service per entity over a shared client
#[derive(Debug, Clone)]
pub struct RecordServices {
    pub products: ProductService,
    pub suppliers: SupplierService,
    pub invoices: InvoiceService,
    pub batches: ProductBatchService,
    pub transactions: TransactionService,
    pub users: UserService,
}

impl RecordServices {
    pub fn new(api: &ApiClient) -> Self {
        Self {
            products: RecordService::new(api.clone()),
            suppliers: RecordService::new(api.clone()),
            invoices: RecordService::new(api.clone()),
            batches: RecordService::new(api.clone()),
            transactions: RecordService::new(api.clone()),
            users: RecordService::new(api.clone()),
        }
    }
}
