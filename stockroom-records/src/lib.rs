//! Record gateway for the Stockroom back office
//!
//! Every entity view talks to the backend through the same contract:
//! [`RecordGateway`] for list/get/update/delete and [`RecordCreator`] for
//! create. Drafts are validated locally before any request is made, and a
//! 401 from any call has already purged the session by the time the
//! caller sees [`RecordError::Unauthorized`].

pub mod chat;
pub mod error;
pub mod record;
pub mod sales;
pub mod service;
pub mod validate;
pub mod workspace;

pub use chat::ChatService;
pub use error::{RecordError, RecordResult, ValidationFailure};
pub use record::{BatchKey, CreatableRecord, Record, RecordKey};
pub use sales::{record_sale, SaleAmounts, SaleDraft};
pub use service::{
    InvoiceService, ProductBatchService, ProductService, RecordCreator, RecordGateway,
    RecordService, RecordServices, SupplierService, TransactionService, UserService,
};
pub use validate::Validate;
pub use workspace::{load_batch_workspace, BatchWorkspace};
