//! Wire types for the Stockroom back office
//!
//! These are the shapes exchanged with the `/api` backend: authentication
//! payloads, the per-tenant configuration document, and the canonical record
//! schemas used by every entity view. One schema per entity; records are keyed
//! by their business identifiers (product id, invoice number, transaction id).

pub mod auth;
pub mod enums;
pub mod ids;
pub mod records;
pub mod serde_helpers;
pub mod tenant;

// Re-export main types for convenience
pub use auth::{AuthResponse, LoginRequest, SignupRequest, UserIdentity};
pub use enums::{CornerStyle, LayoutStyle, PaymentMethod, Role, ThemeMode};
pub use ids::{InvoiceNo, ProductId, SupplierId, TenantKey, TransactionId, Username};
pub use records::{
    ChatDocument, Invoice, InvoiceDraft, Product, ProductBatch, ProductBatchDraft, ProductDraft,
    Supplier, SupplierDraft, Transaction, TransactionDraft, TransactionItem, TransactionItemDraft,
    User, UserUpdate,
};
pub use tenant::{Brand, Features, Localization, TenantConfig, UiTheme};
