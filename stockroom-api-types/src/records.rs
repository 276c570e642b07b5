//! Canonical record schemas for the back-office entities
//!
//! Each entity is keyed by its business identifier: products by product id,
//! invoices by invoice number, batches by (product id, invoice number), and
//! transactions by transaction id. `*Draft` types are the request bodies for
//! create and update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{PaymentMethod, Role};
use crate::ids::{InvoiceNo, ProductId, SupplierId, TransactionId, Username};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_batch_no: Option<String>,
    #[serde(default)]
    pub remaining_quantity: i64,
    #[serde(default)]
    pub latest_unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub id: ProductId,
    pub name: String,
    pub latest_batch_no: String,
    pub remaining_quantity: i64,
    pub latest_unit_price: f64,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            latest_batch_no: product.latest_batch_no.clone().unwrap_or_default(),
            remaining_quantity: product.remaining_quantity,
            latest_unit_price: product.latest_unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_no: InvoiceNo,
    pub supplier_id: SupplierId,
    #[serde(with = "crate::serde_helpers::lenient_date")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub invoice_no: InvoiceNo,
    pub supplier_id: SupplierId,
    #[serde(with = "crate::serde_helpers::lenient_date")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBatch {
    pub product_id: ProductId,
    pub invoice_no: InvoiceNo,
    #[serde(default)]
    pub batch_no: String,
    pub qty: i64,
    pub unit_cost: f64,
    pub unit_price: f64,
    #[serde(
        default,
        with = "crate::serde_helpers::lenient_date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBatchDraft {
    pub product_id: ProductId,
    pub invoice_no: InvoiceNo,
    pub batch_no: String,
    pub qty: i64,
    pub unit_cost: f64,
    pub unit_price: f64,
    #[serde(
        default,
        with = "crate::serde_helpers::lenient_date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub payment_method: PaymentMethod,
    pub gross_amount: f64,
    pub discount_amount: f64,
    pub net_amount: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    #[serde(
        default,
        with = "crate::serde_helpers::lenient_timestamp_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    pub product_id: ProductId,
    pub qty: i64,
    pub unit_price: f64,
}

impl TransactionItem {
    pub fn line_total(&self) -> f64 {
        self.qty as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub payment_method: PaymentMethod,
    pub gross_amount: f64,
    pub discount_amount: f64,
    pub net_amount: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    pub items: Vec<TransactionItemDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemDraft {
    pub product_id: ProductId,
    pub qty: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: Username,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl User {
    /// Highest-privilege role, for the users table
    pub fn display_role(&self) -> Option<Role> {
        Role::highest(self.roles.iter().map(String::as_str))
    }
}

/// Body for `PUT /users/{username}`; absent fields are left unchanged by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

/// One hit from `/chat/query`. Unknown fields are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
