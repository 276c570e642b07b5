//! Pre-submit form checks
//!
//! The first failing check wins, in the order the forms show their fields.

use stockroom_api_types::{
    InvoiceDraft, ProductBatchDraft, ProductDraft, SupplierDraft, TransactionDraft,
    TransactionItemDraft, UserUpdate,
};

use crate::error::ValidationFailure;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationFailure>;
}

pub(crate) fn require(value: &str, field: &'static str, message: &str) -> Result<(), ValidationFailure> {
    if value.trim().is_empty() {
        return Err(ValidationFailure::new(field, message));
    }
    Ok(())
}

pub(crate) fn non_negative(value: f64, field: &'static str, message: &str) -> Result<(), ValidationFailure> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationFailure::new(field, message));
    }
    Ok(())
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(self.id.as_str(), "id", "Product ID is required")?;
        require(&self.name, "name", "Product name is required")?;
        require(&self.latest_batch_no, "latestBatchNo", "Batch number is required")?;
        if self.remaining_quantity < 0 {
            return Err(ValidationFailure::new(
                "remainingQuantity",
                "Quantity cannot be negative",
            ));
        }
        non_negative(self.latest_unit_price, "latestUnitPrice", "Price cannot be negative")
    }
}

impl Validate for SupplierDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.name, "name", "Supplier name is required")
    }
}

impl Validate for InvoiceDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(self.invoice_no.as_str(), "invoiceNo", "Invoice number is required")?;
        require(self.supplier_id.as_str(), "supplierId", "Supplier ID is required")
    }
}

impl Validate for ProductBatchDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(self.product_id.as_str(), "productId", "Please select a product")?;
        require(self.invoice_no.as_str(), "invoiceNo", "Please select an invoice")?;
        if self.qty <= 0 {
            return Err(ValidationFailure::new("qty", "Quantity must be greater than 0"));
        }
        non_negative(self.unit_cost, "unitCost", "Unit cost cannot be negative")?;
        non_negative(self.unit_price, "unitPrice", "Unit price cannot be negative")
    }
}

impl Validate for TransactionItemDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(self.product_id.as_str(), "productId", "Please select a product for all items")?;
        if self.qty <= 0 {
            return Err(ValidationFailure::new(
                "qty",
                "Quantity must be greater than 0 for all items",
            ));
        }
        non_negative(self.unit_price, "unitPrice", "Unit price cannot be negative")
    }
}

impl Validate for TransactionDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        for item in &self.items {
            item.validate()?;
        }
        non_negative(self.gross_amount, "grossAmount", "Gross amount cannot be negative")?;
        non_negative(self.discount_amount, "discountAmount", "Discount amount cannot be negative")?;
        non_negative(self.paid_amount, "paidAmount", "Paid amount cannot be negative")
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), ValidationFailure> {
        if let Some(email) = &self.email {
            require(email, "email", "Email is required")?;
        }
        match &self.roles {
            Some(roles) if roles.iter().all(|r| r.trim().is_empty()) => {
                Err(ValidationFailure::new("roles", "At least one role is required"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockroom_api_types::{InvoiceNo, PaymentMethod, ProductId, SupplierId};

    fn batch() -> ProductBatchDraft {
        ProductBatchDraft {
            product_id: ProductId::new("P1"),
            invoice_no: InvoiceNo::new("INV-1"),
            batch_no: "B1".into(),
            qty: 10,
            unit_cost: 1.0,
            unit_price: 1.5,
            exp: None,
        }
    }

    #[test]
    fn test_batch_checks_in_form_order() {
        assert!(batch().validate().is_ok());

        let mut draft = batch();
        draft.product_id = ProductId::new("");
        draft.qty = 0;
        assert_eq!(draft.validate().unwrap_err().message, "Please select a product");

        let mut draft = batch();
        draft.qty = 0;
        assert_eq!(draft.validate().unwrap_err().message, "Quantity must be greater than 0");

        let mut draft = batch();
        draft.unit_cost = -0.01;
        assert_eq!(draft.validate().unwrap_err().field, "unitCost");
    }

    #[test]
    fn test_product_requires_name_and_batch() {
        let mut draft = ProductDraft {
            id: ProductId::new("P1"),
            name: "  ".into(),
            latest_batch_no: "B1".into(),
            remaining_quantity: 0,
            latest_unit_price: 0.0,
        };
        assert_eq!(draft.validate().unwrap_err().message, "Product name is required");

        draft.name = "Tea".into();
        draft.latest_unit_price = f64::NAN;
        assert_eq!(draft.validate().unwrap_err().message, "Price cannot be negative");
    }

    #[test]
    fn test_invoice_and_supplier_required_fields() {
        let invoice = InvoiceDraft {
            invoice_no: InvoiceNo::new("INV-1"),
            supplier_id: SupplierId::new(""),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        };
        assert_eq!(invoice.validate().unwrap_err().message, "Supplier ID is required");
        assert!(SupplierDraft::default().validate().is_err());
    }

    #[test]
    fn test_transaction_amounts() {
        let draft = TransactionDraft {
            payment_method: PaymentMethod::Cash,
            gross_amount: 10.0,
            discount_amount: -1.0,
            net_amount: 11.0,
            paid_amount: 11.0,
            balance_amount: 0.0,
            items: vec![],
        };
        assert_eq!(
            draft.validate().unwrap_err().message,
            "Discount amount cannot be negative"
        );
    }

    #[test]
    fn test_user_update_roles() {
        let update = UserUpdate {
            email: None,
            roles: Some(vec![" ".into()]),
        };
        assert!(update.validate().is_err());
        assert!(UserUpdate::default().validate().is_ok());
    }
}
