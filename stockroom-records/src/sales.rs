//! Point-of-sale entry: line items in, derived amounts out

use stockroom_api_types::{
    PaymentMethod, Product, ProductId, Transaction, TransactionDraft, TransactionItemDraft,
};

use crate::error::{RecordResult, ValidationFailure};
use crate::service::RecordCreator;
use crate::validate::{non_negative, Validate};

/// Amounts derived from a sale.
///
/// `gross` is the sum of line totals, `net = gross - discount` and
/// `balance = net - paid`. A negative balance is change owed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleAmounts {
    pub gross: f64,
    pub discount: f64,
    pub net: f64,
    pub paid: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub payment_method: PaymentMethod,
    pub items: Vec<TransactionItemDraft>,
    pub discount: f64,
    pub paid: f64,
}

impl Default for SaleDraft {
    fn default() -> Self {
        Self {
            payment_method: PaymentMethod::Cash,
            items: Vec::new(),
            discount: 0.0,
            paid: 0.0,
        }
    }
}

impl SaleDraft {
    pub fn new(payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            ..Default::default()
        }
    }

    /// Add a line priced at the product's latest unit price
    pub fn add_product(&mut self, product: &Product, qty: i64) -> &mut Self {
        self.add_line(product.id.clone(), qty, product.latest_unit_price)
    }

    pub fn add_line(&mut self, product_id: ProductId, qty: i64, unit_price: f64) -> &mut Self {
        self.items.push(TransactionItemDraft {
            product_id,
            qty,
            unit_price,
        });
        self
    }

    pub fn amounts(&self) -> SaleAmounts {
        let gross = self
            .items
            .iter()
            .map(|item| item.qty as f64 * item.unit_price)
            .sum::<f64>();
        let net = gross - self.discount;
        SaleAmounts {
            gross,
            discount: self.discount,
            net,
            paid: self.paid,
            balance: net - self.paid,
        }
    }

    /// Validate and build the transaction body with derived amounts filled in
    pub fn to_transaction(&self) -> Result<TransactionDraft, ValidationFailure> {
        self.validate()?;
        let amounts = self.amounts();
        Ok(TransactionDraft {
            payment_method: self.payment_method,
            gross_amount: amounts.gross,
            discount_amount: amounts.discount,
            net_amount: amounts.net,
            paid_amount: amounts.paid,
            balance_amount: amounts.balance,
            items: self.items.clone(),
        })
    }
}

impl Validate for SaleDraft {
    fn validate(&self) -> Result<(), ValidationFailure> {
        if self.items.is_empty() {
            return Err(ValidationFailure::new("items", "Please add at least one item"));
        }
        for item in &self.items {
            item.validate()?;
        }
        non_negative(self.discount, "discountAmount", "Discount amount cannot be negative")?;
        non_negative(self.paid, "paidAmount", "Paid amount cannot be negative")
    }
}

/// Submit a sale as a new transaction. Nothing is sent if it fails validation.
pub async fn record_sale(
    transactions: &dyn RecordCreator<Transaction>,
    sale: &SaleDraft,
) -> RecordResult<Transaction> {
    let draft = sale.to_transaction()?;
    transactions.create(&draft).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tea() -> Product {
        Product {
            id: ProductId::new("TEA"),
            name: "Green tea".into(),
            latest_batch_no: Some("B7".into()),
            remaining_quantity: 40,
            latest_unit_price: 2.5,
        }
    }

    #[test]
    fn test_amounts() {
        let mut sale = SaleDraft::new(PaymentMethod::Card);
        sale.add_product(&tea(), 4).add_line(ProductId::new("CUP"), 2, 1.25);
        sale.discount = 1.5;
        sale.paid = 20.0;

        let amounts = sale.amounts();
        assert_eq!(amounts.gross, 12.5);
        assert_eq!(amounts.net, 11.0);
        assert_eq!(amounts.balance, -9.0);
    }

    #[test]
    fn test_transaction_carries_derived_amounts() {
        let mut sale = SaleDraft::default();
        sale.add_product(&tea(), 2);
        sale.paid = 5.0;

        let tx = sale.to_transaction().unwrap();
        assert_eq!(tx.gross_amount, 5.0);
        assert_eq!(tx.net_amount, 5.0);
        assert_eq!(tx.balance_amount, 0.0);
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.items[0].unit_price, 2.5);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SaleDraft::default().validate().unwrap_err().message,
            "Please add at least one item"
        );

        let mut sale = SaleDraft::default();
        sale.add_line(ProductId::new(""), 1, 1.0);
        assert_eq!(
            sale.validate().unwrap_err().message,
            "Please select a product for all items"
        );

        let mut sale = SaleDraft::default();
        sale.add_product(&tea(), 0);
        assert_eq!(
            sale.validate().unwrap_err().message,
            "Quantity must be greater than 0 for all items"
        );

        let mut sale = SaleDraft::default();
        sale.add_product(&tea(), 1);
        sale.paid = -1.0;
        assert_eq!(sale.to_transaction().unwrap_err().field, "paidAmount");
    }
}
