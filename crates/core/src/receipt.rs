//! Receipt

use std::io;

use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    coupons::{AppliedCoupon, CouponRejection},
    enrichment::{EnhancedCartLineItem, PriceSource, PricedCart},
    prices::Price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt")]
    IO(#[source] io::Error),
}

/// A printable summary of a priced cart and any coupon outcome.
#[derive(Debug)]
pub struct Receipt<'a> {
    cart: &'a PricedCart,
    coupon: Option<&'a Result<AppliedCoupon, CouponRejection>>,
    notes: SmallVec<[(&'a str, String); 2]>,
}

impl<'a> Receipt<'a> {
    /// Receipt for a priced cart.
    pub fn new(cart: &'a PricedCart) -> Self {
        Self {
            cart,
            coupon: None,
            notes: SmallVec::new(),
        }
    }

    /// Include a coupon outcome.
    #[must_use]
    pub fn with_coupon(mut self, coupon: &'a Result<AppliedCoupon, CouponRejection>) -> Self {
        self.coupon = Some(coupon);
        self
    }

    /// Add a labelled line under the totals.
    #[must_use]
    pub fn with_note(mut self, label: &'a str, value: impl Into<String>) -> Self {
        self.notes.push((label, value.into()));
        self
    }

    /// Amount payable after any applied coupon.
    pub fn total(&self) -> Price {
        match self.coupon {
            Some(Ok(applied)) => applied.total,
            Some(Err(_)) | None => self.cart.total(),
        }
    }

    /// Writes the receipt to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Was", "Qty", "Subtotal", "Stock"]);

        for (idx, item) in self.cart.iter().enumerate() {
            builder.push_record(item_row(idx, item));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "\n{table}").map_err(ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut lines: SmallVec<[(String, String); 6]> = SmallVec::new();

        lines.push(("Subtotal:".to_string(), format!("{}", self.cart.total())));

        match self.coupon {
            Some(Ok(applied)) => {
                lines.push((format!("Coupon {}:", applied.code), format!("-{}", applied.discount)));
            }
            Some(Err(rejection)) => {
                lines.push(("Coupon:".to_string(), format!("not applied ({rejection})")));
            }
            None => {}
        }

        lines.push(("Total:".to_string(), format!("{}", self.total())));

        for (label, value) in &self.notes {
            lines.push((format!("{label}:"), value.clone()));
        }

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        for (label, value) in lines {
            writeln!(out, " {label:<label_width$}  {value}").map_err(ReceiptError::IO)?;
        }

        Ok(())
    }
}

fn item_row(idx: usize, item: &EnhancedCartLineItem) -> [String; 7] {
    let was = match item.price_source {
        PriceSource::Live if item.price != item.original_price => {
            format!("{}", item.original_price)
        }
        PriceSource::Live | PriceSource::Snapshot => String::new(),
    };

    let stock = match item.stock_quantity {
        Some(_) if item.exceeds_stock() => "low".to_string(),
        Some(stock) => stock.to_string(),
        None => String::new(),
    };

    [
        format!("#{:<3}", idx + 1),
        item.product_name.clone(),
        format!("{}", item.price),
        was,
        item.billed_quantity.to_string(),
        format!("{}", item.subtotal),
        stock,
    ]
}
