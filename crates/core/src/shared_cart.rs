//! Shared carts
//!
//! A cart jointly edited by invited members and checked out by one payer.

use std::fmt;

use rusty_money::{MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::CartLineItem,
    enrichment::{EnrichmentError, PricedCart, enrich},
    meta::MetaTable,
    prices::{Price, zero},
};

/// Shopper identifier within a shared cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    /// Wrap a raw member identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors raised by shared cart operations.
#[derive(Debug, Error)]
pub enum SharedCartError {
    /// The shopper has not been invited.
    #[error("member {0} is not part of this cart")]
    NotMember(MemberId),

    /// The payer cannot leave their own cart.
    #[error("the payer cannot be removed from the cart")]
    PayerRemoval,

    /// A line is priced in another currency (item currency, cart currency).
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Pricing the lines failed.
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A line added by a member.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedLine {
    /// Member who added the line
    pub member: MemberId,

    /// The line itself
    pub item: CartLineItem,
}

/// What one member owes.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShare {
    /// Member
    pub member: MemberId,

    /// Number of lines the member added
    pub lines: usize,

    /// Sum of the member's priced subtotals
    pub subtotal: Price,
}

/// Per-member breakdown of a priced shared cart.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedCartSplit {
    /// Member paying for the whole cart
    pub payer: MemberId,

    /// One share per member, in invitation order
    pub shares: Vec<MemberShare>,

    /// The priced cart across all members
    pub cart: PricedCart,
}

impl SharedCartSplit {
    /// Grand total charged to the payer.
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Share owed by a member, if they belong to the cart.
    pub fn share(&self, member: MemberId) -> Option<&MemberShare> {
        self.shares.iter().find(|share| share.member == member)
    }
}

/// Shared cart
#[derive(Debug, Clone)]
pub struct SharedCart {
    payer: MemberId,
    members: SmallVec<[MemberId; 8]>,
    lines: Vec<SharedLine>,
    currency: &'static Currency,
}

impl SharedCart {
    /// Open a shared cart owned and paid for by `payer`.
    pub fn new(payer: MemberId, currency: &'static Currency) -> Self {
        let mut members = SmallVec::new();
        members.push(payer);

        Self {
            payer,
            members,
            lines: Vec::new(),
            currency,
        }
    }

    /// The paying member.
    pub fn payer(&self) -> MemberId {
        self.payer
    }

    /// Members in invitation order, payer first.
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Lines in the order they were added.
    pub fn lines(&self) -> &[SharedLine] {
        &self.lines
    }

    /// Whether the shopper belongs to the cart.
    pub fn is_member(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// Invite a shopper. Returns `false` if they were already a member.
    pub fn invite(&mut self, member: MemberId) -> bool {
        if self.is_member(member) {
            return false;
        }

        self.members.push(member);

        true
    }

    /// Remove a member together with their lines.
    ///
    /// # Errors
    ///
    /// Returns `PayerRemoval` for the payer and `NotMember` for unknown shoppers.
    pub fn remove(&mut self, member: MemberId) -> Result<(), SharedCartError> {
        if member == self.payer {
            return Err(SharedCartError::PayerRemoval);
        }

        if !self.is_member(member) {
            return Err(SharedCartError::NotMember(member));
        }

        self.members.retain(|m| *m != member);
        self.lines.retain(|line| line.member != member);

        Ok(())
    }

    /// Add a line for a member. Adding a product the member already has raises that line's
    /// quantity instead.
    ///
    /// # Errors
    ///
    /// Returns `NotMember` for uninvited shoppers and `CurrencyMismatch` for lines in another
    /// currency.
    pub fn add_item(
        &mut self,
        member: MemberId,
        item: CartLineItem,
    ) -> Result<(), SharedCartError> {
        if !self.is_member(member) {
            return Err(SharedCartError::NotMember(member));
        }

        let item_currency = item.price.currency();

        if item_currency != self.currency {
            return Err(SharedCartError::CurrencyMismatch(
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let existing = self
            .lines
            .iter_mut()
            .find(|line| line.member == member && line.item.product_id == item.product_id);

        match existing {
            Some(line) => {
                let quantity = line.item.quantity.max(0).saturating_add(item.quantity.max(0));

                line.item = CartLineItem {
                    product_image_url: line.item.product_image_url.take(),
                    ..CartLineItem::new(
                        item.product_id,
                        item.product_name,
                        item.price,
                        quantity,
                    )
                };
            }
            None => self.lines.push(SharedLine { member, item }),
        }

        Ok(())
    }

    /// Price the cart against the meta table and split it by member.
    ///
    /// # Errors
    ///
    /// Returns a `SharedCartError` if pricing or summation fails.
    pub fn split(&self, meta: &MetaTable) -> Result<SharedCartSplit, SharedCartError> {
        let items: Vec<CartLineItem> = self.lines.iter().map(|line| line.item.clone()).collect();
        let cart = enrich(&items, meta, self.currency)?;

        let shares = self
            .members
            .iter()
            .map(|&member| -> Result<MemberShare, SharedCartError> {
                let priced = self
                    .lines
                    .iter()
                    .zip(cart.iter())
                    .filter(|(line, _)| line.member == member);

                let mut lines = 0;
                let mut subtotal = zero(self.currency);

                for (_, priced_line) in priced {
                    lines += 1;
                    subtotal = subtotal.add(priced_line.subtotal)?;
                }

                Ok(MemberShare {
                    member,
                    lines,
                    subtotal,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedCartSplit {
            payer: self.payer,
            shares,
            cart,
        })
    }
}
