//! Group-buy campaigns
//!
//! A campaign unlocks a group price for one product once enough units have
//! been committed inside its window.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::MoneyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    prices::{Price, non_negative},
    products::ProductId,
};

/// Group-buy campaign identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(u64);

impl CampaignId {
    /// Wrap a raw campaign identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Campaign state derived from its window and progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// The window has not opened yet.
    Upcoming,

    /// Accepting commitments; threshold not met.
    Open,

    /// The threshold is met; the group price applies.
    Unlocked,

    /// The window closed before the threshold was met.
    Failed,
}

/// Why a commitment was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    /// Nothing to commit.
    #[error("commitment must be at least one unit")]
    EmptyCommitment,

    /// The window has not opened yet.
    #[error("campaign opens at {0}")]
    NotStarted(Timestamp),

    /// The window has closed.
    #[error("campaign closed at {0}")]
    Closed(Timestamp),

    /// The committed quantity would overflow.
    #[error("committed quantity overflowed")]
    Overflow,
}

/// A group-buy promotion for a single product.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBuyCampaign {
    /// Campaign identifier
    pub id: CampaignId,

    /// Product on offer
    pub product_id: ProductId,

    /// Unit price before the threshold is met
    pub regular_price: Price,

    /// Unit price once the threshold is met
    pub group_price: Price,

    /// Units needed to unlock the group price
    pub target_quantity: u32,

    /// Units committed so far
    pub committed_quantity: u32,

    /// Window start (inclusive)
    pub starts_at: Timestamp,

    /// Window end (inclusive)
    pub ends_at: Timestamp,
}

impl GroupBuyCampaign {
    /// Whether enough units are committed.
    pub fn threshold_met(&self) -> bool {
        self.committed_quantity >= self.target_quantity
    }

    /// Fraction of the target committed, between zero and one.
    pub fn progress(&self) -> Decimal {
        if self.threshold_met() {
            return Decimal::ONE;
        }

        Decimal::from(self.committed_quantity) / Decimal::from(self.target_quantity)
    }

    /// Units still needed to unlock the group price.
    pub fn remaining(&self) -> u32 {
        self.target_quantity.saturating_sub(self.committed_quantity)
    }

    /// Campaign status at `now`.
    pub fn status(&self, now: Timestamp) -> CampaignStatus {
        if now < self.starts_at {
            CampaignStatus::Upcoming
        } else if self.threshold_met() {
            CampaignStatus::Unlocked
        } else if now > self.ends_at {
            CampaignStatus::Failed
        } else {
            CampaignStatus::Open
        }
    }

    /// Unit price a buyer pays at `now`.
    pub fn unit_price(&self, now: Timestamp) -> Price {
        match self.status(now) {
            CampaignStatus::Unlocked => self.group_price,
            CampaignStatus::Upcoming | CampaignStatus::Open | CampaignStatus::Failed => {
                self.regular_price
            }
        }
    }

    /// How much the group price saves per unit, never negative.
    ///
    /// # Errors
    ///
    /// Returns a `MoneyError` if the two prices are in different currencies.
    pub fn savings_per_unit(&self) -> Result<Price, MoneyError> {
        Ok(non_negative(self.regular_price.sub(self.group_price)?))
    }

    /// Commit `quantity` more units at `now`, returning the resulting status.
    ///
    /// # Errors
    ///
    /// Returns a `CommitError` if the commitment is empty, outside the window, or overflows.
    pub fn commit(&mut self, quantity: u32, now: Timestamp) -> Result<CampaignStatus, CommitError> {
        if quantity == 0 {
            return Err(CommitError::EmptyCommitment);
        }

        if now < self.starts_at {
            return Err(CommitError::NotStarted(self.starts_at));
        }

        if now > self.ends_at {
            return Err(CommitError::Closed(self.ends_at));
        }

        self.committed_quantity = self
            .committed_quantity
            .checked_add(quantity)
            .ok_or(CommitError::Overflow)?;

        Ok(self.status(now))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use super::*;

    fn campaign(committed: u32) -> TestResult<GroupBuyCampaign> {
        Ok(GroupBuyCampaign {
            id: CampaignId::new(1),
            product_id: ProductId::new(30),
            regular_price: Money::from_minor(400_000, VND),
            group_price: Money::from_minor(320_000, VND),
            target_quantity: 20,
            committed_quantity: committed,
            starts_at: "2026-05-01T00:00:00Z".parse()?,
            ends_at: "2026-05-14T23:59:59Z".parse()?,
        })
    }

    #[test]
    fn progress_is_capped_at_one() -> TestResult {
        assert_eq!(campaign(5)?.progress(), Decimal::new(25, 2));
        assert_eq!(campaign(40)?.progress(), Decimal::ONE);

        Ok(())
    }

    #[test]
    fn zero_target_counts_as_met() -> TestResult {
        let mut campaign = campaign(0)?;
        campaign.target_quantity = 0;

        assert_eq!(campaign.progress(), Decimal::ONE);
        assert_eq!(campaign.remaining(), 0);

        Ok(())
    }

    #[test]
    fn status_follows_window_and_threshold() -> TestResult {
        let open = campaign(5)?;
        let unlocked = campaign(20)?;

        let before: Timestamp = "2026-04-30T23:59:59Z".parse()?;
        let during: Timestamp = "2026-05-07T10:00:00Z".parse()?;
        let after: Timestamp = "2026-05-15T00:00:00Z".parse()?;

        assert_eq!(open.status(before), CampaignStatus::Upcoming);
        assert_eq!(open.status(during), CampaignStatus::Open);
        assert_eq!(open.status(after), CampaignStatus::Failed);
        assert_eq!(unlocked.status(during), CampaignStatus::Unlocked);
        assert_eq!(unlocked.status(after), CampaignStatus::Unlocked);

        Ok(())
    }

    #[test]
    fn unit_price_drops_once_unlocked() -> TestResult {
        let during: Timestamp = "2026-05-07T10:00:00Z".parse()?;

        assert_eq!(campaign(19)?.unit_price(during), Money::from_minor(400_000, VND));
        assert_eq!(campaign(20)?.unit_price(during), Money::from_minor(320_000, VND));
        assert_eq!(campaign(0)?.savings_per_unit()?, Money::from_minor(80_000, VND));

        Ok(())
    }

    #[test]
    fn commit_unlocks_when_target_reached() -> TestResult {
        let mut campaign = campaign(18)?;
        let during: Timestamp = "2026-05-07T10:00:00Z".parse()?;

        assert_eq!(campaign.commit(1, during)?, CampaignStatus::Open);
        assert_eq!(campaign.commit(1, during)?, CampaignStatus::Unlocked);
        assert_eq!(campaign.remaining(), 0);

        Ok(())
    }

    #[test]
    fn window_edges_are_inclusive() -> TestResult {
        let open = campaign(5)?;

        assert_eq!(open.status(open.starts_at), CampaignStatus::Open);
        assert_eq!(open.status(open.ends_at), CampaignStatus::Open);

        let mut at_start = campaign(5)?;
        let mut at_end = campaign(19)?;

        assert_eq!(at_start.commit(1, at_start.starts_at)?, CampaignStatus::Open);
        assert_eq!(at_end.commit(1, at_end.ends_at)?, CampaignStatus::Unlocked);
        assert_eq!(at_start.committed_quantity, 6);
        assert_eq!(at_end.committed_quantity, 20);

        Ok(())
    }

    #[test]
    fn commit_outside_window_is_refused() -> TestResult {
        let mut campaign = campaign(0)?;

        assert_eq!(
            campaign.commit(1, "2026-05-15T00:00:00Z".parse()?),
            Err(CommitError::Closed(campaign.ends_at))
        );

        assert_eq!(
            campaign.commit(1, "2026-04-01T00:00:00Z".parse()?),
            Err(CommitError::NotStarted(campaign.starts_at))
        );

        assert_eq!(
            campaign.commit(0, "2026-05-07T00:00:00Z".parse()?),
            Err(CommitError::EmptyCommitment)
        );

        assert_eq!(campaign.committed_quantity, 0);

        Ok(())
    }
}
