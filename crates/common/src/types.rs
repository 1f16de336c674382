use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

define_id!(
    /// Unique identifier for a fundraising campaign.
    CampaignId
);

define_id!(
    /// Unique identifier for a donation attempt.
    DonationId
);

define_id!(
    /// Unique identifier for a user (donor, volunteer, staff or admin).
    UserId
);

define_id!(
    /// Unique identifier for an in-app notification.
    NotificationId
);

define_id!(
    /// Unique identifier for a volunteer task.
    TaskId
);

define_id!(
    /// Unique identifier for a beneficiary application.
    BeneficiaryId
);

/// Returned when text does not name any variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Current time truncated to microseconds.
///
/// PostgreSQL stores timestamps with microsecond precision; truncating up
/// front keeps a record identical before and after a round-trip.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

text_enum! {
    /// Role of the caller, as asserted by the upstream gateway.
    pub enum Role {
        Donor => "donor",
        Volunteer => "volunteer",
        Staff => "staff",
        Admin => "admin",
    }
}

impl Role {
    /// Staff and admins see every record; donors and volunteers only their own.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

/// Money amount in poisha (1/100 BDT) to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    poisha: i64,
}

impl Money {
    /// Largest amount a single donation, target or aid payout may carry
    /// (10 billion taka).
    pub const MAX_AMOUNT: Money = Money {
        poisha: 1_000_000_000_000,
    };

    /// Creates a new amount from poisha.
    pub fn from_poisha(poisha: i64) -> Self {
        Self { poisha }
    }

    /// Creates a new amount from whole taka, saturating at the `i64` bounds.
    pub fn from_taka(taka: i64) -> Self {
        Self {
            poisha: taka.saturating_mul(100),
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { poisha: 0 }
    }

    /// Returns the amount in poisha.
    pub fn poisha(&self) -> i64 {
        self.poisha
    }

    /// Returns the whole-taka portion.
    pub fn taka(&self) -> i64 {
        self.poisha / 100
    }

    /// Returns the poisha remainder after whole taka.
    pub fn poisha_part(&self) -> i64 {
        self.poisha.abs() % 100
    }

    pub fn is_positive(&self) -> bool {
        self.poisha > 0
    }

    pub fn is_zero(&self) -> bool {
        self.poisha == 0
    }

    pub fn is_negative(&self) -> bool {
        self.poisha < 0
    }

    /// Whether the amount is above [`Money::MAX_AMOUNT`].
    pub fn exceeds_max(&self) -> bool {
        *self > Self::MAX_AMOUNT
    }

    /// Adds another amount, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.poisha.checked_add(other.poisha).map(Money::from_poisha)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.poisha < 0 {
            write!(f, "-{}.{:02} BDT", self.taka().abs(), self.poisha_part())
        } else {
            write!(f, "{}.{:02} BDT", self.taka(), self.poisha_part())
        }
    }
}

// Operators saturate so aggregates over stored rows never panic or wrap.
impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            poisha: self.poisha.saturating_add(rhs.poisha),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            poisha: self.poisha.saturating_sub(rhs.poisha),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
