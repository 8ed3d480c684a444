//! Treasury - the city's money balance

use serde::{Deserialize, Serialize};

use crate::core::types::Money;

/// Balance as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Balance {
    Finite(Money),
    /// Creative mode: spending is never limited
    Unlimited,
}

impl Balance {
    /// Finite amount, or `None` in creative mode
    pub fn amount(&self) -> Option<Money> {
        match self {
            Balance::Finite(amount) => Some(*amount),
            Balance::Unlimited => None,
        }
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Balance::Finite(amount) => write!(f, "${}", amount),
            Balance::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Shared treasury gating every purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treasury {
    balance: Money,
    creative_mode: bool,
    starting_stake: Money,
}

impl Treasury {
    pub fn new(starting_stake: Money) -> Self {
        Self {
            balance: starting_stake,
            creative_mode: false,
            starting_stake,
        }
    }

    pub fn balance(&self) -> Balance {
        if self.creative_mode {
            Balance::Unlimited
        } else {
            Balance::Finite(self.balance)
        }
    }

    /// Stored balance, ignoring creative mode
    pub fn raw_balance(&self) -> Money {
        self.balance
    }

    pub fn is_creative(&self) -> bool {
        self.creative_mode
    }

    /// Overwrite the balance; ignored in creative mode
    pub fn set_balance(&mut self, amount: Money) {
        if self.creative_mode {
            return;
        }
        self.balance = amount;
    }

    /// Credit money; ignored in creative mode
    pub fn add(&mut self, amount: Money) {
        if self.creative_mode {
            return;
        }
        self.balance = self.balance.saturating_add(amount);
    }

    /// Check whether `amount` could be spent right now
    pub fn can_afford(&self, amount: Money) -> bool {
        self.creative_mode || self.balance >= amount
    }

    /// Spend `amount` if affordable, returns true if successful
    ///
    /// On failure nothing changes.
    pub fn try_spend(&mut self, amount: Money) -> bool {
        if self.creative_mode {
            return true;
        }
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }

    pub fn set_creative_mode(&mut self, enabled: bool) {
        self.creative_mode = enabled;
    }

    /// Restore the starting stake
    ///
    /// The creative flag only changes when the caller asks for it.
    pub fn reset(&mut self, creative: Option<bool>) {
        self.balance = self.starting_stake;
        if let Some(enabled) = creative {
            self.creative_mode = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_spend() {
        let mut treasury = Treasury::new(1000);

        assert!(treasury.try_spend(300));
        assert_eq!(treasury.balance(), Balance::Finite(700));

        // Too expensive: rejected without side effects
        assert!(!treasury.try_spend(701));
        assert_eq!(treasury.balance(), Balance::Finite(700));

        // Exact balance is affordable
        assert!(treasury.try_spend(700));
        assert_eq!(treasury.balance(), Balance::Finite(0));
    }

    #[test]
    fn test_can_afford_mirrors_try_spend() {
        let treasury = Treasury::new(100);
        assert!(treasury.can_afford(100));
        assert!(!treasury.can_afford(101));
        assert!(treasury.can_afford(0));
    }

    #[test]
    fn test_creative_mode_never_moves() {
        let mut treasury = Treasury::new(1000);
        treasury.set_creative_mode(true);

        assert_eq!(treasury.balance(), Balance::Unlimited);
        assert!(treasury.can_afford(u64::MAX));
        assert!(treasury.try_spend(1_000_000));
        treasury.add(50);
        treasury.set_balance(3);
        assert_eq!(treasury.raw_balance(), 1000);

        treasury.set_creative_mode(false);
        assert_eq!(treasury.balance(), Balance::Finite(1000));
    }

    #[test]
    fn test_reset_keeps_flag_unless_asked() {
        let mut treasury = Treasury::new(1000);
        treasury.try_spend(400);
        treasury.set_creative_mode(true);

        treasury.reset(None);
        assert!(treasury.is_creative());
        assert_eq!(treasury.raw_balance(), 1000);

        treasury.reset(Some(false));
        assert!(!treasury.is_creative());
        assert_eq!(treasury.balance(), Balance::Finite(1000));
    }

    #[test]
    fn test_add_saturates() {
        let mut treasury = Treasury::new(u64::MAX - 1);
        treasury.add(10);
        assert_eq!(treasury.raw_balance(), u64::MAX);
    }
}
