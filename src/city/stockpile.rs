//! Stockpile - settlement-level food storage

use serde::{Deserialize, Serialize};

/// Food held by a settlement. Deposits only; nothing is withdrawn or spoils.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stockpile {
    amount: u64,
    /// Lifetime sum of deposits
    total_deposited: u64,
    deposits: u32,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount stored
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn total_deposited(&self) -> u64 {
        self.total_deposited
    }

    /// Number of non-empty deposits received
    pub fn deposit_count(&self) -> u32 {
        self.deposits
    }

    /// Add resources; returns the new stored amount
    pub fn deposit(&mut self, amount: u32) -> u64 {
        if amount > 0 {
            self.amount += amount as u64;
            self.total_deposited += amount as u64;
            self.deposits += 1;
        }
        self.amount
    }
}
