/// Player's cumulative score. Only ever credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Add `amount` and return the new balance. Zero credits leave the wallet untouched.
    pub fn credit(&mut self, amount: u32) -> u64 {
        if amount > 0 {
            self.balance = self.balance.saturating_add(u64::from(amount));
            tracing::debug!(amount, balance = self.balance, "wallet credited");
        }
        self.balance
    }
}
