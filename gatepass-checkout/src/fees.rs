use serde::{Deserialize, Serialize};

/// Fee parameters, loadable from configuration. Defaults match the
/// production gateway schedule in naira.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Gateway percentage rate applied to the amount
    pub gateway_rate: f64,

    /// Amounts at or above this threshold attract the flat surcharge
    pub surcharge_threshold: f64,

    /// Flat surcharge added above the threshold
    pub surcharge: f64,

    /// Hard cap on the gateway fee
    pub gateway_cap: f64,

    /// Flat platform fee added to any non-empty paid booking
    pub platform_flat: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gateway_rate: 0.015,
            surcharge_threshold: 2500.0,
            surcharge: 100.0,
            gateway_cap: 2000.0,
            platform_flat: 80.0,
        }
    }
}

/// A priced checkout line-up, recomputed on every selection change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: f64,
    pub platform_fee: f64,
    pub gateway_fee: f64,
    pub total: f64,
}

impl Quote {
    pub fn zero() -> Self {
        Self {
            subtotal: 0.0,
            platform_fee: 0.0,
            gateway_fee: 0.0,
            total: 0.0,
        }
    }
}

/// Computes checkout totals from a ticket subtotal
pub struct FeeEngine {
    config: FeeConfig,
}

impl FeeEngine {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    /// Gateway fee for a charge amount:
    /// `min(amount * rate (+ surcharge when amount >= threshold), cap)`
    pub fn gateway_fee(&self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }

        let mut fee = amount * self.config.gateway_rate;
        if amount >= self.config.surcharge_threshold {
            fee += self.config.surcharge;
        }
        fee.min(self.config.gateway_cap)
    }

    /// Flat platform fee, charged only when something is being bought
    pub fn platform_fee(&self, subtotal: f64) -> f64 {
        if subtotal > 0.0 {
            self.config.platform_flat
        } else {
            0.0
        }
    }

    /// Full quote for a subtotal. Free events quote all-zero.
    pub fn quote(&self, subtotal: f64) -> Quote {
        if subtotal <= 0.0 {
            return Quote::zero();
        }

        let platform_fee = self.platform_fee(subtotal);
        let gateway_fee = self.gateway_fee(subtotal);
        Quote {
            subtotal,
            platform_fee,
            gateway_fee,
            total: subtotal + platform_fee + gateway_fee,
        }
    }
}

impl Default for FeeEngine {
    fn default() -> Self {
        Self::new(FeeConfig::default())
    }
}
