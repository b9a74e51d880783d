//! Common components used across the game.

/// Health component for damageable entities. Always within `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Subtract `amount`; NaN and negative amounts are ignored.
    pub fn take_damage(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.current = (self.current - amount).clamp(0.0, self.max);
        }
    }

    /// Add `amount`, clamped to `max`.
    pub fn heal(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.current = (self.current + amount).clamp(0.0, self.max);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Health as a percentage (0–100).
    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max * 100.0
        } else {
            0.0
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Lifetime component for temporary entities (debris, particles, bursts).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds,
            total: seconds,
        }
    }

    /// Tick down; returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    /// 0.0 at spawn, 1.0 at expiry.
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
        }
    }
}
