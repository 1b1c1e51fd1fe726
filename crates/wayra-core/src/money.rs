//! # Money Module
//!
//! Provides the `Money` type for Colombian peso amounts.
//!
//! ## Why Integer Pesos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the old price form (floats, recomputed on every keystroke):        │
//! │    40000 × 1.15 × 1.15 = 52899.99999999999  ❌                          │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimal products, rounded ONCE                     │
//! │    cost × rate × margin × IVA  →  one exact integer × 10^k             │
//! │    product → pesos with round-half-up  →  52900 ✅                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayra_core::money::Money;
//!
//! let venta = Money::from_pesos(52_900);
//! assert_eq!(venta.to_string(), "$52.900");
//!
//! // 90% wholesale tier, rounded half-up to the peso
//! assert_eq!(venta.apply_ratio(9_000).pesos(), 47_610);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i128 = 10_000;

/// Decimal exponent of one basis point (1 bps = 10^-4).
pub const BPS_EXPONENT: i32 = -4;

// =============================================================================
// Exact Input Amounts
// =============================================================================

/// A non-negative decimal `coefficient × 10^exponent`, held exactly.
///
/// Built from the shortest decimal that round-trips an `f64`, i.e. the value
/// the user typed: `1.234` is `1234 × 10^-3`, never `1.2339999…`.
///
/// ## Example
/// ```rust
/// use wayra_core::money::ExactAmount;
///
/// let cost = ExactAmount::from_f64(1.234).unwrap();
/// assert_eq!((cost.coefficient(), cost.exponent()), (1_234, -3));
/// assert!(ExactAmount::from_f64(-1.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactAmount {
    coefficient: u64,
    exponent: i32,
}

impl ExactAmount {
    /// Exactly one.
    pub const ONE: ExactAmount = ExactAmount {
        coefficient: 1,
        exponent: 0,
    };

    /// Returns `None` for negative or non-finite values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        if value == 0.0 {
            return Some(ExactAmount {
                coefficient: 0,
                exponent: 0,
            });
        }

        // `{:e}` prints the shortest round-trip digits: "1.234e0", "4e-3"
        let text = format!("{:e}", value);
        let (mantissa, exponent) = text.split_once('e')?;
        let exponent: i32 = exponent.parse().ok()?;
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let mut digits = String::with_capacity(whole.len() + fraction.len());
        digits.push_str(whole);
        digits.push_str(fraction);

        Some(ExactAmount {
            coefficient: digits.parse().ok()?,
            exponent: exponent - fraction.len() as i32,
        })
    }

    pub const fn coefficient(&self) -> u64 {
        self.coefficient
    }

    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    pub const fn is_zero(&self) -> bool {
        self.coefficient == 0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Colombian pesos (COP has no minor unit in use).
///
/// ## Where Money is Used
/// ```text
/// precio_compra (f64, COP or USD)
///      │ validate → ExactAmount (typed digits)
///      ▼
/// PricingEngine ──► precio_venta ──┬──► precio_minorista
///                                  └──► precio_mayorista
///      │
///      ▼
/// Displayed as "$52.900" in the dashboard
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the amount in whole pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Converts an exact fraction of pesos into Money, rounding half-up.
    ///
    /// Halves round away from zero, so `2.5 → 3` and `-2.5 → -3`.
    ///
    /// ## Example
    /// ```rust
    /// use wayra_core::money::Money;
    ///
    /// assert_eq!(Money::from_ratio(5, 2).pesos(), 3);   // 2.5
    /// assert_eq!(Money::from_ratio(7, 3).pesos(), 2);   // 2.33
    /// assert_eq!(Money::from_ratio(-5, 2).pesos(), -3); // -2.5
    /// ```
    ///
    /// A non-positive denominator yields zero.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Money {
        if denominator <= 0 {
            return Money::zero();
        }

        // floor(n/d + 1/2) == (2n + d) / 2d for n >= 0
        let magnitude = (2 * numerator.abs() + denominator) / (2 * denominator);
        let signed = if numerator < 0 { -magnitude } else { magnitude };
        Money(saturate(signed))
    }

    /// Rounds `Π factors × 10^exponent` pesos half-up, exactly.
    ///
    /// The pricing pipeline's single rounding point: the whole
    /// cost × rate × margin × IVA chain arrives here unrounded. The product
    /// is carried in 256 bits, so no factor combination loses precision;
    /// results beyond `i64` saturate.
    ///
    /// ## Example
    /// ```rust
    /// use wayra_core::money::Money;
    ///
    /// // 1.234 × 4000 × 1.15 × 1.15 = 6527.86
    /// let venta = Money::from_decimal_product(&[1_234, 4, 11_500, 11_500], -3 + 3 - 8);
    /// assert_eq!(venta.pesos(), 6_528);
    /// ```
    pub fn from_decimal_product(factors: &[u64], exponent: i32) -> Money {
        let mut value = Wide::ONE;
        for &factor in factors {
            if !value.mul_small(factor) {
                return Money(i64::MAX);
            }
        }

        if exponent >= 0 {
            for _ in 0..exponent {
                if !value.mul_small(10) {
                    return Money(i64::MAX);
                }
            }
            return Money(value.saturating_i64());
        }

        // Drop all but the last fractional digit, then round on it
        for _ in 1..exponent.unsigned_abs() {
            if value.is_zero() {
                return Money::zero();
            }
            value.div_small(10);
        }
        let first_dropped = value.div_small(10);

        let pesos = value.saturating_i64();
        Money(if first_dropped >= 5 {
            pesos.saturating_add(1)
        } else {
            pesos
        })
    }

    /// Multiplies by a basis-point ratio (10000 = 100%), rounding half-up.
    ///
    /// ## Example
    /// ```rust
    /// use wayra_core::money::Money;
    ///
    /// let venta = Money::from_pesos(10_001);
    /// assert_eq!(venta.apply_ratio(10_000).pesos(), 10_001);
    /// assert_eq!(venta.apply_ratio(9_500).pesos(), 9_501); // 9500.95
    /// ```
    pub fn apply_ratio(&self, ratio_bps: u32) -> Money {
        Money::from_ratio(self.0 as i128 * ratio_bps as i128, BPS_SCALE)
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value > 0 { i64::MAX } else { i64::MIN })
}

/// Unsigned 256-bit scratch integer, little-endian 64-bit limbs.
#[derive(Debug, Clone, Copy)]
struct Wide([u64; 4]);

impl Wide {
    const ONE: Wide = Wide([1, 0, 0, 0]);

    fn is_zero(&self) -> bool {
        self.0.iter().all(|&limb| limb == 0)
    }

    /// `self *= m`; false on overflow past 256 bits.
    fn mul_small(&mut self, m: u64) -> bool {
        let mut carry: u128 = 0;
        for limb in self.0.iter_mut() {
            let product = *limb as u128 * m as u128 + carry;
            *limb = product as u64;
            carry = product >> 64;
        }
        carry == 0
    }

    /// `self /= d`, returning the remainder.
    fn div_small(&mut self, d: u64) -> u64 {
        let mut remainder: u128 = 0;
        for limb in self.0.iter_mut().rev() {
            let current = (remainder << 64) | *limb as u128;
            *limb = (current / d as u128) as u64;
            remainder = current % d as u128;
        }
        remainder as u64
    }

    fn saturating_i64(&self) -> i64 {
        if self.0[1..].iter().any(|&limb| limb != 0) {
            return i64::MAX;
        }
        i64::try_from(self.0[0]).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders es-CO style: `$1.234.567`, `-$1.500`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}${}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
