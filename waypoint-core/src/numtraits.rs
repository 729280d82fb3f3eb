//! Numeric helper traits for edge weights.

use std::fmt::Debug;

/// Helper trait providing zero value for numeric types.
pub trait Zero {
    const ZERO: Self;
}

impl Zero for f64 {
    const ZERO: f64 = 0.0;
}

impl Zero for u32 {
    const ZERO: u32 = 0;
}

impl Zero for u64 {
    const ZERO: u64 = 0;
}

impl Zero for i64 {
    const ZERO: i64 = 0;
}

/// Helper trait, providing total ordering for non-`Ord` types,
/// such as `f64`, given its value is finite (i.e. not `NaN`, `Infinity` etc.)
pub trait IntoOrd {
    /// Some substitute `Ord` type which can be used instead of `Self` for ordering purposes.
    /// Only should be used for comparisons, its value itself is meaningless.
    type Output: Ord + Copy + Debug;

    /// Convert self into `Ord`-supporting type `Self::Output`.
    fn into_ord(self) -> Self::Output;
}

impl IntoOrd for f64 {
    type Output = i64;

    fn into_ord(self) -> Self::Output {
        debug_assert!(!self.is_nan(), "NaN weight detected");
        // Same bit trick as `f64::total_cmp()`
        let x = self.to_bits() as i64;
        x ^ (((x >> 63) as u64) >> 1) as i64
    }
}

macro_rules! impl_into_ord_for_int {
    ($($t:ty),*) => {
        $(
            impl IntoOrd for $t {
                type Output = $t;

                #[inline]
                fn into_ord(self) -> Self::Output {
                    self
                }
            }
        )*
    };
}

impl_into_ord_for_int!(u32, u64, i64);

/// Everything the path search needs from an edge weight.
pub trait Weight: Copy + PartialOrd + Zero + IntoOrd + Debug {
    /// Weight is usable by the search: not below zero and comparable with zero.
    /// `NaN` fails this check as well as negative values.
    fn is_admissible(&self) -> bool {
        *self >= Self::ZERO
    }

    /// Sum of two weights, `None` if it is not representable.
    fn checked_add(self, other: Self) -> Option<Self>;
}

impl Weight for f64 {
    /// Float sums saturate to infinity, which still orders above every finite cost.
    #[inline]
    fn checked_add(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}

macro_rules! impl_weight_for_int {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn checked_add(self, other: Self) -> Option<Self> {
                    <$t>::checked_add(self, other)
                }
            }
        )*
    };
}

impl_weight_for_int!(u32, u64, i64);

#[test]
fn test_into_ord_f64() {
    let ord = |x: f64| x.into_ord();
    assert!(ord(0.0) > ord(-1.0));
    assert!(ord(0.0) < ord(1.0));
    assert!(ord(-1.0) < ord(1.0));
    assert!(ord(2.0) > ord(1.0));
    assert!(ord(-2.0) < ord(-1.0));
    assert!(ord(100.0) > ord(10.0));
    assert!(ord(f64::INFINITY) > ord(1e300));
}

#[test]
fn test_admissible_weights() {
    assert!(0.0_f64.is_admissible());
    assert!(3.5_f64.is_admissible());
    assert!(!(-0.5_f64).is_admissible());
    assert!(!f64::NAN.is_admissible());
    assert!(7_u32.is_admissible());
    assert!(!(-1_i64).is_admissible());
}

#[test]
fn test_checked_add() {
    assert_eq!(Weight::checked_add(2_u32, 3), Some(5));
    assert_eq!(Weight::checked_add(u32::MAX - 1, 5), None);
    assert_eq!(Weight::checked_add(u64::MAX, 1), None);
    assert_eq!(Weight::checked_add(i64::MAX, 1), None);
    assert_eq!(Weight::checked_add(f64::MAX, f64::MAX), Some(f64::INFINITY));
}
