// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Severity arithmetic for lexicographic cost terms.
//!
//! Rule violations are not all equal: pairing two players for a third time is
//! categorically worse than pairing them for a second time, and the cost
//! terms encode that by growing super-linearly in the violation count. The
//! `multiple` function computes the geometric severity sum
//! `base^0 + base^1 + … + base^(count-1)`, saturating at [`CostValue::MAX`]
//! so that large sections cannot overflow into accidental preference.

use num_traits::ToPrimitive;

/// The scalar type of a single cost term.
///
/// Cost vectors are compared lexicographically term by term, so the scalar
/// only needs a total order and enough headroom for `players * MAX_RATING`
/// style products.
pub type CostValue = i64;

/// Returns `base^0 + base^1 + … + base^(count-1)`, saturating at
/// [`CostValue::MAX`].
///
/// A count of zero yields zero, a count of one yields one, and each further
/// violation adds a term that dwarfs everything a smaller count could reach
/// (for `base >= 2`). `count` accepts any primitive numeric type; fractional
/// counts truncate toward zero and negative counts clamp to zero.
///
/// # Examples
///
/// ```rust
/// # use wallchart_core::num::multiple;
/// assert_eq!(multiple(0, 10), 0);
/// assert_eq!(multiple(1, 10), 1);
/// assert_eq!(multiple(3, 10), 111);
/// assert!(multiple(200, 10) > multiple(199, 10) || multiple(200, 10) == i64::MAX);
/// ```
pub fn multiple<C>(count: C, base: usize) -> CostValue
where
    C: ToPrimitive,
{
    let count = count.to_i64().unwrap_or(0).max(0);
    let base = base as CostValue;
    let mut result: CostValue = 0;
    let mut term: CostValue = 1;
    for _ in 0..count {
        result = result.saturating_add(term);
        term = term.saturating_mul(base);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_zero_is_zero() {
        assert_eq!(multiple(0, 2), 0);
        assert_eq!(multiple(0, 64), 0);
    }

    #[test]
    fn test_multiple_strictly_increasing() {
        for base in [2usize, 3, 10, 40] {
            let mut last = -1;
            for count in 0..20 {
                let value = multiple(count, base);
                assert!(
                    value > last,
                    "multiple({count}, {base}) = {value} not above {last}"
                );
                last = value;
            }
        }
    }

    #[test]
    fn test_multiple_geometric_sum() {
        // 5^0 + 5^1 + 5^2 + 5^3 = 156
        assert_eq!(multiple(4, 5), 156);
    }

    #[test]
    fn test_multiple_saturates_instead_of_wrapping() {
        let huge = multiple(10_000, 1_000);
        assert_eq!(huge, CostValue::MAX);
        // Saturation must preserve monotonicity (non-strict at the cap).
        assert!(multiple(10_001, 1_000) >= huge);
    }

    #[test]
    fn test_multiple_truncates_fractional_counts() {
        assert_eq!(multiple(2.9_f32, 10), multiple(2, 10));
        assert_eq!(multiple(-1.0_f64, 10), 0);
    }
}
