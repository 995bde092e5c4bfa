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

//! Rotation primitives over the pairing vector.
//!
//! A swap only trades two slots; rotations move a whole chain of players
//! one board at a time while preserving slot parity (upper halves stay
//! upper, lower halves stay lower), wrapping through the opposite half
//! when the rotated span crosses a half boundary. The `shift` bit vector
//! lets the color-aware variants rotate through the slot whose assigned
//! color disagrees with the round's opening color, flipping colors as a
//! side effect.
//!
//! The odd flags extend a score-group rotation by one slot at either end:
//! `odd_pull_up` starts at the lower slot of the board above the group,
//! `odd_drop_down` ends at the upper slot of the board below it.

use fixedbitset::FixedBitSet;
use wallchart_model::color::Color;
use wallchart_model::pairing::PairVector;
use wallchart_model::roster::Roster;

#[inline]
fn shifted(shift: &FixedBitSet, slot: usize) -> usize {
    slot + shift.contains(slot) as usize
}

/// Rotates the even-indexed slots of `x..=y` one board toward the end,
/// wrapping through the lower half when the span crosses it.
#[allow(clippy::too_many_arguments)]
pub fn rotate_pair_down(
    pair: &mut PairVector,
    x: usize,
    y: usize,
    p_begin: usize,
    p_end: usize,
    odd_drop_down: bool,
    odd_pull_up: bool,
    shift: &FixedBitSet,
) {
    debug_assert!(p_begin % 2 == 0 && p_begin <= x && x < y && y <= p_end && p_end % 2 == 0);
    let (mut x, mut y, mut p_begin, mut p_end) = (x, y, p_begin, p_end);
    if odd_drop_down {
        debug_assert!(y % 2 == 0 && y == p_end - 2);
        y -= 1;
        p_end -= 2;
    }
    if odd_pull_up {
        debug_assert!(x % 2 == 1 && x == p_begin + 1);
        x += 1;
        p_begin += 2;
        pair.swap(x - 1, x);
    }
    debug_assert!(p_begin % 2 == 0 && p_begin <= x && x <= y && y <= p_end && p_end % 2 == 0);
    if x % 2 == 0 {
        if y % 2 == 0 {
            let mut z = x;
            while z + 2 <= y {
                pair.swap(shifted(shift, z), shifted(shift, z + 2));
                z += 2;
            }
        } else {
            let mut z = x;
            while z + 2 < p_end {
                pair.swap(shifted(shift, z), shifted(shift, z + 2));
                z += 2;
            }
            pair.swap(p_end - 2, p_begin + 1);
            let mut z = p_begin + 1;
            while z + 2 <= y {
                pair.swap(shifted(shift, z), shifted(shift, z + 2));
                z += 2;
            }
        }
    } else if y % 2 == 0 {
        let mut z = y;
        while z + 2 < p_end {
            pair.swap(shifted(shift, z), shifted(shift, z + 2));
            z += 2;
        }
        pair.swap(p_end - 2, p_begin + 1);
        let mut z = p_begin + 1;
        while z + 2 <= x {
            pair.swap(shifted(shift, z), shifted(shift, z + 2));
            z += 2;
        }
    } else {
        let mut z = x;
        while z + 2 <= y {
            pair.swap(shifted(shift, z), shifted(shift, z + 2));
            z += 2;
        }
    }
    if odd_drop_down {
        pair.swap(y, y + 1);
    }
}

/// The inverse of [`rotate_pair_down`].
#[allow(clippy::too_many_arguments)]
pub fn rotate_pair_up(
    pair: &mut PairVector,
    x: usize,
    y: usize,
    p_begin: usize,
    p_end: usize,
    odd_drop_down: bool,
    odd_pull_up: bool,
    shift: &FixedBitSet,
) {
    debug_assert!(p_begin % 2 == 0 && p_begin <= x && x < y && y <= p_end && p_end % 2 == 0);
    let (mut x, mut y, mut p_begin, mut p_end) = (x, y, p_begin, p_end);
    if odd_drop_down {
        debug_assert!(y % 2 == 0 && y == p_end - 2);
        y -= 1;
        p_end -= 2;
        pair.swap(y + 1, y);
    }
    if odd_pull_up {
        debug_assert!(x % 2 == 1 && x == p_begin + 1);
        x += 1;
        p_begin += 2;
    }
    debug_assert!(p_begin % 2 == 0 && p_begin <= x && x <= y && y <= p_end && p_end % 2 == 0);
    if x % 2 == 0 {
        if y % 2 == 0 {
            let mut z = y;
            while z >= x + 2 {
                pair.swap(shifted(shift, z), shifted(shift, z - 2));
                z -= 2;
            }
        } else {
            let mut z = y;
            while z >= p_begin + 2 {
                pair.swap(shifted(shift, z), shifted(shift, z - 2));
                z -= 2;
            }
            pair.swap(p_begin + 1, p_end - 2);
            let mut z = p_end - 2;
            while z >= x + 2 {
                pair.swap(shifted(shift, z), shifted(shift, z - 2));
                z -= 2;
            }
        }
    } else if y % 2 == 0 {
        let mut z = x;
        while z >= p_begin + 2 {
            pair.swap(shifted(shift, z), shifted(shift, z - 2));
            z -= 2;
        }
        pair.swap(p_begin + 1, p_end - 2);
        let mut z = p_end - 2;
        while z >= y + 2 {
            pair.swap(shifted(shift, z), shifted(shift, z - 2));
            z -= 2;
        }
    } else {
        let mut z = y;
        while z >= x + 2 {
            pair.swap(shifted(shift, z), shifted(shift, z - 2));
            z -= 2;
        }
    }
    if odd_pull_up {
        pair.swap(x, x - 1);
    }
}

/// Effective due color of the player in a slot, falling back to the
/// partner's preference and then to the slot's half.
fn slot_color(
    roster: &Roster,
    pair: &PairVector,
    slot: usize,
    prefer_partner_color: bool,
) -> Color {
    let player = roster.player(pair[slot]);
    if let Some(color) = player.due_color.color() {
        return color;
    }
    let partner_slot = if slot % 2 == 0 { slot + 1 } else { slot - 1 };
    match roster.player(pair[partner_slot]).due_color.color() {
        None => {
            if slot % 2 == 0 {
                Color::White
            } else {
                Color::Black
            }
        }
        Some(partner) => {
            if prefer_partner_color {
                partner
            } else {
                partner.flip()
            }
        }
    }
}

/// Finds a minimal cyclic rotation within a score group that flips the due
/// colors of the players in slots `x` and `y` to match their partners
/// without disturbing the rest of the group. Returns `false` when no such
/// rotation exists (the plain moves cover those cases).
#[allow(clippy::too_many_arguments)]
pub fn rotate_color(
    roster: &Roster,
    pair: &mut PairVector,
    x: usize,
    y: usize,
    p_begin: usize,
    p_end: usize,
    odd_drop_down: bool,
    odd_pull_up: bool,
) -> bool {
    // A span under one full board apart is already covered by a swap.
    if x / 2 + 1 >= y / 2 {
        return false;
    }
    let px = roster.player(pair[x]);
    let py = roster.player(pair[y]);
    if px.score != py.score {
        return false;
    }
    let due_x = px.due_color.color();
    let due_y = py.due_color.color();
    let x_color = match (due_x, due_y) {
        (Some(color), _) => color,
        (None, Some(color)) => color.flip(),
        (None, None) => return false,
    };
    let y_color = match (due_y, due_x) {
        (Some(color), _) => color,
        (None, Some(color)) => color.flip(),
        (None, None) => unreachable!(),
    };
    if x_color == y_color {
        return false;
    }
    let is_flip_x = due_x == Some(x_color) && due_y == Some(y_color);

    let mut top = x;
    if odd_pull_up || x % 2 == 0 {
        debug_assert!(!odd_pull_up || {
            let partner = if x % 2 == 0 { x + 1 } else { x - 1 };
            roster.player(pair[partner]).score > px.score
        });
        // Walk down to the first board whose effective color changes.
        top = x / 2 * 2 + 2;
        while top < y / 2 * 2 && slot_color(roster, pair, top, is_flip_x) == x_color {
            top += 2;
        }
        if top >= y / 2 * 2 {
            return false; // not enough color changes (need one more)
        }
        let mut z = top;
        loop {
            if z == x || z + 1 == x {
                pair.swap(x, z + 2);
                top += 1;
                break;
            }
            pair.swap(z, z + 2);
            z -= 2;
        }
    }
    debug_assert!(top % 2 == 1);

    if odd_drop_down || y % 2 == 0 {
        let mut w = top;
        let mut z = w + 2;
        while z < y {
            debug_assert!(p_begin <= z - 2 && z - 2 <= p_end);
            if slot_color(roster, pair, z, is_flip_x) == y_color {
                pair.swap(w, z);
                w = z;
            }
            z += 2;
        }
        pair.swap(w, y);
        w = y;
        let mut z = w + 1;
        while z > top + 2 {
            debug_assert!(p_begin <= z && z <= p_end);
            if slot_color(roster, pair, z - 2, is_flip_x) == x_color {
                pair.swap(w, z - 2);
                w = z - 2;
            }
            z -= 2;
        }
    } else {
        let mut z = top;
        while z >= x + 4 {
            debug_assert!(p_begin <= z && z <= p_end);
            pair.swap(z, z - 2);
            z -= 2;
        }
        pair.swap(top, y);
    }
    true
}
