//! House-relative classification of a transit sign.

use crate::domain::Sign;

/// House-count of `target` counted from `reference`, with `reference` itself
/// as house 1. Always in `1..=12`.
pub fn house_from(reference: Sign, target: Sign) -> u8 {
    ((target.index() + 12 - reference.index()) % 12) + 1
}
