//! Damage-target seam implemented by the combat layer.

use tempest_shared::Vec2;

/// Something a hazard can hurt.
pub trait DamageTarget {
    /// Applies `amount` damage.
    fn take_damage(&mut self, amount: f32);

    /// Current position, tested against the hazard radius.
    fn position(&self) -> Vec2;
}
