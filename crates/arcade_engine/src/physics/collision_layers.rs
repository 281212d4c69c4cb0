//! Collision tags for filtering hit detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."
//!
//! Every collidable entity has a tag (what it is) and a set of hit interests
//! (what it wants to hear about). Unlike physical layers, interest is
//! one-directional: a target can care about players without players caring
//! about targets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision tag bit set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CollisionTags: u32 {
        /// Player controlled entities
        const PLAYER = 1 << 0;
        /// Things to hit or avoid
        const TARGET = 1 << 1;
        /// Projectiles (bullets, etc.)
        const PROJECTILE = 1 << 2;
        /// Purely visual effects
        const EFFECT = 1 << 3;
        /// Static environment
        const ENVIRONMENT = 1 << 4;
    }
}

impl CollisionTags {
    /// Whether an entity with `interests` wants a hit event for an entity tagged `other_tag`
    ///
    /// # Example
    /// ```
    /// use arcade_engine::physics::CollisionTags;
    ///
    /// let target_interests = CollisionTags::PLAYER;
    /// assert!(CollisionTags::wants_hit(target_interests, CollisionTags::PLAYER));
    /// assert!(!CollisionTags::wants_hit(CollisionTags::empty(), CollisionTags::TARGET));
    /// ```
    pub fn wants_hit(interests: CollisionTags, other_tag: CollisionTags) -> bool {
        interests.intersects(other_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_is_one_way() {
        let player_tag = CollisionTags::PLAYER;
        let player_interests = CollisionTags::empty();
        let target_tag = CollisionTags::TARGET;
        let target_interests = CollisionTags::PLAYER;

        assert!(CollisionTags::wants_hit(target_interests, player_tag));
        assert!(!CollisionTags::wants_hit(player_interests, target_tag));
    }

    #[test]
    fn test_mask_creation() {
        let mask = CollisionTags::PLAYER | CollisionTags::PROJECTILE;
        assert!(CollisionTags::wants_hit(mask, CollisionTags::PROJECTILE));
        assert!(!CollisionTags::wants_hit(mask, CollisionTags::EFFECT));
    }
}
