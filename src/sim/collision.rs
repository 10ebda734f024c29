//! Collision detection and response for axis-aligned boxes
//!
//! A player box overlapping a platform is pushed out along the axis with the
//! smaller penetration depth. Ties go to the vertical axis.

use glam::Vec2;

use super::state::Platform;

/// How a player box should be separated from a platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Push sideways so the box's left edge sits at `x`
    Side { x: f32 },
    /// Landed on top, box's top edge goes to `y`
    Top { y: f32 },
    /// Hit the underside, box's top edge goes to `y`
    Bottom { y: f32 },
}

/// Strict AABB overlap (touching edges do not count)
#[inline]
pub fn overlaps(pos: Vec2, size: Vec2, plat: &Platform) -> bool {
    pos.x < plat.right() && pos.x + size.x > plat.x && pos.y < plat.bottom() && pos.y + size.y > plat.y
}

/// Penetration depth on each axis, assuming the boxes overlap
#[inline]
pub fn penetration(pos: Vec2, size: Vec2, plat: &Platform) -> Vec2 {
    Vec2::new(
        (pos.x + size.x - plat.x).min(plat.right() - pos.x),
        (pos.y + size.y - plat.y).min(plat.bottom() - pos.y),
    )
}

/// Classify the contact between a player box and a platform
///
/// Returns `None` if they do not overlap.
pub fn contact(pos: Vec2, size: Vec2, plat: &Platform) -> Option<Contact> {
    if !overlaps(pos, size, plat) {
        return None;
    }

    let depth = penetration(pos, size, plat);
    let center = pos + size / 2.0;
    let plat_center = plat.center();

    let resolved = if depth.x < depth.y {
        if center.x < plat_center.x {
            Contact::Side { x: plat.x - size.x }
        } else {
            Contact::Side { x: plat.right() }
        }
    } else if center.y < plat_center.y {
        Contact::Top { y: plat.y - size.y }
    } else {
        Contact::Bottom { y: plat.bottom() }
    };

    Some(resolved)
}
