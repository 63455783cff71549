//! Axis-aligned rectangles and the collider component built on them.
//!
//! [`Rect`] is the geometry primitive used by every collision test in the
//! crate. Edges follow screen coordinates (Y+ is down) and overlap is strict,
//! so two rectangles that only share an edge do not collide.
//!
//! [`BoxCollider`] is the geometry contract exposed by every collidable
//! entity: a visual rectangle, an optional gameplay hitbox and the hitbox as
//! it was one tick earlier.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle of the given size centred on `center`.
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    /// Build a rectangle of the given size whose mid-top point is `midtop`.
    pub fn from_midtop(midtop: Vec2, w: f32, h: f32) -> Self {
        Self::new(midtop.x - w / 2.0, midtop.y, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn top(&self) -> f32 {
        self.y
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }
    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.bottom())
    }

    pub fn set_left(&mut self, v: f32) {
        self.x = v;
    }
    pub fn set_right(&mut self, v: f32) {
        self.x = v - self.w;
    }
    pub fn set_top(&mut self, v: f32) {
        self.y = v;
    }
    pub fn set_bottom(&mut self, v: f32) {
        self.y = v - self.h;
    }
    pub fn set_center_x(&mut self, v: f32) {
        self.x = v - self.w / 2.0;
    }
    pub fn set_center_y(&mut self, v: f32) {
        self.y = v - self.h / 2.0;
    }
    pub fn set_center(&mut self, c: Vec2) {
        self.set_center_x(c.x);
        self.set_center_y(c.y);
    }
    pub fn set_topleft(&mut self, p: Vec2) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Strict AABB overlap: shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, right and bottom edges excluded.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Grow (or shrink with negative values) around the centre.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        Rect::from_center(self.center(), self.w + dw, self.h + dh)
    }

    /// Intersection of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

/// Collision geometry carried by an entity.
///
/// `rect` is the visual bounding rectangle used for broad-phase filtering.
/// `hitbox` is the rectangle the swept resolver works with; entities without
/// one are skipped by the resolver. `prev_hitbox` is the hitbox at the end of
/// the previous tick, required to tell which side a collision came from.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub rect: Rect,
    pub hitbox: Option<Rect>,
    pub prev_hitbox: Rect,
}

impl BoxCollider {
    /// Static geometry: hitbox equals the rectangle and never moves.
    pub fn solid(rect: Rect) -> Self {
        Self {
            rect,
            hitbox: Some(rect),
            prev_hitbox: rect,
        }
    }

    /// Collider with a hitbox distinct from the visual rectangle.
    pub fn with_hitbox(rect: Rect, hitbox: Rect) -> Self {
        Self {
            rect,
            hitbox: Some(hitbox),
            prev_hitbox: hitbox,
        }
    }

    /// Visual-only collider (effects); ignored by the swept resolver.
    pub fn visual(rect: Rect) -> Self {
        Self {
            rect,
            hitbox: None,
            prev_hitbox: rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_setters_agree() {
        let mut r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        r.set_right(100.0);
        assert_eq!(r.left(), 70.0);
        r.set_bottom(0.0);
        assert_eq!(r.top(), -40.0);
        r.set_center(Vec2::new(0.0, 0.0));
        assert_eq!(r.left(), -15.0);
        assert_eq!(r.top(), -20.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn inflate_keeps_center() {
        let r = Rect::new(0.0, 0.0, 40.0, 80.0);
        let narrow = r.inflate(-30.0, 0.0);
        assert_eq!(narrow.w, 10.0);
        assert_eq!(narrow.center(), r.center());
    }

    #[test]
    fn intersection_of_disjoint_is_none() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(6.0, 6.0, 5.0, 5.0);
        assert!(a.intersection(&b).is_none());
        let c = Rect::new(3.0, 3.0, 5.0, 5.0);
        assert_eq!(a.intersection(&c), Some(Rect::new(3.0, 3.0, 2.0, 2.0)));
    }
}
