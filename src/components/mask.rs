//! Per-pixel collision masks.
//!
//! Bounding boxes alone produce hits that look wrong near transparent sprite
//! edges. A [`Mask`] records which pixels of a frame are opaque; [`Shape`]
//! pairs a world rectangle with an optional mask so two shapes can be tested
//! pixel by pixel. A shape without a mask is treated as a solid rectangle.
//!
//! Masks are anchored on the centre of their rectangle, matching how frames
//! are drawn around the entity's rect centre.

use glam::Vec2;

use crate::components::boxcollider::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Fully opaque mask.
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask from a per-pixel predicate.
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[(y as u64 * self.width as u64 + x as u64) as usize]
    }
}

/// A rectangle in world space with an optional opacity mask.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    pub rect: Rect,
    pub mask: Option<&'a Mask>,
}

impl<'a> Shape<'a> {
    pub fn new(rect: Rect, mask: Option<&'a Mask>) -> Self {
        Self { rect, mask }
    }

    /// World-space area covered by the shape's pixels.
    fn area(&self) -> Rect {
        match self.mask {
            Some(mask) => Rect::from_center(
                self.rect.center(),
                mask.width() as f32,
                mask.height() as f32,
            ),
            None => self.rect,
        }
    }

    fn solid_at(&self, area: &Rect, p: Vec2) -> bool {
        match self.mask {
            Some(mask) => mask.get(
                (p.x - area.left()).floor() as i64,
                (p.y - area.top()).floor() as i64,
            ),
            None => area.contains_point(p),
        }
    }

    /// Fine-grained overlap: rectangles first, then pixels in the shared area.
    pub fn overlaps(&self, other: &Shape<'_>) -> bool {
        if !self.rect.overlaps(&other.rect) {
            return false;
        }
        if self.mask.is_none() && other.mask.is_none() {
            return true;
        }
        let (a_area, b_area) = (self.area(), other.area());
        let Some(shared) = a_area.intersection(&b_area) else {
            return false;
        };
        let (x0, x1) = (shared.left().floor() as i64, shared.right().ceil() as i64);
        let (y0, y1) = (shared.top().floor() as i64, shared.bottom().ceil() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                // sample pixel centres
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if self.solid_at(&a_area, p) && other.solid_at(&b_area, p) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_shapes_fall_back_to_rect_overlap() {
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0), None);
        let b = Shape::new(Rect::new(5.0, 5.0, 10.0, 10.0), None);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn transparent_corner_does_not_hit() {
        // Only the left half of a 10x10 frame is opaque.
        let half = Mask::from_fn(10, 10, |x, _| x < 5);
        let sprite = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0), Some(&half));
        // Small box touching only the transparent right half.
        let bullet = Shape::new(Rect::new(7.0, 4.0, 2.0, 2.0), None);
        assert!(sprite.rect.overlaps(&bullet.rect));
        assert!(!sprite.overlaps(&bullet));
        let bullet_left = Shape::new(Rect::new(2.0, 4.0, 2.0, 2.0), None);
        assert!(sprite.overlaps(&bullet_left));
    }

    #[test]
    fn two_masks_must_share_an_opaque_pixel() {
        let left = Mask::from_fn(4, 4, |x, _| x == 0);
        let right = Mask::from_fn(4, 4, |x, _| x == 3);
        let a = Shape::new(Rect::new(0.0, 0.0, 4.0, 4.0), Some(&left));
        let b = Shape::new(Rect::new(0.0, 0.0, 4.0, 4.0), Some(&right));
        assert!(!a.overlaps(&b));
        let c = Shape::new(Rect::new(-3.0, 0.0, 4.0, 4.0), Some(&right));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn mask_get_out_of_bounds_is_transparent() {
        let m = Mask::solid(2, 2);
        assert!(m.get(1, 1));
        assert!(!m.get(2, 0));
        assert!(!m.get(-1, 0));
        assert!(!m.get(0, 2));
    }
}
