//! Rectangle bin packing.
//!
//! [`MaxRectsPacker`] implements the MaxRects algorithm: it tracks the maximal
//! free rectangles of the bin, places each rectangle into the smallest free
//! rectangle that still holds it (best area fit, ties broken by the shorter
//! leftover side), then splits and prunes the free list.
//! Rectangles are never rotated since glyph descriptors have no rotation flag.

use super::rect::Rectangle;
use crate::glyph::GlyphKey;

/// A rectangle placed inside the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub tag: GlyphKey,
}

/// A packer that places rectangles into a fixed-size bin.
pub trait BinPacker {
    /// Forget all placements and start over with an empty bin.
    fn reset(&mut self, width: u32, height: u32);

    /// Place as many rectangles as fit.
    ///
    /// Placed rectangles are removed from `rects`; what is left did not fit.
    fn insert(&mut self, rects: &mut Vec<Rectangle>) -> Vec<PlacedRect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Area {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Area {
    #[inline]
    fn right(&self) -> u32 {
        self.x + self.width
    }

    #[inline]
    fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    fn contains(&self, other: &Area) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    #[inline]
    fn intersects(&self, other: &Area) -> bool {
        other.x < self.right()
            && other.right() > self.x
            && other.y < self.bottom()
            && other.bottom() > self.y
    }
}

/// MaxRects bin packer.
///
/// Insertion works in batch mode: every step scores all pending rectangles
/// against all free rectangles and places the best pair, so the result depends
/// only on the input order when scores tie.
#[derive(Debug, Clone, Default)]
pub struct MaxRectsPacker {
    free: Vec<Area>,
}

impl MaxRectsPacker {
    /// Create an empty packer; call [`BinPacker::reset`] to size the bin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Best position for a rectangle and its (primary, secondary) score, lower is better.
    fn find_position(&self, width: u32, height: u32) -> Option<(Area, (u64, u64))> {
        let mut best: Option<(Area, (u64, u64))> = None;

        for free in &self.free {
            if width > free.width || height > free.height {
                continue;
            }
            let node = Area {
                x: free.x,
                y: free.y,
                width,
                height,
            };
            let leftover_h = u64::from(free.width - width);
            let leftover_v = u64::from(free.height - height);
            let area_fit =
                u64::from(free.width) * u64::from(free.height) - u64::from(width) * u64::from(height);
            let score = (area_fit, leftover_h.min(leftover_v));

            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((node, score));
            }
        }

        best
    }

    fn place(&mut self, node: Area) {
        let mut split = Vec::new();
        self.free.retain(|free| {
            if !free.intersects(&node) {
                return true;
            }
            split_free_area(free, &node, &mut split);
            false
        });
        self.free.extend(split);
        self.prune_free_list();
    }

    /// Drop free rectangles fully contained in another one.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let mut removed = false;
            while j < self.free.len() {
                if self.free[j].contains(&self.free[i]) {
                    self.free.remove(i);
                    removed = true;
                    break;
                }
                if self.free[i].contains(&self.free[j]) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed {
                i += 1;
            }
        }
    }
}

/// Cut the parts of `free` not covered by `used` into up to four maximal rectangles.
fn split_free_area(free: &Area, used: &Area, out: &mut Vec<Area>) {
    if used.x < free.right() && used.right() > free.x {
        if used.y > free.y && used.y < free.bottom() {
            out.push(Area {
                height: used.y - free.y,
                ..*free
            });
        }
        if used.bottom() < free.bottom() {
            out.push(Area {
                y: used.bottom(),
                height: free.bottom() - used.bottom(),
                ..*free
            });
        }
    }
    if used.y < free.bottom() && used.bottom() > free.y {
        if used.x > free.x && used.x < free.right() {
            out.push(Area {
                width: used.x - free.x,
                ..*free
            });
        }
        if used.right() < free.right() {
            out.push(Area {
                x: used.right(),
                width: free.right() - used.right(),
                ..*free
            });
        }
    }
}

impl BinPacker for MaxRectsPacker {
    fn reset(&mut self, width: u32, height: u32) {
        self.free.clear();
        if width > 0 && height > 0 {
            self.free.push(Area {
                x: 0,
                y: 0,
                width,
                height,
            });
        }
    }

    fn insert(&mut self, rects: &mut Vec<Rectangle>) -> Vec<PlacedRect> {
        let mut placed = Vec::with_capacity(rects.len());

        while !rects.is_empty() {
            let mut best: Option<(usize, Area, (u64, u64))> = None;
            for (i, rect) in rects.iter().enumerate() {
                if let Some((node, score)) = self.find_position(rect.width, rect.height)
                    && best.is_none_or(|(_, _, best_score)| score < best_score)
                {
                    best = Some((i, node, score));
                }
            }

            let Some((index, node, _)) = best else {
                break;
            };
            let rect = rects.remove(index);
            self.place(node);
            placed.push(PlacedRect {
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                tag: rect.tag,
            });
        }

        placed
    }
}
