//! Distributing glyph rectangles over texture pages.

use super::packer::{BinPacker, MaxRectsPacker, PlacedRect};
use super::rect::Rectangle;
use super::{PageSize, Spacing};
use crate::error::{Error, Result};
use crate::glyph::GlyphTable;
use crate::logging::targets;

/// States of the page planning loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// Looking for the next candidate size, starting at the given index.
    SelectingCandidate { next: usize },
    /// Packing the remaining rectangles into the candidate at the given index.
    Packing { candidate: usize },
    /// Turning the last packing attempt into a page.
    Finalizing,
    /// Every rectangle has been placed.
    Done,
    /// The last attempt placed nothing.
    Failed,
}

/// Result of packing the remaining rectangles into one candidate size.
#[derive(Debug)]
struct Attempt {
    size: PageSize,
    placed: Vec<PlacedRect>,
    pending: Vec<Rectangle>,
}

/// Packs rectangles page by page, trying candidate sizes smallest first.
///
/// For every page the planner skips candidates whose usable area is smaller than
/// the area still to be placed (the last candidate is always tried), packs into
/// the first acceptable one and moves on to larger candidates until one holds
/// everything. When none does, the attempt on the last candidate becomes the page
/// and the leftovers start the next page.
#[derive(Debug)]
pub struct PagePlanner<P: BinPacker = MaxRectsPacker> {
    packer: P,
    candidates: Vec<PageSize>,
    spacing: Spacing,
    crop_width: bool,
    crop_height: bool,
}

impl PagePlanner<MaxRectsPacker> {
    /// A planner backed by a best-area-fit MaxRects packer.
    pub fn new(candidates: Vec<PageSize>, spacing: Spacing) -> Self {
        Self::with_packer(MaxRectsPacker::new(), candidates, spacing)
    }
}

impl<P: BinPacker> PagePlanner<P> {
    /// A planner driving a custom packer.
    pub fn with_packer(packer: P, candidates: Vec<PageSize>, spacing: Spacing) -> Self {
        Self {
            packer,
            candidates,
            spacing,
            crop_width: false,
            crop_height: false,
        }
    }

    /// Shrink finished pages to the extent of their glyphs.
    pub fn crop(mut self, width: bool, height: bool) -> Self {
        self.crop_width = width;
        self.crop_height = height;
        self
    }

    /// Usable packing area of a candidate: its size minus the leading spacing.
    fn work_area(&self, size: PageSize) -> PageSize {
        PageSize::new(
            size.width.saturating_sub(self.spacing.horizontal),
            size.height.saturating_sub(self.spacing.vertical),
        )
    }

    /// First candidate at or after `from` worth trying for `area` pixels.
    fn select_candidate(&self, from: usize, area: u64) -> Option<usize> {
        let last = self.candidates.len().checked_sub(1)?;
        (from..=last).find(|&i| {
            let work = self.work_area(self.candidates[i]);
            u64::from(work.width) * u64::from(work.height) >= area || i == last
        })
    }

    /// Place every rectangle and write page, x and y into the glyph table.
    ///
    /// Returns the page sizes in page order. No rectangles means no pages.
    pub fn plan(&mut self, rectangles: Vec<Rectangle>, glyphs: &mut GlyphTable) -> Result<Vec<PageSize>> {
        let mut remaining = rectangles;
        remaining.sort_by_key(|rect| rect.tag);

        let mut pages = Vec::new();
        let mut area: u64 = remaining.iter().map(Rectangle::area).sum();
        let mut attempt: Option<Attempt> = None;
        let mut state = if remaining.is_empty() {
            PlanState::Done
        } else {
            PlanState::SelectingCandidate { next: 0 }
        };

        loop {
            state = match state {
                PlanState::SelectingCandidate { next } => match self.select_candidate(next, area) {
                    Some(candidate) => PlanState::Packing { candidate },
                    None => PlanState::Finalizing,
                },
                PlanState::Packing { candidate } => {
                    let size = self.candidates[candidate];
                    let work = self.work_area(size);
                    let mut pending = remaining.clone();
                    self.packer.reset(work.width, work.height);
                    let placed = self.packer.insert(&mut pending);
                    tracing::trace!(
                        target: targets::LAYOUT,
                        page = pages.len(),
                        width = size.width,
                        height = size.height,
                        placed = placed.len(),
                        pending = pending.len(),
                        "packing attempt"
                    );

                    let is_last = candidate + 1 == self.candidates.len();
                    let fits = pending.is_empty();
                    attempt = Some(Attempt { size, placed, pending });
                    if fits || is_last {
                        PlanState::Finalizing
                    } else {
                        PlanState::SelectingCandidate { next: candidate + 1 }
                    }
                }
                PlanState::Finalizing => match attempt.take() {
                    Some(done) if !done.placed.is_empty() => {
                        let page = self.finalize(pages.len(), done.size, &done.placed, glyphs);
                        tracing::debug!(
                            target: targets::LAYOUT,
                            index = pages.len(),
                            width = page.width,
                            height = page.height,
                            glyphs = done.placed.len(),
                            "page finalized"
                        );
                        pages.push(page);
                        remaining = done.pending;
                        area = remaining.iter().map(Rectangle::area).sum();
                        if remaining.is_empty() {
                            PlanState::Done
                        } else {
                            PlanState::SelectingCandidate { next: 0 }
                        }
                    }
                    _ => PlanState::Failed,
                },
                PlanState::Done => return Ok(pages),
                PlanState::Failed => {
                    return Err(Error::CannotFitGlyphs {
                        remaining: remaining.len(),
                    });
                }
            };
        }
    }

    fn finalize(
        &self,
        index: usize,
        size: PageSize,
        placed: &[PlacedRect],
        glyphs: &mut GlyphTable,
    ) -> PageSize {
        let mut max_x = 0;
        let mut max_y = 0;
        for rect in placed {
            let x = rect.x + self.spacing.horizontal;
            let y = rect.y + self.spacing.vertical;
            if let Some(glyph) = glyphs.get_mut(&rect.tag) {
                glyph.x = x;
                glyph.y = y;
                glyph.page = index as u32;
            }
            max_x = max_x.max(x + rect.width);
            max_y = max_y.max(y + rect.height);
        }

        PageSize::new(
            if self.crop_width { max_x } else { size.width },
            if self.crop_height { max_y } else { size.height },
        )
    }
}
