use std::cmp;
use std::iter::FusedIterator;

use assert2::assert;
use nalgebra::Vector2;

use crate::geometry::{ScreenPoint, ScreenSize};

/// Half-open rectangle of pixels, `min` inclusive, `max` exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenBlock {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenBlock {
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> ScreenBlock {
        ScreenBlock { min, max }
    }

    /// A block of the given size with its minimum corner at the origin.
    pub fn from_size(size: ScreenSize) -> ScreenBlock {
        ScreenBlock {
            min: ScreenPoint::origin(),
            max: ScreenPoint::origin() + size,
        }
    }

    pub fn width(&self) -> u32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> u32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    pub fn contains_block(&self, other: &ScreenBlock) -> bool {
        other.is_empty()
            || (other.min.x >= self.min.x
                && other.min.y >= self.min.y
                && other.max.x <= self.max.x
                && other.max.y <= self.max.y)
    }

    /// Create an iterator over (x, y) coordinates inside the block,
    /// in C order (x changes first, then y)
    pub fn internal_points(&self) -> InternalPoints {
        if self.is_empty() {
            InternalPoints::empty()
        } else {
            InternalPoints {
                min_x: self.min.x,
                max: self.max,

                cursor: self.min,
            }
        }
    }

    /// Create an iterator over sub blocks in (roughly) spiral order, starting in the middle of
    /// the block. Chunks are chunk_size * chunk_size large, except on the bottom and right side
    /// of the block, where they may be clipped if chunk size doesn't evenly divide block size.
    /// Chunk size must be non zero.
    pub fn spiral_chunks(&self, chunk_size: u32) -> SpiralChunks {
        assert!(chunk_size > 0);

        if self.is_empty() {
            return SpiralChunks::empty();
        }

        let size = Vector2::new(
            self.width().div_ceil(chunk_size) as i32,
            self.height().div_ceil(chunk_size) as i32,
        );
        let cursor = size / 2;

        let dx = 2 * cursor.y - size.y;
        debug_assert!(dx == 0 || dx == -1);
        let direction = Vector2::new(dx, -1 - dx);

        SpiralChunks {
            block: *self,

            chunk_size,
            size,
            cursor,
            direction,

            segment: 2,
            segment_remaining: 1,
            remaining: (size.x * size.y) as u32,
        }
    }

    /// The order in which render workers pick up tiles of this block.
    pub fn tile_ordering(&self, tile_size: std::num::NonZeroU32) -> Vec<ScreenBlock> {
        self.spiral_chunks(tile_size.get()).collect()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,

    cursor: ScreenPoint,
}

impl InternalPoints {
    // Construct an iterator over internal points that returns no points
    fn empty() -> Self {
        InternalPoints {
            min_x: 1,
            max: ScreenPoint::origin(),

            cursor: ScreenPoint::origin(),
        }
    }
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        debug_assert!(self.cursor.x < self.max.x);
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let whole_rows = (self.max.x - self.min_x) * (self.max.y - self.cursor.y - 1);
            let current_row = self.max.x - self.cursor.x;
            (whole_rows + current_row) as usize
        }
    }
}

impl FusedIterator for InternalPoints {}

/// Iterator over (mostly) square sub blocks of a rectangular block in spiral order.
///
/// Internally walks a grid of chunk coordinates, turning 90 degrees whenever
/// the current spiral segment runs out or would leave the grid.
#[derive(Copy, Clone, Debug)]
pub struct SpiralChunks {
    block: ScreenBlock,

    chunk_size: u32,
    size: Vector2<i32>,
    cursor: Vector2<i32>,
    direction: Vector2<i32>,

    segment: u32,
    segment_remaining: i32,
    remaining: u32,
}

impl SpiralChunks {
    /// Constructs an iterator that returns no blocks.
    fn empty() -> SpiralChunks {
        SpiralChunks {
            block: ScreenBlock::from_size(ScreenSize::new(0, 0)),

            chunk_size: 1,
            size: Vector2::new(0, 0),
            cursor: Vector2::new(0, 0),
            direction: Vector2::new(1, 0),

            segment: 0,
            segment_remaining: 0,
            remaining: 0,
        }
    }

    /// Moves to the next segment of the spiral (turns 90 degrees and calculates new segment
    /// length).
    fn next_segment(&mut self) {
        self.direction = Vector2::new(self.direction.y, -self.direction.x);
        self.segment += 1;
        self.segment_remaining = (self.segment / 2) as i32;
    }

    fn grid_contains(&self, cursor: &Vector2<i32>) -> bool {
        cursor.x >= 0 && cursor.x < self.size.x && cursor.y >= 0 && cursor.y < self.size.y
    }

    /// Returns a new screen block that corresponds to the current iterator position.
    fn current_block(&self) -> ScreenBlock {
        let min = ScreenPoint::new(
            self.block.min.x + self.cursor.x as u32 * self.chunk_size,
            self.block.min.y + self.cursor.y as u32 * self.chunk_size,
        );
        let ret = ScreenBlock {
            min,
            max: ScreenPoint::new(
                cmp::min(self.block.max.x, min.x + self.chunk_size),
                cmp::min(self.block.max.y, min.y + self.chunk_size),
            ),
        };
        debug_assert!(self.block.contains_block(&ret));
        debug_assert!(!ret.is_empty());
        ret
    }
}

impl Iterator for SpiralChunks {
    type Item = ScreenBlock;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let ret = self.current_block();

        if self.segment_remaining == 0 {
            self.next_segment();
        }

        let new_cursor = self.cursor + self.direction;
        self.segment_remaining -= 1;

        if self.grid_contains(&new_cursor) {
            // We're inside boundaries and can continue
            self.cursor = new_cursor;
        } else {
            // Got outside of the area.
            // In this case we don't move the cursor and instead turn to a new segment
            // immediately.
            self.next_segment();

            // Then we skip the whole next segment (it would be outside the area anyway)
            self.cursor += self.direction * self.segment_remaining;

            // And finally we turn to the next segment which is inside the area.
            // Note that segment_remaining for this one is wrong (since we skipped
            // its part outside of the screen), but we will terminate through this branch
            // of the iterator again, so it's not a problem and we don't need to fix it.
            self.next_segment();
        }

        self.remaining -= 1;

        Some(ret)
    }
}

impl ExactSizeIterator for SpiralChunks {
    fn len(&self) -> usize {
        self.remaining as usize
    }
}

impl FusedIterator for SpiralChunks {}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn block() -> impl Strategy<Value = ScreenBlock> {
        const RANGE: std::ops::Range<u32> = 0..100u32;
        (RANGE, RANGE, RANGE, RANGE).prop_map(|coords| {
            ScreenBlock::new(
                ScreenPoint::new(coords.0, coords.1),
                ScreenPoint::new(coords.2, coords.3),
            )
        })
    }

    fn abs_difference(x: u32, y: u32) -> u32 {
        if x < y { y - x } else { x - y }
    }

    fn safe_area(block: ScreenBlock) -> u32 {
        if block.is_empty() { 0 } else { block.area() }
    }

    fn check_exact_length_internal<T: Iterator + ExactSizeIterator>(
        iterator: &T,
        expected_length: usize,
    ) {
        assert_eq!(iterator.len(), expected_length);
        let (min, max) = iterator.size_hint();
        assert_eq!(min, expected_length);
        assert_eq!(max.unwrap(), expected_length);
    }

    /// Goes through the whole iterator and checks that at every step the iterator's size hint
    /// is equal to its reported length and equal to the expected number of elements.
    fn check_exact_length<T: Iterator + ExactSizeIterator>(
        mut iterator: T,
        expected_length: usize,
    ) {
        check_exact_length_internal(&iterator, expected_length);

        let mut count = 0usize;
        while iterator.next().is_some() {
            count += 1;
            check_exact_length_internal(&iterator, expected_length - count);
        }
    }

    /// Check that all pixels in the block are covered by a pixel iterator exactly once
    fn check_pixel_iterator_covers_block<T: Iterator<Item = ScreenPoint>>(
        pixel_iterator: T,
        block: ScreenBlock,
    ) {
        let area = safe_area(block);
        let mut seen = vec![false; area as usize];
        for p in pixel_iterator {
            assert!(block.contains(&p));
            let index = (p.x - block.min.x) + (p.y - block.min.y) * block.width();
            assert!(!seen[index as usize]);
            seen[index as usize] = true;
        }
        assert!(seen.into_iter().all(|v| v));
    }

    /// Tests that the pixel iterator covers all pixels in a block
    #[proptest]
    fn pixel_iterator_covers_all(#[strategy(block())] block: ScreenBlock) {
        check_pixel_iterator_covers_block(block.internal_points(), block);
    }

    /// Tests that the pixel iterator is a well behaved exact length iterator
    #[proptest]
    fn pixel_iterator_exact_length(#[strategy(block())] block: ScreenBlock) {
        check_exact_length(block.internal_points(), safe_area(block) as usize);
    }

    /// Tests that sub blocks of a spiral chunk iterator cover all pixels in a block when
    /// iterated over
    #[proptest]
    fn spiral_iterator_covers_all(
        #[strategy(block())] block: ScreenBlock,
        chunk_size_minus_one: u8,
    ) {
        check_pixel_iterator_covers_block(
            block
                .spiral_chunks(chunk_size_minus_one as u32 + 1)
                .flat_map(|chunk| chunk.internal_points()),
            block,
        );
    }

    /// Tests that the spiral iterator actually goes in a spiral.
    /// This test is not 100% robust, it only checks that we are going through the picture in
    /// squares of increasing size. The order however is just a visual feature and if it looks
    /// good enough, then it's good enough.
    #[proptest]
    fn spiral_iterator_is_spiral(
        #[strategy(block())] block: ScreenBlock,
        chunk_size_minus_one: u8,
    ) {
        let mut it = block.spiral_chunks(chunk_size_minus_one as u32 + 1);

        if let Some(first) = it.next() {
            let mut prev_distance = 0;
            for subblock in it {
                let distance = cmp::max(
                    abs_difference(first.min.x, subblock.min.x),
                    abs_difference(first.min.y, subblock.min.y),
                );
                assert!(distance >= prev_distance);
                prev_distance = distance;
            }
        }
    }

    /// Tests that the spiral iterator is a well behaved exact length iterator
    #[proptest]
    fn spiral_iterator_exact_length(
        #[strategy(block())] block: ScreenBlock,
        chunk_size_minus_one: u8,
    ) {
        let it = block.spiral_chunks(chunk_size_minus_one as u32 + 1);
        // Using the first reported length as a baseline, because it's easy
        check_exact_length(it, it.len());
    }

    #[test]
    #[should_panic]
    fn zero_sized_chunks() {
        let block = ScreenBlock::from_size(ScreenSize::new(10, 10));
        block.spiral_chunks(0);
    }
}
