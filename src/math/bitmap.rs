// Copyright 2020 @TwoCookingMice

use super::spectrum::RGBSpectrum;

use std::ops;
use std::slice::ChunksMut;
use std::vec::Vec;

/// Row-major grid of linear RGB pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    data: Vec<RGBSpectrum>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = RGBSpectrum;

    fn index(&self, index: (usize, usize)) -> &RGBSpectrum {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut RGBSpectrum {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(RGBSpectrum::default(); pixel_number),
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[RGBSpectrum] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[RGBSpectrum] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Disjoint mutable slices, one per image row, top to bottom.
    ///
    /// Each slice can be handed to a different thread; the borrow checker
    /// guarantees no two of them alias.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, RGBSpectrum> {
        // chunks_mut panics on a zero chunk size; an empty image has no rows.
        self.data.chunks_mut(self.width.max(1))
    }
}

/* Test for Bitmap */
