use image::{DynamicImage, GrayImage};
use crate::{
    error::{DetectionError, Result},
    traits::BlobExtractor,
    types::{Blob, Point},
};

/// Stack-based 4-connected component labelling
#[derive(Debug, Clone, Default)]
pub struct FloodFillBlobExtractor;

impl BlobExtractor for FloodFillBlobExtractor {
    fn extract_blobs(&self, mask: &GrayImage) -> Result<Vec<Blob>> {
        Ok(find_blobs(mask))
    }
}

/// Borrow an 8-bit single-channel image as a mask.
pub fn as_mask(image: &DynamicImage) -> Result<&GrayImage> {
    image.as_luma8().ok_or_else(|| {
        DetectionError::invalid(format!(
            "expected an 8-bit single-channel mask, got {:?}",
            image.color()
        ))
    })
}

/// Maximal 4-connected components of the non-zero pixels of `mask`.
///
/// Components come out in the row-major order of their first pixel; points
/// within a blob are in the order the region growing visited them.
pub fn find_blobs(mask: &GrayImage) -> Vec<Blob> {
    let (width, height) = (mask.width() as i32, mask.height() as i32);
    let mut labels = vec![0u32; mask.width() as usize * mask.height() as usize];
    let index = |row: i32, col: i32| (row * width + col) as usize;

    let mut blobs = Vec::new();
    let mut label = 1;

    for row in 0..height {
        for col in 0..width {
            if mask.get_pixel(col as u32, row as u32)[0] == 0 || labels[index(row, col)] != 0 {
                continue;
            }

            let mut blob = Vec::new();
            let mut stack = vec![Point::new(row, col)];

            while let Some(p) = stack.pop() {
                if p.row < 0 || p.row >= height || p.col < 0 || p.col >= width {
                    continue;
                }
                let i = index(p.row, p.col);
                if labels[i] != 0 || mask.get_pixel(p.col as u32, p.row as u32)[0] == 0 {
                    continue;
                }

                labels[i] = label;
                blob.push(p);

                stack.push(Point::new(p.row, p.col + 1));
                stack.push(Point::new(p.row, p.col - 1));
                stack.push(Point::new(p.row + 1, p.col));
                stack.push(Point::new(p.row - 1, p.col));
            }

            blobs.push(blob);
            label += 1;
        }
    }

    blobs
}
