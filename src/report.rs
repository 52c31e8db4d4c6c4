//! Page layout for the synthesis report.
//!
//! The synthesis view is rasterised by the host UI at [`RASTER_SCALE`] and
//! placed on a single portrait A4 page. This module decides where.

use serde::Serialize;

use crate::error::{CarbonError, Result};
use crate::schema::file;

/// Scale factor applied when rasterising the synthesis view.
pub const RASTER_SCALE: f64 = 2.0;

/// Page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

pub const A4_PORTRAIT_MM: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};

/// Where the image lands on the page, in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fit an image of `image_width` x `image_height` pixels onto `page`.
///
/// The image fills the page width, shrinks to the page height when that
/// would overflow, keeps its aspect ratio, is centred horizontally and sits
/// at the top of the page.
pub fn fit_to_page(image_width: f64, image_height: f64, page: PageSize) -> Result<Placement> {
    if !(image_width > 0.0 && image_height > 0.0) {
        return Err(CarbonError::InvalidData(format!(
            "cannot place a {image_width}x{image_height} image on a page"
        )));
    }
    let ratio = image_width / image_height;

    let mut width = page.width;
    let mut height = width / ratio;
    if height > page.height {
        height = page.height;
        width = height * ratio;
    }

    Ok(Placement {
        x: (page.width - width) / 2.0,
        y: 0.0,
        width,
        height,
    })
}

/// File name of the generated PDF.
pub fn report_file_name() -> &'static str {
    file::REPORT_PDF
}
