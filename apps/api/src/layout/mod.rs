// PDF Layout: fixed-width reflow of one rendered image across uniform-height pages.
// Pure arithmetic only; pixel work lives in `render`.

pub mod pagination;

// Re-export the public API consumed by other modules (render, handlers).
pub use pagination::{paginate, DrawCall, PageGeometry, EXPORT_PAGE};
