/*! Filtering utilities

Filters operate on token surfaces, after tagging and before phrase extraction.

Filters implement [filter::Filter]: `detect` returns `true` for items that are kept.
! */
mod filter;
mod surface;

pub use filter::Filter;
pub use surface::SurfaceFilter;
