//! Section renderers for the storefront pages.

mod featured;
mod layout;
mod product_form;
mod product_grid;

pub use featured::*;
pub use layout::*;
pub use product_form::*;
pub use product_grid::*;
