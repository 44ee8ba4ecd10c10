//! Lay a sequence of images out on a fixed `rows x cols` grid.
//!
//! ```no_run
//! use imggrid::{ compose, GridSpec };
//!
//! let images = imggrid::io::load_images(&["a.png", "b.png", "c.png", "d.png"])?;
//! let grid = compose(&images, &GridSpec::new(2, 2).with_resize(128))?;
//! imggrid::io::save_canvas(&grid, "grid.png".as_ref())?;
//! # Ok::<(), imggrid::GridError>(())
//! ```

pub mod error;
pub mod grid;
pub mod io;
pub mod logging;
pub mod timer;
pub mod window;

pub use error::{ GridError, GridResult };
pub use grid::{
    cell_origin,
    compose,
    filter_from_name,
    parse_color,
    GridSpec,
    Overflow,
    DEFAULT_RESIZE,
};
