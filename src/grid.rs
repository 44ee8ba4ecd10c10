//! Grid compositor: lays a sequence of equally sized images out on a
//! `rows x cols` canvas in row-major order.

use crate::error::{ GridError, GridResult };

use image::{
    imageops::{ self, FilterType },
    GenericImage,
    Rgb,
    RgbImage,
};

use std::{
    fmt,
    str::FromStr,
};

/// Side length every image is scaled to unless resizing is turned off.
pub const DEFAULT_RESIZE: u32 = 256;

/// What happens to images past `rows * cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow{
    /// Images that land below the last row are dropped.
    #[default]
    Clip,
    /// The cell index wraps around, later images overwrite earlier ones.
    Wrap,
    /// More images than cells is an error.
    Reject,
}

impl FromStr for Overflow{
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err>{
        match s.trim().to_lowercase().as_str(){
            "clip" => Ok(Self::Clip),
            "wrap" => Ok(Self::Wrap),
            "reject" => Ok(Self::Reject),
            other => Err(GridError::invalid(format!("unknown overflow policy '{other}'"))),
        }
    }
}

impl fmt::Display for Overflow{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result{
        let name = match self{
            Self::Clip => "clip",
            Self::Wrap => "wrap",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Layout and resampling options for [`compose`].
#[derive(Debug, Clone, Copy)]
pub struct GridSpec{
    pub rows: u32,
    pub cols: u32,
    /// `Some(k)` scales every image to `k x k` first, `None` requires
    /// the caller to supply uniformly sized images.
    pub resize: Option<u32>,
    pub filter: FilterType,
    /// Fill for cells no image lands in.
    pub background: Rgb<u8>,
    pub overflow: Overflow,
}

impl Default for GridSpec{
    fn default() -> Self{
        Self{
            rows: 1,
            cols: 1,
            resize: Some(DEFAULT_RESIZE),
            filter: FilterType::CatmullRom,
            background: Rgb([0, 0, 0]),
            overflow: Overflow::Clip,
        }
    }
}

impl GridSpec{
    pub fn new(rows: u32, cols: u32) -> Self{
        Self{ rows, cols, ..Self::default() }
    }

    pub fn with_resize(mut self, side: u32) -> Self{
        self.resize = Some(side);
        self
    }

    pub fn without_resize(mut self) -> Self{
        self.resize = None;
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self{
        self.filter = filter;
        self
    }

    pub fn with_background(mut self, background: Rgb<u8>) -> Self{
        self.background = background;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self{
        self.overflow = overflow;
        self
    }

    /// Number of cells on the canvas.
    pub fn capacity(&self) -> u64{
        self.rows as u64 * self.cols as u64
    }

    pub fn validate(&self) -> GridResult<()>{
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::invalid(format!(
                "grid needs at least one row and one column, got {}x{}", self.rows, self.cols
            )));
        }
        if self.resize == Some(0) {
            return Err(GridError::invalid("resize side must be positive"));
        }
        Ok(())
    }

    /// Canvas size for cells of `cell_w x cell_h`.
    pub fn canvas_size(&self, cell_w: u32, cell_h: u32) -> GridResult<(u32, u32)>{
        let too_large = || GridError::invalid(format!(
            "a {}x{} grid of {cell_w}x{cell_h} cells is too large", self.cols, self.rows
        ));
        let w = self.cols.checked_mul(cell_w).ok_or_else(too_large)?;
        let h = self.rows.checked_mul(cell_h).ok_or_else(too_large)?;
        let bytes = (w as u64).checked_mul(h as u64).and_then(|p| p.checked_mul(3));
        match bytes.map(usize::try_from){
            Some(Ok(_)) => Ok((w, h)),
            _ => Err(too_large()),
        }
    }
}

/// Top-left corner of cell `index` when filling row by row.
/// `index` is expected to lie within the grid's capacity.
pub fn cell_origin(index: u64, cols: u32, cell_w: u32, cell_h: u32) -> (u32, u32){
    let col = index % cols as u64;
    let row = index / cols as u64;
    ((col * cell_w as u64) as u32, (row * cell_h as u64) as u32)
}

/// Paste `images` onto a fresh canvas, left to right then top to bottom.
///
/// Every check happens before the canvas is allocated: an empty sequence,
/// zero rows, columns or resize side, differing sizes when resizing is off
/// and rejected overflow all fail with [`GridError::InvalidInput`]. The
/// caller's images are never modified; resizing works on copies.
pub fn compose(images: &[RgbImage], spec: &GridSpec) -> GridResult<RgbImage>{
    spec.validate()?;
    if images.is_empty() {
        return Err(GridError::invalid("cannot compose an empty image sequence"));
    }
    let capacity = spec.capacity();
    if spec.overflow == Overflow::Reject && images.len() as u64 > capacity {
        return Err(GridError::invalid(format!(
            "{} images do not fit a {}x{} grid", images.len(), spec.rows, spec.cols
        )));
    }

    let resized = spec.resize.map(|side| {
        log::debug!("resizing {} images to {side}x{side}", images.len());
        images.iter()
            .map(|img| imageops::resize(img, side, side, spec.filter))
            .collect::<Vec<_>>()
    });
    let cells = resized.as_deref().unwrap_or(images);

    let (w, h) = cells[0].dimensions();
    if w == 0 || h == 0 {
        return Err(GridError::invalid(format!("first image has no pixels ({w}x{h})")));
    }
    if let Some((i, img)) = cells.iter().enumerate().find(|(_, img)| img.dimensions() != (w, h)) {
        let (iw, ih) = img.dimensions();
        return Err(GridError::invalid(format!(
            "image {i} is {iw}x{ih} but cells are {w}x{h}; enable resizing or supply uniform images"
        )));
    }

    let (canvas_w, canvas_h) = spec.canvas_size(w, h)?;
    log::debug!("cells {w}x{h}, canvas {canvas_w}x{canvas_h}");
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, spec.background);

    let mut clipped = 0usize;
    for (i, img) in cells.iter().enumerate() {
        let index = match spec.overflow {
            Overflow::Wrap => i as u64 % capacity,
            Overflow::Clip | Overflow::Reject => i as u64,
        };
        if index >= capacity {
            clipped += 1;
            continue;
        }
        let (x, y) = cell_origin(index, spec.cols, w, h);
        canvas.copy_from(img, x, y)?;
    }
    if clipped > 0 {
        log::warn!("{clipped} images fell outside the {}x{} grid and were skipped", spec.rows, spec.cols);
    }

    Ok(canvas)
}

/// Resampling filter by name, as accepted on the command line.
pub fn filter_from_name(name: &str) -> GridResult<FilterType>{
    match name.trim().to_lowercase().as_str(){
        "nearest" => Ok(FilterType::Nearest),
        "triangle" | "bilinear" => Ok(FilterType::Triangle),
        "catmullrom" | "bicubic" => Ok(FilterType::CatmullRom),
        "gaussian" => Ok(FilterType::Gaussian),
        "lanczos" | "lanczos3" => Ok(FilterType::Lanczos3),
        other => Err(GridError::invalid(format!("unknown resize filter '{other}'"))),
    }
}

/// Parse `#rrggbb` or `rrggbb`.
pub fn parse_color(hex: &str) -> GridResult<Rgb<u8>>{
    let digits = hex.trim().trim_start_matches('#');
    let bad = || GridError::invalid(format!("'{hex}' is not a #rrggbb color"));
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(bad());
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| bad());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[cfg(test)]
mod tests{

    use super::*;

    fn solid(w: u32, h: u32, v: u8) -> RgbImage{
        RgbImage::from_pixel(w, h, Rgb([v, v / 2, 255 - v]))
    }

    // Every pixel differs, so a shifted paste cannot go unnoticed.
    fn gradient(w: u32, h: u32, seed: u8) -> RgbImage{
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x as u8).wrapping_add(seed), (y as u8).wrapping_mul(3), seed])
        })
    }

    fn block(canvas: &RgbImage, x: u32, y: u32, w: u32, h: u32) -> RgbImage{
        imageops::crop_imm(canvas, x, y, w, h).to_image()
    }

    #[test]
    fn test_two_by_two_without_resize(){
        let imgs = (0..4).map(|i| gradient(100, 100, i * 40)).collect::<Vec<_>>();
        let spec = GridSpec::new(2, 2).without_resize();
        let grid = compose(&imgs, &spec).unwrap();
        assert_eq!(grid.dimensions(), (200, 200));
        assert_eq!(block(&grid, 0, 0, 100, 100), imgs[0]);
        assert_eq!(block(&grid, 100, 0, 100, 100), imgs[1]);
        assert_eq!(block(&grid, 0, 100, 100, 100), imgs[2]);
        assert_eq!(block(&grid, 100, 100, 100, 100), imgs[3]);
    }

    #[test]
    fn test_single_row_with_resize(){
        let imgs = vec![solid(30, 70, 10), solid(120, 40, 100), solid(50, 50, 200)];
        let spec = GridSpec::new(1, 3).with_resize(50).with_filter(FilterType::Nearest);
        let grid = compose(&imgs, &spec).unwrap();
        assert_eq!(grid.dimensions(), (150, 50));
        for (i, img) in imgs.iter().enumerate() {
            let expected = RgbImage::from_pixel(50, 50, *img.get_pixel(0, 0));
            assert_eq!(block(&grid, i as u32 * 50, 0, 50, 50), expected);
        }
    }

    #[test]
    fn test_resize_uses_default_side(){
        let imgs = vec![solid(10, 20, 1), solid(300, 5, 2)];
        let grid = compose(&imgs, &GridSpec::new(2, 1)).unwrap();
        assert_eq!(grid.dimensions(), (DEFAULT_RESIZE, 2 * DEFAULT_RESIZE));
    }

    #[test]
    fn test_resize_leaves_inputs_alone(){
        let imgs = vec![gradient(17, 9, 3)];
        let before = imgs.clone();
        compose(&imgs, &GridSpec::new(1, 1).with_resize(8)).unwrap();
        assert_eq!(imgs, before);
    }

    #[test]
    fn test_empty_sequence(){
        let err = compose(&[], &GridSpec::new(2, 2)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_zero_dimensions(){
        let imgs = vec![solid(4, 4, 0)];
        assert!(compose(&imgs, &GridSpec::new(0, 2)).unwrap_err().is_invalid_input());
        assert!(compose(&imgs, &GridSpec::new(2, 0)).unwrap_err().is_invalid_input());
        assert!(compose(&imgs, &GridSpec::new(1, 1).with_resize(0)).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_mismatched_sizes_without_resize(){
        let imgs = vec![solid(10, 10, 0), solid(10, 10, 1), solid(10, 11, 2)];
        let err = compose(&imgs, &GridSpec::new(1, 3).without_resize()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("image 2"));
    }

    #[test]
    fn test_unfilled_cells_get_background(){
        let imgs = vec![solid(8, 8, 90)];
        let bg = Rgb([1, 2, 3]);
        let spec = GridSpec::new(2, 2).without_resize().with_background(bg);
        let grid = compose(&imgs, &spec).unwrap();
        assert_eq!(grid.dimensions(), (16, 16));
        assert_eq!(block(&grid, 0, 0, 8, 8), imgs[0]);
        assert_eq!(block(&grid, 8, 8, 8, 8), RgbImage::from_pixel(8, 8, bg));
        assert_eq!(*grid.get_pixel(15, 0), bg);
        assert_eq!(*grid.get_pixel(0, 15), bg);
    }

    #[test]
    fn test_overflow_clip(){
        let imgs = (0..5).map(|i| solid(6, 6, i * 50)).collect::<Vec<_>>();
        let grid = compose(&imgs, &GridSpec::new(2, 2).without_resize()).unwrap();
        assert_eq!(grid.dimensions(), (12, 12));
        let first_four = compose(&imgs[..4], &GridSpec::new(2, 2).without_resize()).unwrap();
        assert_eq!(grid, first_four);
    }

    #[test]
    fn test_overflow_wrap(){
        let imgs = (0..5).map(|i| solid(6, 6, i * 50)).collect::<Vec<_>>();
        let spec = GridSpec::new(2, 2).without_resize().with_overflow(Overflow::Wrap);
        let grid = compose(&imgs, &spec).unwrap();
        assert_eq!(block(&grid, 0, 0, 6, 6), imgs[4]);
        assert_eq!(block(&grid, 6, 0, 6, 6), imgs[1]);
        assert_eq!(block(&grid, 6, 6, 6, 6), imgs[3]);
    }

    #[test]
    fn test_overflow_reject(){
        let imgs = (0..5).map(|i| solid(6, 6, i)).collect::<Vec<_>>();
        let spec = GridSpec::new(2, 2).with_overflow(Overflow::Reject);
        assert!(compose(&imgs, &spec).unwrap_err().is_invalid_input());
        assert!(compose(&imgs[..4], &spec).is_ok());
    }

    #[test]
    fn test_deterministic(){
        let imgs = (0..3).map(|i| gradient(33, 21, i * 7)).collect::<Vec<_>>();
        let spec = GridSpec::new(2, 2).with_resize(16).with_filter(FilterType::Lanczos3);
        assert_eq!(compose(&imgs, &spec).unwrap(), compose(&imgs, &spec).unwrap());
    }

    #[test]
    fn test_canvas_too_large(){
        let spec = GridSpec::new(u32::MAX, 2);
        assert!(spec.canvas_size(2, 2).unwrap_err().is_invalid_input());
        assert_eq!(GridSpec::new(3, 4).canvas_size(10, 20).unwrap(), (40, 60));
    }

    #[test]
    fn test_cell_origin(){
        assert_eq!(cell_origin(0, 3, 10, 20), (0, 0));
        assert_eq!(cell_origin(2, 3, 10, 20), (20, 0));
        assert_eq!(cell_origin(3, 3, 10, 20), (0, 20));
        assert_eq!(cell_origin(7, 3, 10, 20), (10, 40));
    }

    #[test]
    fn test_names(){
        assert_eq!("Wrap".parse::<Overflow>().unwrap(), Overflow::Wrap);
        assert_eq!(Overflow::Reject.to_string(), "reject");
        assert!("spill".parse::<Overflow>().is_err());
        assert_eq!(filter_from_name("lanczos").unwrap(), FilterType::Lanczos3);
        assert_eq!(filter_from_name("Bicubic").unwrap(), FilterType::CatmullRom);
        assert!(filter_from_name("box").is_err());
    }

    #[test]
    fn test_parse_color(){
        assert_eq!(parse_color("#ff8000").unwrap(), Rgb([255, 128, 0]));
        assert_eq!(parse_color("0a0B0c").unwrap(), Rgb([10, 11, 12]));
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#gg0000").is_err());
    }
}
