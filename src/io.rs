//! Loading inputs from disk and writing the composed grid back out.

use crate::error::{ GridError, GridResult };

use image::{ ImageReader, RgbImage };

use simpleio as sio;

use std::path::{ Path, PathBuf };

/// Decode every path into RGB8, keeping the given order.
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> GridResult<Vec<RgbImage>>{
    paths.iter().map(|p| load_image(p.as_ref())).collect()
}

pub fn load_image(path: &Path) -> GridResult<RgbImage>{
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .into_rgb8();
    log::debug!("loaded {:?} ({}x{})", path, img.width(), img.height());
    Ok(img)
}

/// Read a list file: one image path per line, blank lines and `#` comments
/// skipped. Relative paths resolve against the list file's directory.
pub fn read_list(path: &Path) -> GridResult<Vec<PathBuf>>{
    let list = path.to_path_buf();
    let text = sio::read_file_into_string(&list)
        .map_err(|e| GridError::Io(std::io::Error::other(format!("{:?}: {}", list, e))))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_list(&text, base))
}

fn parse_list(text: &str, base: &Path) -> Vec<PathBuf>{
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let p = Path::new(line);
            if p.is_absolute() { p.to_path_buf() } else { base.join(p) }
        })
        .collect()
}

/// Encode the canvas; the format follows the output extension.
pub fn save_canvas(canvas: &RgbImage, path: &Path) -> GridResult<()>{
    canvas.save(path)?;
    log::info!("wrote {}x{} grid to {:?}", canvas.width(), canvas.height(), path);
    Ok(())
}
