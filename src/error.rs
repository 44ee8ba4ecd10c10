//! Error types for grid composition and the surrounding glue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError{
    /// Input that cannot be laid out: empty sequences, zero dimensions,
    /// mismatched image sizes, rejected overflow, unknown option names.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SDL reports its failures as plain strings.
    #[error("Window error: {0}")]
    Window(String),
}

pub type GridResult<T> = Result<T, GridError>;

impl GridError{
    pub fn invalid(msg: impl Into<String>) -> Self{
        Self::InvalidInput(msg.into())
    }

    pub fn window(msg: impl Into<String>) -> Self{
        Self::Window(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool{
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<String> for GridError{
    fn from(msg: String) -> Self{
        Self::Window(msg)
    }
}

#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn test_display(){
        let e = GridError::invalid("no images");
        assert_eq!(e.to_string(), "Invalid input: no images");
        assert!(e.is_invalid_input());

        let e: GridError = "sdl went away".to_string().into();
        assert_eq!(e.to_string(), "Window error: sdl went away");
        assert!(!e.is_invalid_input());
    }
}
