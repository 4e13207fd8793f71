use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid viewport: {width}x{height} (both dimensions must be non-zero)")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Mismatched triangle index lists: {positions} position, {colors} color, {texcoords} texcoord triangles")]
    MismatchedIndexLists {
        positions: usize,
        colors: usize,
        texcoords: usize,
    },

    #[error("Triangle {triangle} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Model-view-projection matrix contains non-finite values")]
    NonFiniteMatrix,

    #[error("Texture image is empty")]
    EmptyTexture,

    #[error("OBJ parse error on line {line}: {message}")]
    Obj { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
