use crate::paint::InvalidColorLength;

/// Errors produced by the lighting engine.
///
/// Construction errors (`InvalidConfig`) are fatal. `CapacityExceeded` is
/// returned from a frame before any GPU work for that frame is recorded, so
/// the caller can drop hulls or lights and try again.
#[derive(thiserror::Error, Debug)]
pub enum LightingError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("{what} capacity exceeded: {requested} requested, {capacity} available")]
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        capacity: usize,
    },

    #[error("color must have 3 or 4 components, got {len}")]
    InvalidColor { len: usize },

    #[error("image size {width}x{height} cannot be uploaded (limit {limit})")]
    InvalidImage { width: u32, height: u32, limit: u32 },

    #[error("failed to load texture `{path}`")]
    TextureLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl LightingError {
    pub(crate) fn config<T: ToString>(msg: T) -> Self {
        LightingError::InvalidConfig(msg.to_string())
    }

    pub(crate) fn capacity(what: &'static str, requested: usize, capacity: usize) -> Self {
        LightingError::CapacityExceeded {
            what,
            requested,
            capacity,
        }
    }
}

impl From<InvalidColorLength> for LightingError {
    fn from(err: InvalidColorLength) -> Self {
        LightingError::InvalidColor { len: err.0 }
    }
}

pub type LightingResult<T> = Result<T, LightingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_resource() {
        let err = LightingError::capacity("hull vertex", 2049, 2048);
        assert_eq!(
            err.to_string(),
            "hull vertex capacity exceeded: 2049 requested, 2048 available"
        );
    }

    #[test]
    fn invalid_color_length_converts() {
        let err: LightingError = InvalidColorLength(5).into();
        assert!(matches!(err, LightingError::InvalidColor { len: 5 }));
    }
}
