use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintError {
    /// Two consecutive pointer samples carried the same timestamp, so no speed can be derived.
    #[error("zero time delta between pointer samples")]
    DivisionByZero,

    #[error("pointer sample arrived {delta_ms}ms before the previous one")]
    TimeWentBackwards { delta_ms: u64 },

    /// The two timestamps are so far apart that their difference does not fit in an `i64`.
    #[error("time delta between {last_ms}ms and {now_ms}ms overflows")]
    TimestampOverflow { last_ms: i64, now_ms: i64 },

    /// Sampling against a zero-area placement rect, or with no source image bound.
    #[error("no source image placed on the canvas")]
    InvalidPlacement,

    #[error("pointer move received while no pointer is down")]
    PointerNotDown,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    ImageDataLength { expected: usize, actual: usize },

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
}
