use std::sync::atomic::AtomicBool;

use crate::{PixelBuffer, TraceResult};

/// A trait representing an algorithm that can turn a bitmap into a vector representation.
pub trait ImageVectorizer {
    type Options;
    type Output;

    fn vectorize(&self, buffer: &PixelBuffer, options: &Self::Options) -> TraceResult<Self::Output>;

    /// Like [`vectorize`](Self::vectorize), but stops with
    /// [`TraceError::Cancelled`](crate::TraceError::Cancelled) once `cancel` is set.
    fn vectorize_with_cancel(
        &self,
        buffer: &PixelBuffer,
        options: &Self::Options,
        cancel: &AtomicBool,
    ) -> TraceResult<Self::Output>;
}

pub mod polygon;
