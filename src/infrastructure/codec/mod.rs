//! Codec adapters
//!
//! Both codecs share the same merge, interleave and quantize steps and only
//! differ in the container they write.

mod flac;
pub mod pcm;
mod wav;

use std::sync::Arc;

use crate::application::ports::{AudioCodec, CodecProvider};
use crate::domain::encoding::Encoding;

pub use flac::FlacCodec;
pub use wav::{WavCodec, HEADER_LEN as WAV_HEADER_LEN};

/// Provider for the codecs built into this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCodecs;

impl CodecProvider for BuiltinCodecs {
    fn codec(&self, encoding: Encoding) -> Arc<dyn AudioCodec> {
        match encoding {
            Encoding::Wav => Arc::new(WavCodec::new()),
            Encoding::Flac => Arc::new(FlacCodec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_matches_encoding() {
        for encoding in Encoding::ALL {
            assert_eq!(BuiltinCodecs.codec(encoding).encoding(), encoding);
        }
    }
}
