use super::*;

use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

/// Length-delimited frames carrying one bincode `Envelope` each.
/// Decoded envelopes are already validated.
#[derive(Debug)]
pub struct EnvelopeCodec {
    inner: LengthDelimitedCodec,
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeCodec {
    pub fn new() -> Self {
        Self {
            inner: LengthDelimitedCodec::builder()
                .max_frame_length(message::MAX_MESSAGE_SIZE as usize)
                .new_codec(),
        }
    }
}

impl Decoder for EnvelopeCodec {
    type Item = Envelope;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Envelope>, Error> {
        match self.inner.decode(src)? {
            Some(frame) => Ok(Some(Envelope::decode(&frame)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<Envelope> for EnvelopeCodec {
    type Error = Error;

    fn encode(&mut self, item: Envelope, dst: &mut BytesMut) -> Result<(), Error> {
        let bytes = item.encode()?;
        self.inner.encode(bytes, dst)?;
        Ok(())
    }
}
