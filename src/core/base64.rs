use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub trait EncodeExt {
    /// URL safe Base64 without `=` padding, as used by every TCF segment.
    fn encode_base64_url(&self) -> String;
}

impl EncodeExt for [u8] {
    fn encode_base64_url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self)
    }
}
