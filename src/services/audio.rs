use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::borrow::Cow;
use thiserror::Error;

/// Decode window for base64 payloads, in input characters.
pub const DECODE_CHUNK_SIZE: usize = 32 * 1024;

// Browsers sometimes drop trailing padding; accept both forms.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum AudioDecodeError {
    #[error("No audio data provided")]
    Empty,
    #[error("Invalid base64 audio at offset {offset}: {source}")]
    InvalidBase64 {
        offset: usize,
        #[source]
        source: base64::DecodeError,
    },
}

/// Container the upstream API infers the codec from, by file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContainer {
    Mp3,
    Wav,
    M4a,
    Ogg,
    Webm,
}

impl AudioContainer {
    /// Total over all inputs: anything unrecognised is `Webm`.
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        let Some(mime) = mime_type else {
            return AudioContainer::Webm;
        };
        let mime = mime.to_ascii_lowercase();

        if mime.contains("mp3") || mime.contains("mpeg") {
            AudioContainer::Mp3
        } else if mime.contains("wav") {
            AudioContainer::Wav
        } else if mime.contains("m4a") || mime.contains("mp4") {
            AudioContainer::M4a
        } else if mime.contains("ogg") {
            AudioContainer::Ogg
        } else {
            AudioContainer::Webm
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioContainer::Mp3),
            "wav" => Some(AudioContainer::Wav),
            "m4a" | "mp4" => Some(AudioContainer::M4a),
            "ogg" | "oga" => Some(AudioContainer::Ogg),
            "webm" => Some(AudioContainer::Webm),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioContainer::Mp3 => "mp3",
            AudioContainer::Wav => "wav",
            AudioContainer::M4a => "m4a",
            AudioContainer::Ogg => "ogg",
            AudioContainer::Webm => "webm",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioContainer::Mp3 => "audio/mpeg",
            AudioContainer::Wav => "audio/wav",
            AudioContainer::M4a => "audio/mp4",
            AudioContainer::Ogg => "audio/ogg",
            AudioContainer::Webm => "audio/webm",
        }
    }

    pub fn file_name(self) -> String {
        format!("audio.{}", self.extension())
    }
}

/// Splits a `data:<mime>;base64,<payload>` URL into its MIME type and payload.
/// Plain base64 passes through with no MIME type.
pub fn split_data_url(input: &str) -> (Option<&str>, &str) {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix("data:") else {
        return (None, trimmed);
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return (None, trimmed);
    };

    let mime = header
        .split(';')
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    (mime, payload)
}

/// Decodes base64 in windows of `chunk_size` characters, appending each window
/// into one pre-sized buffer. The result, success or error, does not depend on
/// `chunk_size`.
pub fn decode_base64_chunked(input: &str, chunk_size: usize) -> Result<Vec<u8>, AudioDecodeError> {
    let compact: Cow<'_, [u8]> = if input.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(input.bytes().filter(|b| !b.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(input.as_bytes())
    };

    if compact.is_empty() {
        return Err(AudioDecodeError::Empty);
    }

    // Padding may only trail the payload, otherwise a window ending in `=`
    // would decode on its own while the whole input would not.
    if let Some(pos) = compact.iter().position(|&b| b == b'=') {
        if let Some(stray) = compact[pos..].iter().position(|&b| b != b'=') {
            let offset = pos + stray;
            return Err(AudioDecodeError::InvalidBase64 {
                offset,
                source: base64::DecodeError::InvalidByte(offset, compact[offset]),
            });
        }
    }

    // Windows must stay on quantum boundaries so each decodes independently.
    let window = (chunk_size / 4).max(1) * 4;
    let mut audio = Vec::with_capacity(compact.len() / 4 * 3 + 3);

    for (index, chunk) in compact.chunks(window).enumerate() {
        ENGINE
            .decode_vec(chunk, &mut audio)
            .map_err(|source| AudioDecodeError::InvalidBase64 {
                offset: index * window,
                source,
            })?;
    }

    if audio.is_empty() {
        return Err(AudioDecodeError::Empty);
    }

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn sample_audio() -> Vec<u8> {
        (0..100_003u32).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn chunk_size_does_not_change_output() {
        let audio = sample_audio();
        let encoded = STANDARD.encode(&audio);

        let whole = decode_base64_chunked(&encoded, encoded.len()).unwrap();
        assert_eq!(whole, audio);

        for chunk_size in [1, 4, 7, 64, 1000, DECODE_CHUNK_SIZE] {
            let chunked = decode_base64_chunked(&encoded, chunk_size).unwrap();
            assert_eq!(chunked, whole, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn accepts_missing_padding_and_line_breaks() {
        let encoded = STANDARD.encode(b"hello audio");
        let unpadded = encoded.trim_end_matches('=');
        assert_eq!(decode_base64_chunked(unpadded, 8).unwrap(), b"hello audio");

        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        assert_eq!(decode_base64_chunked(&wrapped, 4).unwrap(), b"hello audio");
    }

    #[test]
    fn rejects_empty_and_invalid_payloads() {
        assert!(matches!(decode_base64_chunked("", 16), Err(AudioDecodeError::Empty)));
        assert!(matches!(decode_base64_chunked(" \n ", 16), Err(AudioDecodeError::Empty)));

        let err = decode_base64_chunked("AAAAAAAA!!!!", 4).unwrap_err();
        match err {
            AudioDecodeError::InvalidBase64 { offset, .. } => assert_eq!(offset, 8),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn inner_padding_is_rejected_for_every_chunk_size() {
        for chunk_size in [4, 8, DECODE_CHUNK_SIZE] {
            let err = decode_base64_chunked("AA==AA==", chunk_size).unwrap_err();
            match err {
                AudioDecodeError::InvalidBase64 { offset, .. } => assert_eq!(offset, 4, "{chunk_size}"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(decode_base64_chunked("AAAAAA==", 4).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn mime_mapping_is_total() {
        let cases = [
            ("audio/mp3", AudioContainer::Mp3),
            ("audio/mpeg", AudioContainer::Mp3),
            ("audio/wav", AudioContainer::Wav),
            ("audio/x-wav", AudioContainer::Wav),
            ("audio/mp4", AudioContainer::M4a),
            ("audio/x-m4a", AudioContainer::M4a),
            ("audio/ogg;codecs=opus", AudioContainer::Ogg),
            ("AUDIO/OGG", AudioContainer::Ogg),
            ("audio/webm;codecs=opus", AudioContainer::Webm),
            ("application/octet-stream", AudioContainer::Webm),
            ("", AudioContainer::Webm),
        ];

        for (mime, expected) in cases {
            assert_eq!(AudioContainer::from_mime(Some(mime)), expected, "{mime}");
        }
        assert_eq!(AudioContainer::from_mime(None), AudioContainer::Webm);
        assert_eq!(AudioContainer::from_mime(Some("audio/mpeg")).file_name(), "audio.mp3");
    }

    #[test]
    fn file_names_map_to_containers() {
        assert_eq!(AudioContainer::from_file_name("voice.M4A"), Some(AudioContainer::M4a));
        assert_eq!(AudioContainer::from_file_name("clip.wav"), Some(AudioContainer::Wav));
        assert_eq!(AudioContainer::from_file_name("notes.txt"), None);
        assert_eq!(AudioContainer::from_file_name("noextension"), None);
    }

    #[test]
    fn data_urls_are_split() {
        let (mime, payload) = split_data_url("data:audio/webm;codecs=opus;base64,AAAA");
        assert_eq!(mime, Some("audio/webm"));
        assert_eq!(payload, "AAAA");

        assert_eq!(split_data_url("  AAAA  "), (None, "AAAA"));
    }
}
