//! Video encoder selection for re-encoded edges
//!
//! Re-encoded parts are concatenated with stream-copied ones, so they must use
//! the source's codec. The encoder is derived from the probed `codec_name`
//! unless one is configured, and a configured encoder of another codec family
//! is rejected before any command is planned.

use tracing::{info, warn};

use crate::error::{CutterError, CutterResult};

/// Encoder setting that picks the encoder from the source codec
pub const AUTO_ENCODER: &str = "auto";

/// Encoder used when the source codec could not be probed
const FALLBACK_ENCODER: &str = "libx264";

/// Software encoder producing `codec` (an ffprobe `codec_name`)
pub fn encoder_for_codec(codec: &str) -> Option<&'static str> {
    let encoder = match codec {
        "h264" => "libx264",
        "hevc" => "libx265",
        "vp8" => "libvpx",
        "vp9" => "libvpx-vp9",
        "av1" => "libaom-av1",
        "mpeg4" => "mpeg4",
        "mpeg2video" => "mpeg2video",
        "prores" => "prores_ks",
        _ => return None,
    };
    Some(encoder)
}

/// Codec produced by `encoder`, for the encoders whose family is known.
///
/// Hardware encoders are named `<codec>_<backend>` (`hevc_nvenc`,
/// `h264_videotoolbox`).
pub fn codec_of_encoder(encoder: &str) -> Option<&'static str> {
    let codec = match encoder {
        "libx264" | "libx264rgb" | "libopenh264" => "h264",
        "libx265" | "libkvazaar" => "hevc",
        "libvpx" => "vp8",
        "libvpx-vp9" => "vp9",
        "libaom-av1" | "libsvtav1" | "librav1e" => "av1",
        "mpeg4" | "libxvid" => "mpeg4",
        "mpeg2video" => "mpeg2video",
        "prores" | "prores_ks" | "prores_aw" => "prores",
        other => {
            let (prefix, _) = other.split_once('_')?;
            match prefix {
                "h264" => "h264",
                "hevc" => "hevc",
                "vp8" => "vp8",
                "vp9" => "vp9",
                "av1" => "av1",
                "mpeg2" => "mpeg2video",
                "mpeg4" => "mpeg4",
                _ => return None,
            }
        }
    };
    Some(codec)
}

/// Pick the encoder for re-encoded edges of a source in `source_codec`.
///
/// `auto` follows the source codec. An explicit encoder is kept unless its
/// codec family is known and differs from the source's.
pub fn resolve_encoder(requested: &str, source_codec: Option<&str>) -> CutterResult<String> {
    if requested != AUTO_ENCODER {
        if let (Some(source), Some(produced)) = (source_codec, codec_of_encoder(requested)) {
            if source != produced {
                return Err(CutterError::config(format!(
                    "video_encoder '{}' produces {} but the source video is {}; \
                     use '{}' or '{}'",
                    requested,
                    produced,
                    source,
                    AUTO_ENCODER,
                    encoder_for_codec(source).unwrap_or("an encoder for that codec")
                )));
            }
        }
        return Ok(requested.to_string());
    }

    match source_codec {
        Some(codec) => {
            let encoder = encoder_for_codec(codec).ok_or_else(|| {
                CutterError::config(format!(
                    "No known encoder for source codec '{}'; set video_encoder explicitly",
                    codec
                ))
            })?;
            info!("Re-encoding {} edges with {}", codec, encoder);
            Ok(encoder.to_string())
        }
        None => {
            warn!(
                "Source video codec unknown, re-encoding edges with {}",
                FALLBACK_ENCODER
            );
            Ok(FALLBACK_ENCODER.to_string())
        }
    }
}

/// Quality options understood by `encoder`
pub fn quality_options(encoder: &str, crf: u8, preset: &str) -> Vec<String> {
    let crf = crf.to_string();
    let options: Vec<&str> = match encoder {
        "libvpx" | "libvpx-vp9" | "libaom-av1" => vec!["-crf", crf.as_str(), "-b:v", "0"],
        "libsvtav1" => vec!["-crf", crf.as_str()],
        "mpeg4" | "libxvid" | "mpeg2video" => vec!["-q:v", "2"],
        "prores" | "prores_ks" | "prores_aw" => Vec::new(),
        _ => vec!["-crf", crf.as_str(), "-preset", preset],
    };
    options.into_iter().map(str::to_string).collect()
}
