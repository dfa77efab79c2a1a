/// Content sniffing — derive a MIME type from a file's leading bytes.
///
/// # Algorithm
/// - Match fixed magic signatures at known offsets (first match wins).
/// - Container formats that share a magic (`RIFF`, `ftyp`, EBML) are split by
///   their sub-type field. Short magics (`MZ`, `BZh`) must also carry the
///   structure that follows them, so prose that happens to start with those
///   letters stays text.
/// - Anything else is tested as text: no NUL and no C0 control bytes other
///   than tab, newline, carriage return, form feed, and escape. UTF-8 and
///   8-bit encodings (Latin-1, Windows-1252) are both `text/plain`.
///
/// # Invariants
/// - Empty input and unrecognised binary yield `None`; the caller maps that
///   to `Other`.
/// - Only the first [`SNIFF_LEN`] bytes are ever consulted.
struct Signature {
    offset: usize,
    magic: &'static [u8],
    mime: &'static str,
}

const fn sig(offset: usize, magic: &'static [u8], mime: &'static str) -> Signature {
    Signature {
        offset,
        magic,
        mime,
    }
}

/// How many bytes of a file the sniffer needs.
pub const SNIFF_LEN: usize = 8 * 1024;

static SIGNATURES: &[Signature] = &[
    // Images
    sig(0, b"\x89PNG\r\n\x1a\n", "image/png"),
    sig(0, b"\xff\xd8\xff", "image/jpeg"),
    sig(0, b"GIF87a", "image/gif"),
    sig(0, b"GIF89a", "image/gif"),
    sig(0, b"II*\x00", "image/tiff"),
    sig(0, b"MM\x00*", "image/tiff"),
    sig(0, b"8BPS", "image/vnd.adobe.photoshop"),
    sig(0, b"\x00\x00\x01\x00", "image/vnd.microsoft.icon"),
    // Audio
    sig(0, b"ID3", "audio/mpeg"),
    sig(0, b"fLaC", "audio/flac"),
    sig(0, b"OggS", "audio/ogg"),
    sig(0, b"MThd", "audio/midi"),
    // Video
    sig(0, b"FLV\x01", "video/x-flv"),
    sig(0, b"\x00\x00\x01\xba", "video/mpeg"),
    sig(0, b"\x00\x00\x01\xb3", "video/mpeg"),
    // Application
    sig(0, b"%PDF-", "application/pdf"),
    sig(0, b"PK\x03\x04", "application/zip"),
    sig(0, b"PK\x05\x06", "application/zip"),
    sig(0, b"\x1f\x8b", "application/gzip"),
    sig(0, b"\xfd7zXZ\x00", "application/x-xz"),
    sig(0, b"\x28\xb5\x2f\xfd", "application/zstd"),
    sig(0, b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    sig(0, b"Rar!\x1a\x07", "application/vnd.rar"),
    sig(257, b"ustar", "application/x-tar"),
    sig(0, b"\x7fELF", "application/x-executable"),
    sig(0, b"\xfe\xed\xfa\xce", "application/x-mach-binary"),
    sig(0, b"\xfe\xed\xfa\xcf", "application/x-mach-binary"),
    sig(0, b"\xce\xfa\xed\xfe", "application/x-mach-binary"),
    sig(0, b"\xcf\xfa\xed\xfe", "application/x-mach-binary"),
    sig(0, b"\xca\xfe\xba\xbe", "application/java-vm"),
    sig(0, b"\x00asm", "application/wasm"),
    sig(0, b"SQLite format 3\x00", "application/vnd.sqlite3"),
];

/// Sniff a MIME type from the start of a file.
pub fn sniff_mime(header: &[u8]) -> Option<&'static str> {
    if header.is_empty() {
        return None;
    }
    if let Some(mime) = sniff_container(header) {
        return Some(mime);
    }
    if let Some(s) = SIGNATURES.iter().find(|s| matches_at(header, s.offset, s.magic)) {
        return Some(s.mime);
    }
    if is_mpeg_frame_sync(header) {
        return Some("audio/mpeg");
    }
    sniff_text(header)
}

#[inline]
fn matches_at(header: &[u8], offset: usize, magic: &[u8]) -> bool {
    header
        .get(offset..offset + magic.len())
        .is_some_and(|window| window == magic)
}

/// Formats whose first bytes only name the container.
fn sniff_container(header: &[u8]) -> Option<&'static str> {
    if matches_at(header, 0, b"RIFF") {
        return match header.get(8..12)? {
            b"WAVE" => Some("audio/wav"),
            b"AVI " => Some("video/x-msvideo"),
            b"WEBP" => Some("image/webp"),
            _ => None,
        };
    }
    if matches_at(header, 0, b"FORM") {
        return match header.get(8..12)? {
            b"AIFF" | b"AIFC" => Some("audio/aiff"),
            _ => None,
        };
    }
    if matches_at(header, 4, b"ftyp") {
        return match header.get(8..12)? {
            b"M4A " | b"M4B " | b"M4P " => Some("audio/mp4"),
            b"qt  " => Some("video/quicktime"),
            b"avif" | b"avis" => Some("image/avif"),
            b"heic" | b"heix" | b"mif1" => Some("image/heic"),
            _ => Some("video/mp4"),
        };
    }
    if matches_at(header, 0, b"\x1a\x45\xdf\xa3") {
        let head = &header[..header.len().min(64)];
        let is_webm = head.windows(4).any(|w| w == b"webm");
        return Some(if is_webm { "video/webm" } else { "video/x-matroska" });
    }
    if is_bzip2(header) {
        return Some("application/x-bzip2");
    }
    if is_portable_executable(header) {
        return Some("application/vnd.microsoft.portable-executable");
    }
    if matches_at(header, 0, b"BM") && header.len() >= 14 {
        // BMP: reserved fields at 6..10 are zero.
        if header[6..10] == [0, 0, 0, 0] {
            return Some("image/bmp");
        }
    }
    None
}

/// MPEG audio without an ID3 tag starts with an 11-bit frame sync.
fn is_mpeg_frame_sync(header: &[u8]) -> bool {
    match header {
        // 0xfffe / 0xffff are a UTF-16 BOM and fill bytes, not frames.
        [0xff, 0xfe | 0xff, ..] => false,
        [0xff, b1, ..] => {
            let layer = (b1 >> 1) & 0b11;
            b1 & 0xe0 == 0xe0 && layer != 0
        }
        _ => false,
    }
}

/// `BZh`, a block-size digit, then the block or end-of-stream magic.
fn is_bzip2(header: &[u8]) -> bool {
    matches_at(header, 0, b"BZh")
        && header.get(3).is_some_and(|d| (b'1'..=b'9').contains(d))
        && (matches_at(header, 4, b"\x31\x41\x59\x26\x53\x59")
            || matches_at(header, 4, b"\x17\x72\x45\x38\x50\x90"))
}

/// `MZ` stub whose `e_lfanew` (offset 0x3c) points at a `PE\0\0` header.
fn is_portable_executable(header: &[u8]) -> bool {
    if !matches_at(header, 0, b"MZ") {
        return false;
    }
    let Some(raw) = header.get(0x3c..0x40) else {
        return false;
    };
    let e_lfanew = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
    e_lfanew >= 0x40 && matches_at(header, e_lfanew, b"PE\0\0")
}

#[inline]
fn is_text_byte(b: u8) -> bool {
    b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b)
}

fn sniff_text(header: &[u8]) -> Option<&'static str> {
    let body = header.strip_prefix(b"\xef\xbb\xbf").unwrap_or(header);
    if !body.iter().copied().all(is_text_byte) {
        return None;
    }

    let lead = body.trim_ascii_start();
    let lower = lead[..lead.len().min(64)].to_ascii_lowercase();
    let mime = if lower.starts_with(b"<?xml") {
        "text/xml"
    } else if lower.starts_with(b"<!doctype html") || lower.starts_with(b"<html") {
        "text/html"
    } else if lead.starts_with(b"#!") {
        "text/x-shellscript"
    } else {
        "text/plain"
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn riff(kind: &[u8; 4]) -> Vec<u8> {
        let mut v = b"RIFF\x24\x00\x00\x00".to_vec();
        v.extend_from_slice(kind);
        v.extend_from_slice(&[0u8; 16]);
        v
    }

    #[test]
    fn images() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), Some("image/png"));
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0\0\x10JFIF"), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a\x01\x00"), Some("image/gif"));
        assert_eq!(sniff_mime(&riff(b"WEBP")), Some("image/webp"));
        assert_eq!(
            sniff_mime(b"BM\x36\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00"),
            Some("image/bmp")
        );
    }

    #[test]
    fn audio_and_video() {
        assert_eq!(sniff_mime(b"ID3\x04\x00\x00\x00\x00\x00\x00"), Some("audio/mpeg"));
        assert_eq!(sniff_mime(&[0xff, 0xfb, 0x90, 0x64]), Some("audio/mpeg"));
        assert_eq!(sniff_mime(&riff(b"WAVE")), Some("audio/wav"));
        assert_eq!(sniff_mime(&riff(b"AVI ")), Some("video/x-msvideo"));
        assert_eq!(sniff_mime(b"fLaC\x00\x00\x00\x22"), Some("audio/flac"));
        assert_eq!(
            sniff_mime(b"\x00\x00\x00\x18ftypisom\x00\x00\x02\x00"),
            Some("video/mp4")
        );
        assert_eq!(
            sniff_mime(b"\x00\x00\x00\x18ftypM4A \x00\x00\x02\x00"),
            Some("audio/mp4")
        );
        assert_eq!(
            sniff_mime(b"\x1a\x45\xdf\xa3\x9f\x42\x86\x81\x01\x42\x82\x84webm"),
            Some("video/webm")
        );
    }

    #[test]
    fn applications() {
        assert_eq!(sniff_mime(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(sniff_mime(b"PK\x03\x04\x14\x00"), Some("application/zip"));
        assert_eq!(sniff_mime(b"\x7fELF\x02\x01\x01"), Some("application/x-executable"));
        assert_eq!(sniff_mime(b"\x1f\x8b\x08\x00"), Some("application/gzip"));

        let mut tar = vec![0u8; 512];
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(sniff_mime(&tar), Some("application/x-tar"));
    }

    #[test]
    fn text_variants() {
        assert_eq!(sniff_mime(b"hello world\n"), Some("text/plain"));
        assert_eq!(sniff_mime("h\u{e9}llo w\u{f6}rld".as_bytes()), Some("text/plain"));
        assert_eq!(sniff_mime(b"\xef\xbb\xbfwith bom"), Some("text/plain"));
        assert_eq!(sniff_mime(b"<?xml version=\"1.0\"?><a/>"), Some("text/xml"));
        assert_eq!(sniff_mime(b"  <!DOCTYPE html><html>"), Some("text/html"));
        assert_eq!(sniff_mime(b"#!/bin/sh\necho hi\n"), Some("text/x-shellscript"));
    }

    #[test]
    fn eight_bit_and_escape_text_is_plain() {
        assert_eq!(sniff_mime(b"caf\xe9 cr\xe8me\n"), Some("text/plain"));
        assert_eq!(sniff_mime(b"\x93quoted\x94 \x80 5\n"), Some("text/plain"));
        assert_eq!(sniff_mime(b"\x1b[31mred\x1b[0m line\n"), Some("text/plain"));
    }

    #[test]
    fn short_magics_need_their_structure() {
        assert_eq!(sniff_mime(b"MZ is how the notes begin\n"), Some("text/plain"));
        assert_eq!(sniff_mime(b"BZh... said nobody\n"), Some("text/plain"));

        let mut pe = vec![0u8; 0x100];
        pe[..2].copy_from_slice(b"MZ");
        pe[0x3c..0x40].copy_from_slice(&0x80u32.to_le_bytes());
        pe[0x80..0x84].copy_from_slice(b"PE\0\0");
        assert_eq!(
            sniff_mime(&pe),
            Some("application/vnd.microsoft.portable-executable")
        );
        assert_eq!(
            sniff_mime(b"BZh91AY&SY\x00\x01"),
            Some("application/x-bzip2")
        );
    }

    #[test]
    fn empty_and_unknown_binary_yield_none() {
        assert_eq!(sniff_mime(b""), None);
        assert_eq!(sniff_mime(&[0x00, 0x13, 0x37, 0x00, 0x42]), None);
        assert_eq!(sniff_mime(&[0xc3, 0x01, 0x02, 0x41]), None);
    }
}
