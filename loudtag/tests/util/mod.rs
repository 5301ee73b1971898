//! Minimal audio files, just enough structure for the tag containers.
#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use loudtag::container::{self, ContainerKind};
use loudtag::replay_gain::{ReplayGain, Scan};
use ogg_pager::{Page, CONTAINS_FIRST_PAGE_OF_BITSTREAM};
use tempfile::TempDir;

pub const ASF_HEADER: [u8; 16] = [
    0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];
pub const ASF_FILE_PROPERTIES: [u8; 16] = [
    0xA1, 0xDC, 0xAB, 0x8C, 0x47, 0xA9, 0xCF, 0x11, 0x8E, 0xE4, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65,
];
pub const ASF_EXTENDED_CONTENT: [u8; 16] = [
    0x40, 0xA4, 0xD0, 0xD2, 0x07, 0xE3, 0xD2, 0x11, 0x97, 0xF0, 0x00, 0xA0, 0xC9, 0x5E, 0xA8, 0x50,
];
pub const ASF_DATA: [u8; 16] = [
    0x36, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn track() -> ReplayGain {
    ReplayGain {
        gain: -6.5,
        peak: 0.988553,
        loudness_range: 5.23,
        loudness_reference: -18.0,
        loudness: -11.5,
    }
}

pub fn album() -> ReplayGain {
    ReplayGain {
        gain: -7.25,
        peak: 1.0,
        loudness_range: 6.0,
        loudness_reference: -18.0,
        loudness: -10.75,
    }
}

pub fn scan(path: &Path) -> Scan {
    Scan::new(path, track())
}

/// Value stored under `key`, as the engine reads it back
pub fn get(kind: ContainerKind, path: &Path, key: &str) -> Option<String> {
    container::open(kind, path).unwrap().get(key)
}

pub fn keys(kind: ContainerKind, path: &Path) -> Vec<String> {
    container::open(kind, path).unwrap().keys()
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// 16-bit mono PCM, one sample
pub fn wav_bytes(info_title: Option<&str>) -> Vec<u8> {
    let mut chunks = Vec::new();
    chunks.extend_from_slice(b"fmt ");
    chunks.write_u32::<LittleEndian>(16).unwrap();
    chunks.write_u16::<LittleEndian>(1).unwrap();
    chunks.write_u16::<LittleEndian>(1).unwrap();
    chunks.write_u32::<LittleEndian>(44100).unwrap();
    chunks.write_u32::<LittleEndian>(88200).unwrap();
    chunks.write_u16::<LittleEndian>(2).unwrap();
    chunks.write_u16::<LittleEndian>(16).unwrap();
    chunks.extend_from_slice(b"data");
    chunks.write_u32::<LittleEndian>(4).unwrap();
    chunks.extend_from_slice(&[0; 4]);

    if let Some(title) = info_title {
        let mut value = title.as_bytes().to_vec();
        value.push(0);
        if value.len() % 2 == 1 {
            value.push(0);
        }
        chunks.extend_from_slice(b"LIST");
        chunks.write_u32::<LittleEndian>(4 + 8 + value.len() as u32).unwrap();
        chunks.extend_from_slice(b"INFO");
        chunks.extend_from_slice(b"INAM");
        chunks.write_u32::<LittleEndian>(value.len() as u32).unwrap();
        chunks.extend_from_slice(&value);
    }

    let mut riff = Vec::new();
    riff.extend_from_slice(b"RIFF");
    riff.write_u32::<LittleEndian>(4 + chunks.len() as u32).unwrap();
    riff.extend_from_slice(b"WAVE");
    riff.extend_from_slice(&chunks);
    riff
}

pub fn wav(dir: &TempDir) -> PathBuf {
    write(dir, "a.wav", &wav_bytes(None))
}

pub fn wav_with_info(dir: &TempDir, title: &str) -> PathBuf {
    write(dir, "info.wav", &wav_bytes(Some(title)))
}

pub fn aiff(dir: &TempDir) -> PathBuf {
    let mut chunks = Vec::new();
    chunks.extend_from_slice(b"COMM");
    chunks.write_u32::<BigEndian>(18).unwrap();
    chunks.write_u16::<BigEndian>(1).unwrap();
    chunks.write_u32::<BigEndian>(1).unwrap();
    chunks.write_u16::<BigEndian>(16).unwrap();
    // 44100 as 80-bit extended
    chunks.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);
    chunks.extend_from_slice(b"SSND");
    chunks.write_u32::<BigEndian>(10).unwrap();
    chunks.extend_from_slice(&[0; 10]);

    let mut form = Vec::new();
    form.extend_from_slice(b"FORM");
    form.write_u32::<BigEndian>(4 + chunks.len() as u32).unwrap();
    form.extend_from_slice(b"AIFF");
    form.extend_from_slice(&chunks);
    write(dir, "a.aiff", &form)
}

fn streaminfo(last: bool) -> Vec<u8> {
    let mut block = vec![if last { 0x80 } else { 0 }, 0, 0, 34];
    block.write_u16::<BigEndian>(4096).unwrap();
    block.write_u16::<BigEndian>(4096).unwrap();
    block.write_u24::<BigEndian>(0).unwrap();
    block.write_u24::<BigEndian>(0).unwrap();
    // sample rate, channels - 1, bits per sample - 1, total samples
    block
        .write_u64::<BigEndian>((44100 << 44) | (15 << 36))
        .unwrap();
    block.extend_from_slice(&[0; 16]);
    block
}

fn comment_block(vendor: &str, comments: &[&str]) -> Vec<u8> {
    let mut body = Vec::new();
    body.write_u32::<LittleEndian>(vendor.len() as u32).unwrap();
    body.extend_from_slice(vendor.as_bytes());
    body.write_u32::<LittleEndian>(comments.len() as u32).unwrap();
    for c in comments {
        body.write_u32::<LittleEndian>(c.len() as u32).unwrap();
        body.extend_from_slice(c.as_bytes());
    }
    let mut block = vec![0x84];
    block.write_u24::<BigEndian>(body.len() as u32).unwrap();
    block.extend_from_slice(&body);
    block
}

/// Native FLAC with a TITLE comment and a fake frame
pub fn flac(dir: &TempDir) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&streaminfo(false));
    bytes.extend_from_slice(&comment_block("loudtag tests", &["TITLE=x"]));
    bytes.extend_from_slice(&FLAC_FRAME);
    write(dir, "a.flac", &bytes)
}

pub const OGG_SERIAL: u32 = 0x1DE5_ABCD;
pub const OTHER_SERIAL: u32 = 0x0BAD_F00D;

/// One logical stream, every packet starting on a fresh page
fn ogg_stream(serial: u32, packets: &[(&[u8], u8, u64)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut seq = 0;
    for &(packet, flags, abgp) in packets {
        for mut page in ogg_pager::paginate([packet], serial, abgp, flags).unwrap() {
            page.header_mut().sequence_number = seq;
            page.gen_crc();
            bytes.extend_from_slice(&page.as_bytes());
            seq += 1;
        }
    }
    bytes
}

/// A page of another logical stream
pub fn other_stream_page(sequence_number: u32) -> Vec<u8> {
    let mut page = ogg_pager::paginate([&b"other stream"[..]], OTHER_SERIAL, 0, 0)
        .unwrap()
        .remove(0);
    page.header_mut().sequence_number = sequence_number;
    page.gen_crc();
    page.as_bytes()
}

const FLAC_FRAME: [u8; 6] = [0xFF, 0xF8, 0x69, 0x08, 0, 0];

/// FLAC in Ogg: mapping packet, comment packet and one audio page
pub fn ogg_flac(dir: &TempDir) -> PathBuf {
    ogg_flac_with(
        dir,
        &["TITLE=x", "REPLAYGAIN_TRACK_GAIN=+1.00 dB"],
        1,
        false,
    )
}

/// FLAC in Ogg with `audio_pages` audio pages. With `interleaved` a page of
/// another stream (sequence number 7) follows the first audio page.
pub fn ogg_flac_with(
    dir: &TempDir,
    comments: &[&str],
    audio_pages: u64,
    interleaved: bool,
) -> PathBuf {
    let mut mapping = b"\x7FFLAC\x01\x00".to_vec();
    mapping.write_u16::<BigEndian>(1).unwrap();
    mapping.extend_from_slice(b"fLaC");
    mapping.extend_from_slice(&streaminfo(false));
    let comments = comment_block("loudtag tests", comments);

    let headers = ogg_stream(
        OGG_SERIAL,
        &[
            (&mapping[..], CONTAINS_FIRST_PAGE_OF_BITSTREAM, 0),
            (&comments[..], 0, 0),
        ],
    );
    let header_pages = ogg_pages_of(&headers).len() as u32;

    let mut bytes = headers;
    for i in 0..audio_pages {
        let mut page = ogg_pager::paginate([&FLAC_FRAME[..]], OGG_SERIAL, i + 1, 0)
            .unwrap()
            .remove(0);
        page.header_mut().sequence_number = header_pages + i as u32;
        page.gen_crc();
        bytes.extend_from_slice(&page.as_bytes());
        if interleaved && i == 0 {
            bytes.extend_from_slice(&other_stream_page(7));
        }
    }
    write(dir, "a.oga", &bytes)
}

/// Ogg Opus with a TITLE and a stale REPLAYGAIN_TRACK_GAIN comment
pub fn opus(dir: &TempDir) -> PathBuf {
    let mut head = b"OpusHead".to_vec();
    head.extend_from_slice(&[1, 1]);
    head.write_u16::<LittleEndian>(312).unwrap();
    head.write_u32::<LittleEndian>(48000).unwrap();
    head.write_i16::<LittleEndian>(0).unwrap();
    head.push(0);

    let mut tags = b"OpusTags".to_vec();
    let vendor = b"loudtag tests";
    tags.write_u32::<LittleEndian>(vendor.len() as u32).unwrap();
    tags.extend_from_slice(vendor);
    let comments = ["TITLE=x", "REPLAYGAIN_TRACK_GAIN=+1.00 dB"];
    tags.write_u32::<LittleEndian>(comments.len() as u32).unwrap();
    for c in comments {
        tags.write_u32::<LittleEndian>(c.len() as u32).unwrap();
        tags.extend_from_slice(c.as_bytes());
    }

    // one 20 ms CELT frame of silence
    let audio = [0xF8, 0xFF, 0xFE];
    let bytes = ogg_stream(
        OGG_SERIAL,
        &[
            (&head[..], CONTAINS_FIRST_PAGE_OF_BITSTREAM, 0),
            (&tags[..], 0, 0),
            (&audio[..], 0, 960),
        ],
    );
    write(dir, "a.opus", &bytes)
}

/// Monkey's Audio: just the descriptor magic and some bytes
pub fn ape(dir: &TempDir) -> PathBuf {
    let mut bytes = b"MAC ".to_vec();
    bytes.extend_from_slice(&[0; 60]);
    write(dir, "a.ape", &bytes)
}

/// WavPack: block magic and an unparsable header
pub fn wavpack(dir: &TempDir) -> PathBuf {
    let mut bytes = b"wvpk".to_vec();
    bytes.extend_from_slice(&[0; 60]);
    write(dir, "a.wv", &bytes)
}

fn mp4_atom(fourcc: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut atom = Vec::new();
    atom.write_u32::<BigEndian>(8 + body.len() as u32).unwrap();
    atom.extend_from_slice(fourcc);
    atom.extend_from_slice(body);
    atom
}

/// `ftyp`, an empty `moov` and a small `mdat`
pub fn mp4(dir: &TempDir) -> PathBuf {
    let mut bytes = mp4_atom(b"ftyp", b"M4A \0\0\0\0M4A ");
    bytes.extend_from_slice(&mp4_atom(b"moov", &[]));
    bytes.extend_from_slice(&mp4_atom(b"mdat", &[0; 4]));
    write(dir, "a.m4a", &bytes)
}

/// (serial, sequence number) of every page, up to the first non-page bytes
pub fn ogg_pages(path: &Path) -> Vec<(u32, u32)> {
    ogg_pages_of(&fs::read(path).unwrap())
}

fn ogg_pages_of(bytes: &[u8]) -> Vec<(u32, u32)> {
    let mut reader = Cursor::new(bytes);
    let mut pages = Vec::new();
    while bytes[reader.position() as usize..].starts_with(b"OggS") {
        let page = Page::read(&mut reader).unwrap();
        pages.push((page.header().stream_serial, page.header().sequence_number));
    }
    pages
}

fn asf_object(guid: &[u8; 16], body: &[u8]) -> Vec<u8> {
    let mut o = guid.to_vec();
    o.write_u64::<LittleEndian>(24 + body.len() as u64).unwrap();
    o.extend_from_slice(body);
    o
}

fn utf16z(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Header with File Properties and one `WM/AlbumTitle` attribute, then an empty Data Object
pub fn asf(dir: &TempDir) -> PathBuf {
    let mut ecd = Vec::new();
    ecd.write_u16::<LittleEndian>(1).unwrap();
    let name = utf16z("WM/AlbumTitle");
    let value = utf16z("y");
    ecd.write_u16::<LittleEndian>(name.len() as u16).unwrap();
    ecd.extend_from_slice(&name);
    ecd.write_u16::<LittleEndian>(0).unwrap();
    ecd.write_u16::<LittleEndian>(value.len() as u16).unwrap();
    ecd.extend_from_slice(&value);
    let ecd = asf_object(&ASF_EXTENDED_CONTENT, &ecd);

    let data = asf_object(&ASF_DATA, &[0; 26]);
    let header_len = 30 + 104 + ecd.len();
    let file_len = header_len + data.len();

    let mut props = vec![0; 80];
    props[16..24].copy_from_slice(&(file_len as u64).to_le_bytes());
    let props = asf_object(&ASF_FILE_PROPERTIES, &props);

    let mut bytes = ASF_HEADER.to_vec();
    bytes.write_u64::<LittleEndian>(header_len as u64).unwrap();
    bytes.write_u32::<LittleEndian>(2).unwrap();
    bytes.extend_from_slice(&[1, 2]);
    bytes.extend_from_slice(&props);
    bytes.extend_from_slice(&ecd);
    bytes.extend_from_slice(&data);
    write(dir, "a.wma", &bytes)
}

/// File size recorded in the File Properties Object
pub fn asf_recorded_size(path: &Path) -> u64 {
    let bytes = fs::read(path).unwrap();
    let at = bytes
        .windows(16)
        .position(|w| w == ASF_FILE_PROPERTIES)
        .unwrap();
    u64::from_le_bytes(bytes[at + 40..at + 48].try_into().unwrap())
}

pub fn contains(path: &Path, needle: &[u8]) -> bool {
    fs::read(path)
        .unwrap()
        .windows(needle.len())
        .any(|w| w == needle)
}
