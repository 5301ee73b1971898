//! FLAC in Ogg: the VORBIS_COMMENT metadata block travels as the second
//! header packet, so it is rewritten with `ogg_pager` the same way Ogg
//! Vorbis comment packets are.

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};
use lofty::ogg::VorbisComments;
use ogg_pager::{Packets, Page, PageHeader, CONTAINS_FIRST_PAGE_OF_BITSTREAM};

use super::{ContainerKind, SaveOptions, TagContainer};
use crate::error::ContainerError;

const OGG_FLAC_MAGIC: &[u8] = b"\x7FFLAC";
const FLAC_MAGIC: &[u8] = b"fLaC";
const OGG_PAGE_MAGIC: &[u8] = b"OggS";
const VORBIS_COMMENT_BLOCK: u8 = 4;
const LAST_BLOCK_FLAG: u8 = 0x80;
const FORMAT: &str = "Ogg FLAC";

pub(crate) fn is_ogg_flac(path: &Path) -> Result<bool, ContainerError> {
    let mut file = File::open(path)?;
    let packets = Packets::read_count(&mut file, 1)?;
    Ok(packets
        .get(0)
        .is_some_and(|p| p.starts_with(OGG_FLAC_MAGIC)))
}

/// Number of header packets, mapping packet included
fn header_packet_count(first: &[u8]) -> Result<isize, ContainerError> {
    // 0x7F "FLAC" major minor count:u16be "fLaC" STREAMINFO
    if first.len() < 13 || !first.starts_with(OGG_FLAC_MAGIC) || &first[9..13] != FLAC_MAGIC {
        return Err(ContainerError::malformed(FORMAT, "bad mapping header packet"));
    }
    let n = i32::from(u16::from_be_bytes([first[7], first[8]]));
    // 0 means unknown, the comment block is mandatory and always second
    let n = isize::try_from(n.max(1))
        .map_err(|_| ContainerError::malformed(FORMAT, "too many header packets"))?;
    Ok(1 + n)
}

fn parse_comment_block(block: &[u8]) -> Result<VorbisComments, ContainerError> {
    let reader = &mut &block[..];
    let header = reader.read_u8()?;
    if header & !LAST_BLOCK_FLAG != VORBIS_COMMENT_BLOCK {
        return Err(ContainerError::malformed(
            FORMAT,
            "second header packet is not a VORBIS_COMMENT block",
        ));
    }
    let len = reader.read_u24::<BigEndian>()? as usize;
    if reader.len() < len {
        return Err(ContainerError::malformed(FORMAT, "truncated VORBIS_COMMENT block"));
    }
    let reader = &mut &reader[..len];

    let mut comments = VorbisComments::new();
    let vendor_len = reader.read_u32::<LittleEndian>()? as usize;
    let mut vendor = vec![0; vendor_len.min(reader.len())];
    reader.read_exact(&mut vendor)?;
    comments.set_vendor(String::from_utf8_lossy(&vendor).into_owned());

    let count = reader.read_u32::<LittleEndian>()?;
    for _ in 0..count {
        let len = reader.read_u32::<LittleEndian>()? as usize;
        let mut comment = vec![0; len.min(reader.len())];
        reader.read_exact(&mut comment)?;
        let comment = String::from_utf8_lossy(&comment);
        match comment.split_once('=') {
            Some((k, v)) => comments.push(k.to_owned(), v.to_owned()),
            None => trace!("skipping comment without '=': {comment}"),
        }
    }
    Ok(comments)
}

fn create_comment_block(last: bool, comments: &VorbisComments) -> Result<Vec<u8>, ContainerError> {
    let mut body = Cursor::new(Vec::new());
    let vendor = comments.vendor().as_bytes();
    body.write_u32::<LittleEndian>(vendor.len() as u32)?;
    body.write_all(vendor)?;
    body.write_u32::<LittleEndian>(comments.items().len() as u32)?;
    for (k, v) in comments.items() {
        let comment = format!("{k}={v}");
        body.write_u32::<LittleEndian>(comment.len() as u32)?;
        body.write_all(comment.as_bytes())?;
    }
    let body = body.into_inner();
    if body.len() >= 1 << 24 {
        return Err(ContainerError::malformed(FORMAT, "VORBIS_COMMENT block too large"));
    }

    let mut block = Vec::with_capacity(body.len() + 4);
    let flag = if last { LAST_BLOCK_FLAG } else { 0 };
    block.write_u8(flag | VORBIS_COMMENT_BLOCK)?;
    block.write_u24::<BigEndian>(body.len() as u32)?;
    block.extend_from_slice(&body);
    Ok(block)
}

pub(crate) struct OggFlacTag {
    path: PathBuf,
    file: File,
    header_packets: isize,
    comments: VorbisComments,
}

impl OggFlacTag {
    pub(crate) fn open(path: &Path) -> Result<Self, ContainerError> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let first = Packets::read_count(&mut file, 1)?;
        let header_packets = header_packet_count(
            first
                .get(0)
                .ok_or_else(|| ContainerError::malformed(FORMAT, "no packets"))?,
        )?;

        file.rewind()?;
        let packets = Packets::read_count(&mut file, header_packets)?;
        let comments = parse_comment_block(
            packets
                .get(1)
                .ok_or_else(|| ContainerError::malformed(FORMAT, "no comment packet"))?,
        )?;
        debug!(
            "{} opened as Ogg FLAC with {header_packets} header packets",
            path.display()
        );
        Ok(Self {
            path: path.to_owned(),
            file,
            header_packets,
            comments,
        })
    }
}

impl TagContainer for OggFlacTag {
    fn kind(&self) -> ContainerKind {
        ContainerKind::OggFlac
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<String> {
        self.comments.get(key).map(str::to_owned)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ContainerError> {
        trace!("{}: {key}={value}", self.path.display());
        self.comments.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        let _ = self.comments.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.comments.items().map(|(k, _)| k.to_owned()).collect()
    }

    fn save(&mut self, _options: &SaveOptions) -> Result<(), ContainerError> {
        self.file.rewind()?;
        let stream_serial = PageHeader::read(&mut self.file)?.stream_serial;

        self.file.rewind()?;
        let mut packets = Packets::read_count(&mut self.file, self.header_packets)?;
        let mut remaining = Vec::new();
        self.file.read_to_end(&mut remaining)?;

        let last = packets
            .get(1)
            .and_then(|p| p.first())
            .is_some_and(|h| h & LAST_BLOCK_FLAG != 0);
        packets.set(1, create_comment_block(last, &self.comments)?);

        // the whole new file is built before the old one is touched
        let mut out = Vec::with_capacity(remaining.len());
        let pages_written =
            packets.write_to(&mut out, stream_serial, 0, CONTAINS_FIRST_PAGE_OF_BITSTREAM)? as u32;
        renumber_pages(&remaining, stream_serial, pages_written, &mut out)?;

        self.file.rewind()?;
        self.file.set_len(0)?;
        self.file.write_all(&out)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Appends the pages that follow the headers to `out`.
///
/// Pages of `serial` are renumbered from `first`, pages of other streams are
/// copied as they are. Whatever follows the last page and is not a page
/// (an appended ID3v1 or APE tag) is copied verbatim. A broken page is an error.
fn renumber_pages(
    remaining: &[u8],
    serial: u32,
    first: u32,
    out: &mut Vec<u8>,
) -> Result<(), ContainerError> {
    let mut pages = Cursor::new(remaining);
    let mut sequence_number = first;
    loop {
        let start = pages.position() as usize;
        let rest = &remaining[start..];
        if !rest.starts_with(OGG_PAGE_MAGIC) {
            if !rest.is_empty() {
                debug!("keeping {} trailing bytes after the last page", rest.len());
            }
            out.extend_from_slice(rest);
            return Ok(());
        }

        let mut page = Page::read(&mut pages)?;
        if page.header().stream_serial == serial {
            page.header_mut().sequence_number = sequence_number;
            page.gen_crc();
            out.extend_from_slice(&page.as_bytes());
            sequence_number += 1;
        } else {
            out.extend_from_slice(&remaining[start..pages.position() as usize]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_block_round_trip() {
        let mut c = VorbisComments::new();
        c.set_vendor(String::from("reference libFLAC 1.4.3"));
        c.push(String::from("TITLE"), String::from("a=b"));
        c.push(String::from("REPLAYGAIN_TRACK_GAIN"), String::from("-6.50 dB"));

        let block = create_comment_block(true, &c).unwrap();
        assert_eq!(block[0], 0x84);
        let back = parse_comment_block(&block).unwrap();
        assert_eq!(back.vendor(), "reference libFLAC 1.4.3");
        assert_eq!(back.get("title"), Some("a=b"));
        assert_eq!(back.get("REPLAYGAIN_TRACK_GAIN"), Some("-6.50 dB"));

        let block = create_comment_block(false, &c).unwrap();
        assert_eq!(block[0], VORBIS_COMMENT_BLOCK);
    }

    #[test]
    fn rejects_other_blocks() {
        // PADDING
        assert!(parse_comment_block(&[0x81, 0, 0, 0]).is_err());
    }

    #[test]
    fn packet_counts() {
        let mut first = Vec::from(OGG_FLAC_MAGIC);
        first.extend_from_slice(&[1, 0, 0, 3]);
        first.extend_from_slice(FLAC_MAGIC);
        assert_eq!(header_packet_count(&first).unwrap(), 4);
        first[8] = 0;
        assert_eq!(header_packet_count(&first).unwrap(), 2);
        assert!(header_packet_count(b"\x7FFLAC").is_err());
    }

    fn page(serial: u32, sequence_number: u32, content: &[u8]) -> Vec<u8> {
        let mut page = ogg_pager::paginate([content], serial, 0, 0).unwrap().remove(0);
        page.header_mut().sequence_number = sequence_number;
        page.gen_crc();
        page.as_bytes()
    }

    #[test]
    fn renumbers_own_pages_only() {
        let mut remaining = page(1, 5, b"a");
        remaining.extend_from_slice(&page(2, 9, b"b"));
        remaining.extend_from_slice(&page(1, 6, b"c"));
        remaining.extend_from_slice(b"TAGxyz");

        let mut out = Vec::new();
        renumber_pages(&remaining, 1, 2, &mut out).unwrap();
        assert_eq!(out.len(), remaining.len());

        let mut reader = Cursor::new(&out[..]);
        let numbers: Vec<(u32, u32)> = (0..3)
            .map(|_| {
                let p = Page::read(&mut reader).unwrap();
                (p.header().stream_serial, p.header().sequence_number)
            })
            .collect();
        assert_eq!(numbers, [(1, 2), (2, 9), (1, 3)]);
        assert_eq!(&out[reader.position() as usize..], b"TAGxyz");
    }

    #[test]
    fn broken_page_is_an_error() {
        let mut remaining = page(1, 5, b"abc");
        remaining.truncate(remaining.len() - 2);
        let mut out = Vec::new();
        assert!(renumber_pages(&remaining, 1, 2, &mut out).is_err());
    }
}
