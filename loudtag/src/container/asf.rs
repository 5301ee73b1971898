//! ASF (WMA) attributes live in the Extended Content Description object of
//! the Header Object. Only that object is edited; every other header object
//! is carried over byte for byte.

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};

use super::{ContainerKind, SaveOptions, TagContainer, ASF_HEADER_GUID};
use crate::error::ContainerError;

type Guid = [u8; 16];

const EXTENDED_CONTENT_DESCRIPTION: Guid = [
    0x40, 0xA4, 0xD0, 0xD2, 0x07, 0xE3, 0xD2, 0x11, 0x97, 0xF0, 0x00, 0xA0, 0xC9, 0x5E, 0xA8, 0x50,
];
const FILE_PROPERTIES: Guid = [
    0xA1, 0xDC, 0xAB, 0x8C, 0x47, 0xA9, 0xCF, 0x11, 0x8E, 0xE4, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65,
];

/// guid + size
const OBJECT_HEADER_LEN: u64 = 24;
/// guid + size + object count + 2 reserved bytes
const HEADER_OBJECT_LEN: u64 = 30;
/// offset of the file size inside the File Properties object
const FILE_SIZE_OFFSET: usize = 40;

const UNICODE: u16 = 0;
const FORMAT: &str = "ASF";

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    /// BYTE array, BOOL, DWORD, QWORD or WORD, kept as read
    Raw { kind: u16, data: Vec<u8> },
}

#[derive(Debug, Clone)]
struct Object {
    guid: Guid,
    /// whole object, header included
    bytes: Vec<u8>,
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn from_utf16le(b: &[u8]) -> String {
    let units: Vec<u16> = b
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

fn read_sized(reader: &mut &[u8], len: usize) -> Result<Vec<u8>, ContainerError> {
    if reader.len() < len {
        return Err(ContainerError::malformed(FORMAT, "truncated attribute"));
    }
    let mut v = vec![0; len];
    reader.read_exact(&mut v)?;
    Ok(v)
}

fn parse_attributes(object: &[u8]) -> Result<Vec<(String, Value)>, ContainerError> {
    let reader = &mut &object[OBJECT_HEADER_LEN as usize..];
    let count = reader.read_u16::<LittleEndian>()?;
    let mut attributes = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let name_len = reader.read_u16::<LittleEndian>()?;
        let name = from_utf16le(&read_sized(reader, usize::from(name_len))?);
        let kind = reader.read_u16::<LittleEndian>()?;
        let value_len = reader.read_u16::<LittleEndian>()?;
        let data = read_sized(reader, usize::from(value_len))?;
        let value = match kind {
            UNICODE => Value::Text(from_utf16le(&data)),
            _ => Value::Raw { kind, data },
        };
        attributes.push((name, value));
    }
    Ok(attributes)
}

fn u16_len(len: usize) -> Result<u16, ContainerError> {
    u16::try_from(len).map_err(|_| ContainerError::malformed(FORMAT, "attribute too long"))
}

fn create_attributes(attributes: &[(String, Value)]) -> Result<Object, ContainerError> {
    let mut body = Vec::new();
    body.write_u16::<LittleEndian>(u16_len(attributes.len())?)?;
    for (name, value) in attributes {
        let name = utf16le(name);
        body.write_u16::<LittleEndian>(u16_len(name.len())?)?;
        body.write_all(&name)?;
        let (kind, data) = match value {
            Value::Text(s) => (UNICODE, utf16le(s)),
            Value::Raw { kind, data } => (*kind, data.clone()),
        };
        body.write_u16::<LittleEndian>(kind)?;
        body.write_u16::<LittleEndian>(u16_len(data.len())?)?;
        body.write_all(&data)?;
    }

    let mut bytes = Vec::with_capacity(body.len() + OBJECT_HEADER_LEN as usize);
    bytes.write_all(&EXTENDED_CONTENT_DESCRIPTION)?;
    bytes.write_u64::<LittleEndian>(body.len() as u64 + OBJECT_HEADER_LEN)?;
    bytes.extend_from_slice(&body);
    Ok(Object {
        guid: EXTENDED_CONTENT_DESCRIPTION,
        bytes,
    })
}

pub(crate) struct AsfTag {
    path: PathBuf,
    file: File,
    header_len: u64,
    reserved: [u8; 2],
    objects: Vec<Object>,
    attributes: Vec<(String, Value)>,
}

impl AsfTag {
    pub(crate) fn open(path: &Path) -> Result<Self, ContainerError> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut guid = Guid::default();
        file.read_exact(&mut guid)?;
        if guid != ASF_HEADER_GUID {
            return Err(ContainerError::malformed(FORMAT, "missing Header Object"));
        }
        let header_len = file.read_u64::<LittleEndian>()?;
        let count = file.read_u32::<LittleEndian>()?;
        let mut reserved = [0; 2];
        file.read_exact(&mut reserved)?;
        if header_len < HEADER_OBJECT_LEN || header_len > file.metadata()?.len() {
            return Err(ContainerError::malformed(FORMAT, "bad Header Object size"));
        }

        let mut children = vec![0; (header_len - HEADER_OBJECT_LEN) as usize];
        file.read_exact(&mut children)?;
        let reader = &mut &children[..];
        let mut objects = Vec::new();
        let mut attributes = Vec::new();
        for _ in 0..count {
            let mut guid = Guid::default();
            reader.read_exact(&mut guid)?;
            let size = reader.read_u64::<LittleEndian>()?;
            if size < OBJECT_HEADER_LEN || size - OBJECT_HEADER_LEN > reader.len() as u64 {
                return Err(ContainerError::malformed(FORMAT, "bad header child size"));
            }
            let mut bytes = Vec::with_capacity(size as usize);
            bytes.write_all(&guid)?;
            bytes.write_u64::<LittleEndian>(size)?;
            bytes.extend_from_slice(&read_sized(reader, (size - OBJECT_HEADER_LEN) as usize)?);
            if guid == EXTENDED_CONTENT_DESCRIPTION {
                attributes = parse_attributes(&bytes)?;
            }
            objects.push(Object { guid, bytes });
        }
        debug!(
            "{} opened as ASF with {} header objects, {} attributes",
            path.display(),
            objects.len(),
            attributes.len()
        );

        Ok(Self {
            path: path.to_owned(),
            file,
            header_len,
            reserved,
            objects,
            attributes,
        })
    }

    /// New header bytes and the child objects they are made of
    fn create_header(&self) -> Result<(Vec<u8>, Vec<Object>), ContainerError> {
        let ecd = create_attributes(&self.attributes)?;
        let mut objects = self.objects.clone();
        match objects
            .iter()
            .position(|o| o.guid == EXTENDED_CONTENT_DESCRIPTION)
        {
            Some(i) => objects[i] = ecd,
            None => objects.push(ecd),
        }

        let new_len =
            HEADER_OBJECT_LEN + objects.iter().map(|o| o.bytes.len() as u64).sum::<u64>();
        let delta = new_len as i64 - self.header_len as i64;
        for o in objects.iter_mut().filter(|o| o.guid == FILE_PROPERTIES) {
            if o.bytes.len() < FILE_SIZE_OFFSET + 8 {
                return Err(ContainerError::malformed(FORMAT, "short File Properties Object"));
            }
            let mut size = Cursor::new(&mut o.bytes[FILE_SIZE_OFFSET..FILE_SIZE_OFFSET + 8]);
            let old = size.read_u64::<LittleEndian>()?;
            size.set_position(0);
            size.write_u64::<LittleEndian>((old as i64 + delta) as u64)?;
        }

        let mut header = Vec::with_capacity(new_len as usize);
        header.write_all(&ASF_HEADER_GUID)?;
        header.write_u64::<LittleEndian>(new_len)?;
        header.write_u32::<LittleEndian>(objects.len() as u32)?;
        header.write_all(&self.reserved)?;
        for o in &objects {
            header.write_all(&o.bytes)?;
        }
        Ok((header, objects))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.attributes.iter().position(|(k, _)| k == key)
    }
}

impl TagContainer for AsfTag {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Asf
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<String> {
        match &self.attributes[self.position(key)?].1 {
            Value::Text(s) => Some(s.clone()),
            Value::Raw { .. } => None,
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ContainerError> {
        trace!("{}: {key}={value}", self.path.display());
        match self.position(key) {
            Some(i) => {
                self.attributes[i].1 = Value::Text(value);
                let mut idx = 0;
                self.attributes.retain(|(k, _)| {
                    idx += 1;
                    idx - 1 == i || k != key
                });
            }
            None => self.attributes.push((key.to_owned(), Value::Text(value))),
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.attributes.retain(|(k, _)| k != key);
    }

    fn keys(&self) -> Vec<String> {
        self.attributes.iter().map(|(k, _)| k.clone()).collect()
    }

    fn save(&mut self, _options: &SaveOptions) -> Result<(), ContainerError> {
        let (header, objects) = self.create_header()?;

        self.file.seek(SeekFrom::Start(self.header_len))?;
        let mut remaining = Vec::new();
        self.file.read_to_end(&mut remaining)?;

        self.file.rewind()?;
        self.file.set_len(0)?;
        self.file.write_all(&header)?;
        self.file.write_all(&remaining)?;
        self.file.flush()?;

        self.header_len = header.len() as u64;
        self.objects = objects;
        Ok(())
    }
}
