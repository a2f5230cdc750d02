//! Versioned little-endian binary encoding.
//!
//! Every top-level payload starts with a header: the type name as a
//! `u32` length followed by its UTF-8 bytes, then a `u32` version.
//! Readers reject foreign names with [BinFHEError::InvalidData] and
//! versions above [SERIALIZATION_VERSION] with [BinFHEError::Version].

use std::io::{Read, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use math::poly::{Format, NativePoly};

use crate::error::{BinFHEError, Result};
use crate::params::{BinFHEMethod, LWEParams, RingGSWParams};
use crate::rgsw::ciphertext::RingGSWCiphertext;
use crate::rgsw::key::{BootstrappingKey, KeyGrid};

/// Highest payload version this build reads, and the one it writes.
pub const SERIALIZATION_VERSION: u32 = 1;

const MAX_NAME_LEN: u32 = 64;

const PARAMS_NAME: &str = "RingGSWParams";
const CIPHERTEXT_NAME: &str = "RingGSWCiphertext";
const BOOTSTRAPPING_KEY_NAME: &str = "RingGSWBTKey";

/// Serialize to a byte stream.
pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
}

/// Deserialize from a byte stream into a pre-allocated receiver.
///
/// The receiver's layout (dimensions, method) must match the payload.
pub trait ReaderFrom {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()>;
}

fn write_header<W: Write>(writer: &mut W, name: &str) -> Result<()> {
    writer.write_u32::<LittleEndian>(name.len() as u32)?;
    writer.write_all(name.as_bytes())?;
    writer.write_u32::<LittleEndian>(SERIALIZATION_VERSION)?;
    Ok(())
}

/// Reads a header, checks the name and returns the version.
fn read_header<R: Read>(reader: &mut R, name: &str) -> Result<u32> {
    let len: u32 = reader.read_u32::<LittleEndian>()?;
    if len > MAX_NAME_LEN {
        return Err(BinFHEError::InvalidData(format!(
            "name length {len} exceeds {MAX_NAME_LEN}"
        )));
    }
    let mut bytes: Vec<u8> = vec![0u8; len as usize];
    reader.read_exact(&mut bytes)?;
    if bytes != name.as_bytes() {
        return Err(BinFHEError::InvalidData(format!(
            "expected {name}, found {}",
            String::from_utf8_lossy(&bytes)
        )));
    }
    let version: u32 = reader.read_u32::<LittleEndian>()?;
    if version > SERIALIZATION_VERSION {
        return Err(BinFHEError::Version {
            found: version,
            supported: SERIALIZATION_VERSION,
        });
    }
    Ok(version)
}

fn read_len<R: Read>(reader: &mut R, expected: usize, what: &str) -> Result<()> {
    let len: u64 = reader.read_u64::<LittleEndian>()?;
    if len != expected as u64 {
        return Err(BinFHEError::InvalidData(format!(
            "{what}: expected {expected}, found {len}"
        )));
    }
    Ok(())
}

fn format_tag(format: Format) -> u8 {
    match format {
        Format::Coefficient => 0,
        Format::Evaluation => 1,
    }
}

fn format_from_tag(tag: u8) -> Result<Format> {
    match tag {
        0 => Ok(Format::Coefficient),
        1 => Ok(Format::Evaluation),
        _ => Err(BinFHEError::InvalidData(format!("unknown format tag {tag}"))),
    }
}

/// Format tag, length, then the values.
impl WriterTo for NativePoly {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(format_tag(self.format()))?;
        writer.write_u64::<LittleEndian>(self.n() as u64)?;
        for &x in self.values() {
            writer.write_u64::<LittleEndian>(x)?;
        }
        Ok(())
    }
}

impl ReaderFrom for NativePoly {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let format: Format = format_from_tag(reader.read_u8()?)?;
        read_len(reader, self.n(), "polynomial length")?;
        let mut values: Vec<u64> = vec![0u64; self.n()];
        reader.read_u64_into::<LittleEndian>(&mut values)?;
        let q: u64 = self.modulus();
        if let Some(x) = values.iter().find(|&&x| x >= q) {
            return Err(BinFHEError::InvalidData(format!(
                "coefficient {x} not reduced modulo {q}"
            )));
        }
        self.overwrite_as(format).copy_from_slice(&values);
        Ok(())
    }
}

fn write_ciphertext_body<W: Write>(ct: &RingGSWCiphertext, writer: &mut W) -> Result<()> {
    writer.write_u64::<LittleEndian>(ct.rows() as u64)?;
    for row in ct.iter() {
        row[0].write_to(writer)?;
        row[1].write_to(writer)?;
    }
    Ok(())
}

fn read_ciphertext_body<R: Read>(ct: &mut RingGSWCiphertext, reader: &mut R) -> Result<()> {
    read_len(reader, ct.rows(), "ciphertext rows")?;
    for row in ct.iter_mut() {
        row[0].read_from(reader)?;
        row[1].read_from(reader)?;
    }
    Ok(())
}

/// Header, then the row count and every row.
impl WriterTo for RingGSWCiphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_header(writer, CIPHERTEXT_NAME)?;
        write_ciphertext_body(self, writer)
    }
}

impl ReaderFrom for RingGSWCiphertext {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        read_header(reader, CIPHERTEXT_NAME)?;
        read_ciphertext_body(self, reader)
    }
}

/// Header, method tag, the grid shape, then the ciphertexts in
/// `[i][j][k]` order.
impl WriterTo for BootstrappingKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_header(writer, BOOTSTRAPPING_KEY_NAME)?;
        writer.write_u8(self.method().tag())?;
        let grid: &KeyGrid = self.grid();
        writer.write_u64::<LittleEndian>(grid.len() as u64)?;
        for x in grid.iter() {
            writer.write_u64::<LittleEndian>(x.len() as u64)?;
            for y in x.iter() {
                writer.write_u64::<LittleEndian>(y.len() as u64)?;
            }
        }
        for ct in grid.iter().flatten().flatten() {
            write_ciphertext_body(ct, writer)?;
        }
        Ok(())
    }
}

impl ReaderFrom for BootstrappingKey {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        read_header(reader, BOOTSTRAPPING_KEY_NAME)?;
        let method: BinFHEMethod = BinFHEMethod::from_tag(reader.read_u8()?)?;
        if method != self.method() {
            return Err(BinFHEError::InvalidData(format!(
                "expected a {:?} key, found {method:?}",
                self.method()
            )));
        }
        let grid: &mut KeyGrid = self.grid_mut();
        read_len(reader, grid.len(), "key grid")?;
        for x in grid.iter() {
            read_len(reader, x.len(), "key grid row")?;
            for y in x.iter() {
                read_len(reader, y.len(), "key grid column")?;
            }
        }
        for ct in grid.iter_mut().flatten().flatten() {
            read_ciphertext_body(ct, reader)?;
        }
        Ok(())
    }
}

/// Header then the primary fields; derived tables are not stored.
impl WriterTo for RingGSWParams {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let lwe: &LWEParams = self.lwe();
        write_header(writer, PARAMS_NAME)?;
        writer.write_u64::<LittleEndian>(lwe.n as u64)?;
        writer.write_u64::<LittleEndian>(lwe.big_n as u64)?;
        writer.write_u64::<LittleEndian>(lwe.q)?;
        writer.write_u64::<LittleEndian>(lwe.big_q)?;
        writer.write_f64::<LittleEndian>(lwe.sigma)?;
        writer.write_u64::<LittleEndian>(lwe.base_ks)?;
        writer.write_u64::<LittleEndian>(self.base_g())?;
        writer.write_u64::<LittleEndian>(self.base_r())?;
        writer.write_u8(self.method().tag())?;
        Ok(())
    }
}

/// Rebuilds the parameters, running [RingGSWParams::pre_compute].
impl ReaderFrom for RingGSWParams {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        *self = read_params(reader)?;
        Ok(())
    }
}

/// Reads parameters written by [WriterTo::write_to].
pub fn read_params<R: Read>(reader: &mut R) -> Result<RingGSWParams> {
    read_header(reader, PARAMS_NAME)?;
    let n: u64 = reader.read_u64::<LittleEndian>()?;
    let big_n: u64 = reader.read_u64::<LittleEndian>()?;
    let q: u64 = reader.read_u64::<LittleEndian>()?;
    let big_q: u64 = reader.read_u64::<LittleEndian>()?;
    let sigma: f64 = reader.read_f64::<LittleEndian>()?;
    let base_ks: u64 = reader.read_u64::<LittleEndian>()?;
    let base_g: u64 = reader.read_u64::<LittleEndian>()?;
    let base_r: u64 = reader.read_u64::<LittleEndian>()?;
    let method: BinFHEMethod = BinFHEMethod::from_tag(reader.read_u8()?)?;

    let lwe: LWEParams = LWEParams::new(n as usize, big_n as usize, q, big_q, sigma, base_ks)?;
    RingGSWParams::new(Arc::new(lwe), base_g, base_r, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BinFHEParamSet;
    use sampling::source::Source;

    #[test]
    fn header_rejects_newer_version() {
        let mut bytes: Vec<u8> = Vec::new();
        write_header(&mut bytes, CIPHERTEXT_NAME).unwrap();
        let offset: usize = 4 + CIPHERTEXT_NAME.len();
        bytes[offset..offset + 4].copy_from_slice(&(SERIALIZATION_VERSION + 1).to_le_bytes());
        match read_header(&mut bytes.as_slice(), CIPHERTEXT_NAME) {
            Err(BinFHEError::Version { found, supported }) => {
                assert_eq!(found, SERIALIZATION_VERSION + 1);
                assert_eq!(supported, SERIALIZATION_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn header_rejects_foreign_name() {
        let mut bytes: Vec<u8> = Vec::new();
        write_header(&mut bytes, PARAMS_NAME).unwrap();
        assert!(matches!(
            read_header(&mut bytes.as_slice(), CIPHERTEXT_NAME),
            Err(BinFHEError::InvalidData(_))
        ));
    }

    #[test]
    fn params_reject_oversized_ring_dimension() {
        let mut bytes: Vec<u8> = Vec::new();
        write_header(&mut bytes, PARAMS_NAME).unwrap();
        for v in [64u64, 1 << 40, 512, 134215681] {
            bytes.write_u64::<LittleEndian>(v).unwrap();
        }
        bytes.write_f64::<LittleEndian>(3.19).unwrap();
        for v in [25u64, 1 << 9, 23] {
            bytes.write_u64::<LittleEndian>(v).unwrap();
        }
        bytes.write_u8(BinFHEMethod::GINX.tag()).unwrap();
        match read_params(&mut bytes.as_slice()) {
            Err(BinFHEError::Config(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn ciphertext_round_trip() {
        let params: RingGSWParams = BinFHEParamSet::Toy.ring_gsw_params(BinFHEMethod::AP).unwrap();
        let mut source: Source = Source::new([12u8; 32]);
        let rows: Vec<[NativePoly; 2]> = (0..params.digits_g2())
            .map(|_| {
                [
                    NativePoly::from_uniform(params.ring(), &mut source, Format::Evaluation),
                    NativePoly::from_uniform(params.ring(), &mut source, Format::Coefficient),
                ]
            })
            .collect();
        let ct: RingGSWCiphertext = RingGSWCiphertext::from_rows(rows);

        let mut bytes: Vec<u8> = Vec::new();
        ct.write_to(&mut bytes).unwrap();
        let mut decoded: RingGSWCiphertext =
            RingGSWCiphertext::zero(params.ring(), params.digits_g2(), Format::Coefficient);
        decoded.read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, ct);

        let mut short: RingGSWCiphertext =
            RingGSWCiphertext::zero(params.ring(), 2, Format::Coefficient);
        assert!(matches!(
            short.read_from(&mut bytes.as_slice()),
            Err(BinFHEError::InvalidData(_))
        ));
    }
}
