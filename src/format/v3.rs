//! Password Safe v3 container
//!
//! Layout (integers little-endian):
//!
//! | size | content |
//! |---|---|
//! | 4 | `PWS3` |
//! | 32 | salt |
//! | 4 | iteration count |
//! | 32 | SHA-256 of the stretched key |
//! | 64 | wrapped encryption and authentication keys |
//! | 16 | CBC initialization vector |
//! | N x 16 | Twofish-CBC ciphertext of header and record fields |
//! | 16 | `PWS3-EOFPWS3-EOF`, unencrypted |
//! | 32 | HMAC-SHA-256 over the plaintext field values |

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{ContainerFormat, Encoded};
use super::field::{write_field_into, Field};
use super::header::{decode_header, encode_header, HeaderTable};
use super::record::{decode_record, encode_record, RecordTable};
use super::table::{read_section, Section};
use crate::config::SafeOptions;
use crate::crypto::{
    decrypt, encrypt, stretch_key, unwrap_keys, verification_hash, verify_password, wrap_keys,
    IntegrityMac, KeySet,
};
use crate::database::Database;
use crate::error::{Result, SafeError};
use crate::utils::generate_iv;
use crate::{
    BLOCK_SIZE, EOF_MARKER, IV_LENGTH, KEY_LENGTH, MAGIC_V3, MIN_ITERATIONS, SALT_LENGTH,
    TAG_LENGTH, WRAPPED_KEYS_LENGTH,
};

/// Bytes before the ciphertext region
const PREAMBLE_LENGTH: usize =
    MAGIC_V3.len() + SALT_LENGTH + 4 + KEY_LENGTH + WRAPPED_KEYS_LENGTH + IV_LENGTH;

/// Password Safe v3 format
#[derive(Debug, Clone, Copy, Default)]
pub struct V3Format;

/// Sequential reader over the fixed-size regions of a container
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, region: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(SafeError::Truncation {
                region,
                offset: self.pos,
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, region: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, region)?);
        Ok(out)
    }
}

/// Collect ciphertext blocks up to the end-of-file marker
fn read_ciphertext(reader: &mut Reader<'_>) -> Result<Vec<u8>> {
    let mut ciphertext = Vec::new();
    loop {
        match reader.remaining() {
            0 => return Err(SafeError::format("missing end-of-file marker")),
            n if n < BLOCK_SIZE => {
                return Err(SafeError::format(
                    "ciphertext length is not a multiple of the block size",
                ));
            }
            _ => {}
        }

        let block = reader.take(BLOCK_SIZE, "ciphertext block")?;
        if block == EOF_MARKER {
            return Ok(ciphertext);
        }
        ciphertext.extend_from_slice(block);
    }
}

/// Split the plaintext into the header section and one section per record
fn read_sections(plaintext: &[u8]) -> Result<(Section, Vec<Section>)> {
    let header = read_section::<HeaderTable>(plaintext, 0)?;
    if header.end > plaintext.len() {
        return Err(SafeError::format("header runs past the end of the data"));
    }

    let mut records = Vec::new();
    let mut offset = header.end;
    while offset < plaintext.len() {
        let section = read_section::<RecordTable>(plaintext, offset)?;
        offset = section.end;
        records.push(section);
    }
    if offset > plaintext.len() {
        return Err(SafeError::format("record runs past the end of the data"));
    }

    Ok((header, records))
}

impl ContainerFormat for V3Format {
    fn name(&self) -> &'static str {
        "Password Safe v3"
    }

    fn magic(&self) -> &'static [u8] {
        MAGIC_V3
    }

    fn decode(&self, bytes: &[u8], password: &str, options: &SafeOptions) -> Result<Database> {
        let mut reader = Reader::new(bytes);

        let magic: [u8; 4] = reader.array("magic tag")?;
        if &magic != MAGIC_V3 {
            return Err(SafeError::format("not a Password Safe v3 file"));
        }

        let salt: [u8; SALT_LENGTH] = reader.array("salt")?;
        let iterations = u32::from_le_bytes(reader.array("iteration count")?);
        if iterations < MIN_ITERATIONS {
            return Err(SafeError::format(format!(
                "iteration count {} is below the minimum of {}",
                iterations, MIN_ITERATIONS
            )));
        }
        let stored_hash: [u8; KEY_LENGTH] = reader.array("password verification hash")?;

        debug!(iterations, "stretching password");
        let stretched = stretch_key(password, &salt, iterations);
        if let Err(err) = verify_password(&stretched, &stored_hash) {
            warn!("password verification failed");
            return Err(err);
        }

        let wrapped: [u8; WRAPPED_KEYS_LENGTH] = reader.array("wrapped keys")?;
        let (encryption, authentication) = unwrap_keys(&stretched, &wrapped)?;
        let iv: [u8; IV_LENGTH] = reader.array("initialization vector")?;

        let ciphertext = read_ciphertext(&mut reader)?;
        let stored_tag: [u8; TAG_LENGTH] = reader.array("integrity tag")?;
        if reader.remaining() > 0 {
            warn!(trailing = reader.remaining(), "ignoring data after the integrity tag");
        }
        debug!(ciphertext_len = ciphertext.len(), "decrypting");

        let plaintext = decrypt(&encryption, &iv, &ciphertext)?;
        let (header_section, record_sections) = read_sections(&plaintext)?;

        // Authenticate before interpreting any value
        let mut mac = IntegrityMac::new(&authentication)?;
        let all_fields = header_section
            .fields
            .iter()
            .chain(record_sections.iter().flat_map(|s| s.fields.iter()));
        for field in all_fields {
            mac.update(&field.data);
        }
        if let Err(err) = mac.verify(&stored_tag) {
            warn!("integrity tag mismatch");
            return Err(err);
        }

        let header = decode_header(&header_section.fields)?;
        let mut records = HashMap::with_capacity(record_sections.len());
        for (index, section) in record_sections.iter().enumerate() {
            let record = decode_record(&section.fields, options.require_mandatory_fields)?;
            if records.insert(record.title.clone(), record).is_some() {
                warn!(index, "duplicate record title, keeping the later record");
            }
        }
        debug!(records = records.len(), "decoded database");

        Ok(Database {
            format: &V3Format,
            salt,
            iterations,
            keys: KeySet {
                stretched,
                encryption,
                authentication,
            },
            iv,
            header,
            integrity_tag: stored_tag,
            records,
            save_path: None,
        })
    }

    fn encode(&self, db: &Database, saved_at: DateTime<Utc>) -> Result<Encoded> {
        let mut titles: Vec<&String> = db.records.keys().collect();
        titles.sort();

        let mut fields: Vec<Field> = encode_header(&db.header, saved_at);
        for title in titles {
            fields.extend(encode_record(&db.records[title]));
        }

        let mut plaintext = Zeroizing::new(Vec::new());
        let mut mac = IntegrityMac::new(&db.keys.authentication)?;
        for field in &fields {
            write_field_into(&mut plaintext, field.kind, &field.data)?;
            mac.update(&field.data);
        }
        let tag = mac.finalize();

        let iv = generate_iv();
        let ciphertext = encrypt(&db.keys.encryption, &iv, &plaintext)?;
        let wrapped = wrap_keys(
            &db.keys.stretched,
            &db.keys.encryption,
            &db.keys.authentication,
        )?;

        let mut out = Vec::with_capacity(
            PREAMBLE_LENGTH + ciphertext.len() + EOF_MARKER.len() + TAG_LENGTH,
        );
        out.extend_from_slice(MAGIC_V3);
        out.extend_from_slice(&db.salt);
        out.extend_from_slice(&db.iterations.to_le_bytes());
        out.extend_from_slice(&verification_hash(&db.keys.stretched));
        out.extend_from_slice(&wrapped);
        out.extend_from_slice(&iv);
        out.extend_from_slice(&ciphertext);
        out.extend_from_slice(EOF_MARKER);
        out.extend_from_slice(&tag);

        debug!(
            records = db.records.len(),
            bytes = out.len(),
            "encoded database"
        );
        Ok(Encoded {
            bytes: out,
            iv,
            integrity_tag: tag,
        })
    }
}
