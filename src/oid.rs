//! ObjectId

use std::{
    fmt,
    str::FromStr,
    sync::{
        LazyLock,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use rand::{Rng, random};

use crate::error::{Error, Result};

const TIMESTAMP_SIZE: usize = 4;
const PROCESS_ID_SIZE: usize = 5;

const TIMESTAMP_OFFSET: usize = 0;
const PROCESS_ID_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const COUNTER_OFFSET: usize = PROCESS_ID_OFFSET + PROCESS_ID_SIZE;

const MAX_U24: usize = 0xFF_FFFF;

static OID_COUNTER: LazyLock<AtomicUsize> =
    LazyLock::new(|| AtomicUsize::new(rand::rng().random_range(0..=MAX_U24)));

static PROCESS_UNIQUE: LazyLock<[u8; PROCESS_ID_SIZE]> = LazyLock::new(random);

/// A wrapper around a raw 12-byte ObjectId.
///
/// In extended JSON an `ObjectId` is written as `{"$oid":"<24 hex digits>"}` or, in shell mode,
/// as `ObjectId("<24 hex digits>")`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ObjectId {
    id: [u8; 12],
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        Self { id: bytes }
    }
}

impl ObjectId {
    /// Generates a new [`ObjectId`] from the current time, a per-process random value and an
    /// incrementing counter.
    pub fn new() -> ObjectId {
        let timestamp = ObjectId::gen_timestamp();
        let process_id = *PROCESS_UNIQUE;
        let counter = ObjectId::gen_count();

        let mut buf: [u8; 12] = [0; 12];
        buf[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET].copy_from_slice(&timestamp);
        buf[PROCESS_ID_OFFSET..COUNTER_OFFSET].copy_from_slice(&process_id);
        buf[COUNTER_OFFSET..].copy_from_slice(&counter);

        ObjectId::from_bytes(buf)
    }

    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Creates an ObjectId from a 24-character hexadecimal string.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();

        let bytes: Vec<u8> =
            hex::decode(s.as_bytes()).map_err(|e| Error::from_hex_error(e, s.len()))?;
        let byte_array: [u8; 12] = bytes
            .try_into()
            .map_err(|_| Error::oid_invalid_length(s.len()))?;
        Ok(ObjectId::from_bytes(byte_array))
    }

    /// Retrieves the timestamp, in seconds since the Unix epoch, stored in the first four
    /// bytes.
    pub fn timestamp_secs(&self) -> u32 {
        let mut buf = [0; 4];
        buf.copy_from_slice(&self.id[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET]);
        u32::from_be_bytes(buf)
    }

    /// Returns the raw byte representation of an ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Convert this [`ObjectId`] to its lowercase hex string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }

    fn gen_timestamp() -> [u8; 4] {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        // Truncated to four bytes like every other driver.
        (secs as u32).to_be_bytes()
    }

    fn gen_count() -> [u8; 3] {
        counter_bytes(OID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

// Mod the fetched value rather than the counter itself so concurrent callers never observe a
// value past MAX_U24.
fn counter_bytes(u_counter: usize) -> [u8; 3] {
    let u = u_counter % (MAX_U24 + 1);
    let buf = (u as u64).to_be_bytes();
    [buf[5], buf[6], buf[7]]
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}
