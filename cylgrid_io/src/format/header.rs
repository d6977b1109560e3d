//! Container file header definition.

/// Magic bytes for container files.
pub const CYLG_MAGIC: [u8; 4] = *b"CYLG";

/// Current format version.
pub const FORMAT_VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Container file header.
///
/// Layout (16 bytes total):
/// - Bytes 0-3: Magic "CYLG"
/// - Bytes 4-5: version (u16 LE)
/// - Bytes 6-7: flags (u16 LE, reserved)
/// - Bytes 8-15: reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Magic bytes "CYLG".
    pub magic: [u8; 4],
    /// Format version.
    pub version: u16,
    /// Flags (reserved for future use).
    pub flags: u16,
    /// Reserved bytes.
    pub reserved: [u8; 8],
}

impl ContainerHeader {
    /// Header for the current format version.
    pub fn new() -> Self {
        Self {
            magic: CYLG_MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            reserved: [0; 8],
        }
    }

    /// Validate the magic bytes and version.
    pub fn is_valid(&self) -> bool {
        self.magic == CYLG_MAGIC && self.version == FORMAT_VERSION
    }

    /// Serialize the header to a byte array.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.reserved);

        bytes
    }

    /// Deserialize a header from a byte array.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[8..16]);

        Self {
            magic,
            version,
            flags,
            reserved,
        }
    }
}

impl Default for ContainerHeader {
    fn default() -> Self {
        Self::new()
    }
}
