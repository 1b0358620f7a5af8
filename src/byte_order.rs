//! Helpers for explicit little-endian conversions.
//!
//! Every integer field in an MBIM message is a little-endian `u32`. These
//! helpers keep the conversion points in one place and never index out of
//! bounds: reads report a short slice as `None` and patches report whether the
//! field was present.

/// Width in bytes of every integer field on the wire.
pub const FIELD_SIZE: usize = 4;

/// Parse the little-endian `u32` starting at `offset`.
///
/// Returns `None` when `bytes` does not hold four bytes at that position.
///
/// # Examples
///
/// ```
/// use mbimwire::byte_order::read_le_u32;
///
/// assert_eq!(read_le_u32(&[0x78, 0x56, 0x34, 0x12], 0), Some(0x1234_5678));
/// assert_eq!(read_le_u32(&[0x78, 0x56, 0x34], 0), None);
/// ```
#[must_use]
pub fn read_le_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(FIELD_SIZE)?;
    let field: [u8; FIELD_SIZE] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u32::from_le_bytes(field))
}

/// Serialise a `u32` in little-endian byte order.
///
/// # Examples
///
/// ```
/// use mbimwire::byte_order::write_le_u32;
///
/// assert_eq!(write_le_u32(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u32(value: u32) -> [u8; FIELD_SIZE] { value.to_le_bytes() }

/// Overwrite the little-endian `u32` starting at `offset` in place.
///
/// Returns `false`, leaving `bytes` untouched, when the field does not fit.
#[must_use]
pub fn patch_le_u32(bytes: &mut [u8], offset: usize, value: u32) -> bool {
    let Some(end) = offset.checked_add(FIELD_SIZE) else {
        return false;
    };
    match bytes.get_mut(offset..end) {
        Some(field) => {
            field.copy_from_slice(&write_le_u32(value));
            true
        }
        None => false,
    }
}
