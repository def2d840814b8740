/// Reads a big-endian IEEE 754 single precision number.
///
/// ```
/// use grib_template_helpers::ieee_f32_from_be_bytes;
///
/// assert_eq!(ieee_f32_from_be_bytes(&[0x42, 0xc8, 0x00, 0x00]), Ok(100.0));
/// assert!(ieee_f32_from_be_bytes(&[0x42, 0xc8]).is_err());
/// ```
pub fn ieee_f32_from_be_bytes(bytes: &[u8]) -> Result<f32, &'static str> {
    let bytes: [u8; 4] = bytes
        .try_into()
        .map_err(|_| "IEEE 32-bit floating-point value must be 4 octets long")?;
    Ok(f32::from_be_bytes(bytes))
}

/// Writes a big-endian IEEE 754 single precision number.
pub fn ieee_f32_to_be_bytes(val: f32) -> [u8; 4] {
    val.to_be_bytes()
}
