use crate::engine::error::{Error, Result};

// Helper to extract null-terminated byte strings, bytes past the first NUL are ignored
pub(crate) fn get_bytes(buf: &[u8]) -> &[u8] {
    let nul = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..nul]
}

// Helper to extract null-terminated strings for display
pub(crate) fn get_str(buf: &[u8]) -> String {
    String::from_utf8_lossy(get_bytes(buf)).into_owned()
}

// Helper to parse octal strings padded with NULs or spaces
pub(crate) fn parse_octal<T>(field: &'static str, buf: &[u8]) -> Result<T>
where
    T: num_traits::Num,
{
    let binding = String::from_utf8_lossy(buf);
    let s = binding.trim_matches(|c| c == char::from(0) || c == ' ');
    if s.is_empty() {
        return Ok(T::zero());
    }
    match T::from_str_radix(s, 8) {
        Ok(v) => Ok(v),
        Err(_) => Err(Error::InvalidOctal { field, value: s.to_string() }),
    }
}

// Helper to write a string, NUL padded
#[cfg(test)]
pub(crate) fn put_str(dst: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(dst.len());
    dst[..len].copy_from_slice(&bytes[..len]);
    dst[len..].fill(0);
}

// Helper to write octal numbers as zero padded, NUL terminated strings
#[cfg(test)]
pub(crate) fn put_octal<T: std::fmt::Octal>(dst: &mut [u8], value: T) {
    let s = format!("{:0width$o}", value, width = dst.len() - 1);
    let bytes = s.as_bytes();
    let len = bytes.len().min(dst.len() - 1);
    dst[..len].copy_from_slice(&bytes[..len]);
    dst[len] = b'\0';
}
