//! Bounded byte search helpers

use memchr::memmem;

/// Read a little-endian u32 at `pos`
pub fn read_u32_le(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// First occurrence of `needle` in `data[start..end]`, as an absolute offset
pub fn find_in(data: &[u8], needle: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(data.len());
    if start >= end {
        return None;
    }
    memmem::find(&data[start..end], needle).map(|p| start + p)
}

/// Last occurrence of `needle` in `data[start..end]`, as an absolute offset
pub fn rfind_in(data: &[u8], needle: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(data.len());
    if start >= end {
        return None;
    }
    memmem::rfind(&data[start..end], needle).map(|p| start + p)
}

/// Every offset of `needle` in `data`
pub fn find_all(data: &[u8], needle: &[u8]) -> Vec<usize> {
    memmem::find_iter(data, needle).collect()
}

/// Strict ASCII slice as `&str`
pub fn ascii_str(bytes: &[u8]) -> Option<&str> {
    if bytes.is_ascii() {
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}

/// Read a u32 LE length followed by that many ASCII bytes, staying below `end`
pub fn read_prefixed_ascii(data: &[u8], pos: usize, end: usize) -> Option<(&str, usize)> {
    let len = read_u32_le(data, pos)? as usize;
    let start = pos + 4;
    let stop = start.checked_add(len)?;
    if stop > end.min(data.len()) {
        return None;
    }
    ascii_str(&data[start..stop]).map(|s| (s, stop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_le() {
        let data = [0x01, 0x02, 0x00, 0x00, 0xFF];
        assert_eq!(read_u32_le(&data, 0), Some(0x0201));
        assert_eq!(read_u32_le(&data, 2), None);
        assert_eq!(read_u32_le(&data, usize::MAX), None);
    }

    #[test]
    fn test_bounded_find() {
        let data = b"..abc....abc..";
        assert_eq!(find_in(data, b"abc", 0, data.len()), Some(2));
        assert_eq!(find_in(data, b"abc", 3, data.len()), Some(9));
        assert_eq!(find_in(data, b"abc", 3, 11), None);
        assert_eq!(rfind_in(data, b"abc", 0, data.len()), Some(9));
        assert_eq!(rfind_in(data, b"abc", 0, 9), Some(2));
        assert_eq!(find_in(data, b"abc", 20, 30), None);
    }

    #[test]
    fn test_read_prefixed_ascii() {
        let mut data = 5u32.to_le_bytes().to_vec();
        data.extend_from_slice(b"sword!");
        assert_eq!(read_prefixed_ascii(&data, 0, data.len()), Some(("sword", 9)));
        assert_eq!(read_prefixed_ascii(&data, 0, 8), None);

        let mut bad = 2u32.to_le_bytes().to_vec();
        bad.extend_from_slice(&[0xD0, 0x94]);
        assert_eq!(read_prefixed_ascii(&bad, 0, bad.len()), None);
    }
}
