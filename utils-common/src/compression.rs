use std::io::{self, Read};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

/// 魔数常量 - 用于标识快照文件格式
pub const MAGIC_BYTES: &[u8] = b"FOLIO";

/// 当前支持的最高主版本号
pub const CURRENT_MAJOR_VERSION: u8 = 1;

/// 头部长度：魔数 + 版本号(2字节) + 原始数据大小(4字节)
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    std::io::Write::write_all(&mut encoder, &binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，使用当前最高版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, CURRENT_MAJOR_VERSION)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let (_, original_size) = read_header(data, max_version)?;

    // 头部长度不可信：预分配设上限，读取最多多读1字节以便发现超长数据
    let compressed = &data[HEADER_LEN..];
    let mut decompressed = Vec::with_capacity(original_size.min(compressed.len().saturating_mul(16)));
    GzDecoder::new(compressed)
        .take(original_size as u64 + 1)
        .read_to_end(&mut decompressed)?;

    if decompressed.len() != original_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
                    original_size, decompressed.len())
        ));
    }

    from_binary(&decompressed)
}

/// 验证压缩数据是否有效，返回版本号
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], io::Error> {
    read_header(data, CURRENT_MAJOR_VERSION).map(|(version, _)| version)
}

// 解析并校验头部，返回版本号和原始数据大小
fn read_header(data: &[u8], max_version: u8) -> Result<([u8; 2], usize), io::Error> {
    if data.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("数据太短，无法解析: {} 字节", data.len())
        ));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "无效的文件格式：魔数不匹配"
        ));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("不支持的版本: {}.{}", version[0], version[1])
        ));
    }

    let size_offset = version_offset + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..size_offset + 4]);

    Ok((version, u32::from_le_bytes(size_bytes) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentItem, ContentSnapshot};
    use chrono::{TimeZone, Utc};

    fn snapshot() -> ContentSnapshot {
        let mut item = ContentItem::new("p1", "Hello");
        item.tags = vec!["rust".to_string()];
        item.published_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        ContentSnapshot {
            collection: "posts".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            items: vec![item, ContentItem::new("p2", "Undated")],
        }
    }

    #[test]
    fn compressed_snapshot_keeps_items() {
        let data = to_compressed(&snapshot(), [1, 0]).unwrap();
        assert_eq!(validate_compressed_data(&data).unwrap(), [1, 0]);

        let restored: ContentSnapshot = from_compressed(&data).unwrap();
        assert_eq!(restored.items, snapshot().items);
        assert_eq!(restored.collection, "posts");
    }

    #[test]
    fn rejects_short_or_foreign_data() {
        assert!(validate_compressed_data(b"FOL").is_err());

        let mut data = to_compressed(&snapshot(), [1, 0]).unwrap();
        data[0] = b'X';
        let err = from_compressed::<ContentSnapshot>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_newer_major_version() {
        let data = to_compressed(&snapshot(), [2, 0]).unwrap();
        assert!(from_compressed::<ContentSnapshot>(&data).is_err());
        assert!(from_compressed_with_max_version::<ContentSnapshot>(&data, 2).is_ok());
    }

    #[test]
    fn huge_declared_size_is_an_error_not_an_allocation() {
        let mut data = MAGIC_BYTES.to_vec();
        data.extend_from_slice(&[1, 0]);
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(b"garbage");

        assert!(from_compressed::<ContentSnapshot>(&data).is_err());
    }

    #[test]
    fn stream_longer_than_declared_size_is_rejected() {
        let mut data = to_compressed(&snapshot(), [1, 0]).unwrap();
        let size_offset = MAGIC_BYTES.len() + 2;
        data[size_offset..size_offset + 4].copy_from_slice(&4u32.to_le_bytes());

        let err = from_compressed::<ContentSnapshot>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut data = to_compressed(&snapshot(), [1, 0]).unwrap();
        let size_offset = MAGIC_BYTES.len() + 2;
        data[size_offset] = data[size_offset].wrapping_add(1);
        assert!(from_compressed::<ContentSnapshot>(&data).is_err());
    }
}
