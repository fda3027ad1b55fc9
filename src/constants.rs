/// 用于隐写载荷长度的比特数。
/// 长度以 `u64` 形式、最高位在前写入载体的前 64 个槽位。
pub const LENGTH_PREFIX_BITS: u32 = 64;

/// 载荷中单个字节占用的比特数 (槽位数)。
pub const BITS_PER_BYTE: u32 = 8;

/// 一个强度值可用的位平面数 (0 = 最低有效位, 7 = 最高有效位)。
pub const BIT_PLANES: u8 = 8;

/// 有损格式的扩展名。写入这些格式会破坏低位数据，因此输出会被改写为 PNG。
pub const LOSSY_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// 能原样保存单通道 / 双通道灰度图像的无损格式。
/// 其他格式的输出会先把灰度载体扩展为 RGB / RGBA，再进行隐写。
pub const GRAY_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// 隐写图像的默认输出扩展名 (无损)。
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// 恢复出的载荷的默认扩展名。
pub const DEFAULT_PAYLOAD_EXTENSION: &str = "bin";

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const ENCODED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
