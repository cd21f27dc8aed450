/// 文件校验值提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checksum {
    /// SHA-256，十六进制小写
    Sha256(String),
}

impl Checksum {
    /// 由十六进制字符串创建 SHA-256 校验值；大小写与首尾空白不敏感。
    pub fn sha256(hex: &str) -> Self {
        Self::Sha256(hex.trim().to_ascii_lowercase())
    }

    pub fn expected_hex(&self) -> &str {
        match self {
            Self::Sha256(hex) => hex,
        }
    }
}
