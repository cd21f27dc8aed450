//! 响应头解析：文件名与文件大小。

use percent_encoding::percent_decode_str;
use url::Url;

use crate::internal::downloader::structs::download_error::DownloadError;

/// 既没有 `Content-Disposition` 也无法从 URL 取到文件名时使用的文件名
pub const FALLBACK_FILE_NAME: &str = "unknown";

/// 按 `Content-Disposition` → URL 最后一段 → [`FALLBACK_FILE_NAME`] 的顺序确定文件名。
pub fn resolve_file_name(content_disposition: Option<&str>, url: &Url) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .and_then(|name| sanitize_file_name(&name))
        .or_else(|| file_name_from_url(url))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// 取 `Content-Disposition` 中的文件名；`filename*`（RFC 5987）优先于 `filename`。
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    // 第一段是 disposition 类型（attachment / inline），跳过
    for param in split_params(header).into_iter().skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => extended = decode_ext_value(value),
            "filename" => plain = Some(unquote(value)),
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

/// URL 路径最后一段（已 percent-decode），如 `/files/test.txt` => `test.txt`
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    let decoded = percent_decode_str(last).decode_utf8_lossy();
    sanitize_file_name(&decoded)
}

/// 只保留最后一级文件名，`.` / `..` / 空白视为无效，避免写出下载目录。
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('\0');
    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_string()),
    }
}

/// 从 `Content-Range`（如 `bytes 0-0/1001`）取总大小；`*` 或为空表示未知。
pub fn parse_content_range_total(value: Option<&str>) -> Result<Option<u64>, DownloadError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let total = match value.rfind('/') {
        Some(index) => value[index + 1..].trim(),
        None => "",
    };
    if total.is_empty() || total == "*" {
        return Ok(None);
    }
    total
        .parse::<u64>()
        .map(Some)
        .map_err(|_| DownloadError::InvalidHeader {
            header: "Content-Range",
            value: value.to_string(),
        })
}

pub fn parse_content_length(value: Option<&str>) -> Result<Option<u64>, DownloadError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| DownloadError::InvalidHeader {
            header: "Content-Length",
            value: value.to_string(),
        })
}

/// 按 `;` 切分参数，引号内的 `;` 不切分。
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(header[start..].trim());
    params
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => value.to_string(),
    }
}

/// `UTF-8''na%C3%AFve.txt` => `naïve.txt`
fn decode_ext_value(value: &str) -> Option<String> {
    let value = unquote(value);
    let (_charset_lang, encoded) = value.split_once("''")?;
    let decoded = percent_decode_str(encoded).decode_utf8().ok()?;
    Some(decoded.into_owned())
}
