//! 时间戳解析
//!
//! 服务端的 `created_at` 可能带时区偏移（RFC 3339），
//! 也可能是数据库取出的无时区 ISO 字符串，这里统一按 UTC 处理。

use chrono::{DateTime, NaiveDateTime, Utc};

/// 解析服务端时间戳
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// 以 `YYYY-MM-DD` 显示日期，无法解析时原样返回
pub fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}
