//! 数量字符串解析
//!
//! GitHub 页面上的 star/fork 数以人类可读形式出现（"1.5k"、"2m"、"1,234"），
//! 这里统一转换为整数。页面标记不是可信的数据格式，任何解析失败都降级为 0
//! 而不是向上传播错误。

/// 将可能带单位后缀的数量字符串转换为整数
///
/// - `None` 或空串 → 0
/// - `"1.5k"` → 1500，`"2m"` → 2000000
/// - `"1,234"` → 1234
/// - 无法解析的内容 → 0
pub fn parse_number(text: Option<&str>) -> u64 {
    let raw = match text {
        Some(s) => s.trim().to_lowercase(),
        None => return 0,
    };
    if raw.is_empty() {
        return 0;
    }

    if raw.contains('k') {
        scaled(&raw.replace('k', ""), 1_000.0)
    } else if raw.contains('m') {
        scaled(&raw.replace('m', ""), 1_000_000.0)
    } else {
        raw.replace(',', "").parse::<u64>().unwrap_or(0)
    }
}

fn scaled(text: &str, factor: f64) -> u64 {
    match text.parse::<f64>() {
        Ok(value) if value >= 0.0 => (value * factor) as u64,
        _ => 0,
    }
}
