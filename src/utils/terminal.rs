/// Fallback width when the terminal size is unknown.
pub const DEFAULT_COLUMNS: usize = 80;

/// 終端機寬度：優先使用 `COLUMNS` 環境變數
pub fn columns() -> usize {
    parse_columns(std::env::var("COLUMNS").ok().as_deref())
}

fn parse_columns(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns() {
        assert_eq!(parse_columns(Some("120")), 120);
        assert_eq!(parse_columns(Some(" 40 ")), 40);
        assert_eq!(parse_columns(Some("0")), DEFAULT_COLUMNS);
        assert_eq!(parse_columns(Some("wide")), DEFAULT_COLUMNS);
        assert_eq!(parse_columns(None), DEFAULT_COLUMNS);
    }
}
