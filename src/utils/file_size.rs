pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Bytes below 1 KB, then KB and MB with one decimal.
    pub fn format_size(size: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * 1024;

        if size < KB {
            format!("{} B", size)
        } else if size < MB {
            format!("{:.1} KB", size as f64 / KB as f64)
        } else {
            format!("{:.1} MB", size as f64 / MB as f64)
        }
    }

    /// `R$ 1.234,56`
    pub fn format_brl(value: f64) -> String {
        let cents = (value.abs() * 100.0).round() as u64;
        let whole = (cents / 100).to_string();
        let mut grouped = String::new();
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}R$ {},{:02}", sign, grouped, cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(FileSizeUtils::format_size(1000), "1000 B");
        assert_eq!(FileSizeUtils::format_size(1536), "1.5 KB");
        assert_eq!(FileSizeUtils::format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn formats_currency() {
        assert_eq!(FileSizeUtils::format_brl(0.0), "R$ 0,00");
        assert_eq!(FileSizeUtils::format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(FileSizeUtils::format_brl(2_100_000.0), "R$ 2.100.000,00");
        assert_eq!(FileSizeUtils::format_brl(-8.999), "-R$ 9,00");
    }
}
