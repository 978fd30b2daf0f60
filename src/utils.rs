use chrono::{DateTime, Utc};

/// Round to 2 decimal places, the precision used throughout API responses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a timestamp as YYYY-MM-DD.
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Format a timestamp as YYYY-MM-DD HH:MM:SS.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Get the listen port from the FACADE_PORT environment variable, if set.
pub fn get_env_port() -> Option<u16> {
    std::env::var("FACADE_PORT").ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(16.666666), 16.67);
        assert_eq!(round2(5000.0), 5000.0);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn test_format_date() {
        let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(format_date(&time), "2023-11-14");
        assert_eq!(format_timestamp(&time), "2023-11-14 22:13:20");
    }
}
