use chrono::{DateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_MIN: i64 = 60;
    pub const S_IN_5_MIN: i64 = Self::S_IN_MIN * 5;
    pub const S_IN_15_MIN: i64 = Self::S_IN_MIN * 15;
    pub const S_IN_H: i64 = Self::S_IN_MIN * 60;
    pub const S_IN_4_H: i64 = Self::S_IN_H * 4;
    pub const S_IN_D: i64 = Self::S_IN_H * 24;
    pub const STANDARD_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
}

pub fn now_unix_secs() -> i64 {
    Utc::now().timestamp()
}

pub fn epoch_sec_to_utc(epoch_sec: i64) -> String {
    // Used for display purposes
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => format!("@{epoch_sec}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_seconds() {
        assert_eq!(epoch_sec_to_utc(0), "1970-01-01 00:00:00");
        assert_eq!(epoch_sec_to_utc(TimeUtils::S_IN_D), "1970-01-02 00:00:00");
    }
}
