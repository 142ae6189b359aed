//! 不透明标识生成
//!
//! 标识 = 秒级本地时间戳 + 4 位小写字母/数字随机后缀，如
//! `g-20250901-143022-x7k9`。低熵后缀意味着碰撞概率小但非零，
//! 存储层在落盘前检查目标是否已存在并有限重试。

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 4;

/// 生成带前缀的不透明标识
pub fn new_id(prefix: &str) -> String {
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}{ts}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_prefix_and_suffix_shape() {
        let id = new_id("g-");
        assert!(id.starts_with("g-"));
        // g- + YYYYmmdd-HHMMSS + - + 4 位后缀
        assert_eq!(id.len(), 2 + 15 + 1 + SUFFIX_LEN);
        let suffix = &id[id.len() - SUFFIX_LEN..];
        assert!(
            suffix
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn empty_prefix_is_allowed() {
        let id = new_id("");
        assert_eq!(id.len(), 15 + 1 + SUFFIX_LEN);
    }
}
