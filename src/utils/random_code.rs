use rand::Rng;
use rand::distr::Alphanumeric;

/// 邀请码字符集，去掉了容易混淆的 0/O、1/I/L
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub const INVITE_CODE_LENGTH: usize = 8;

/// 生成班级邀请码
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..INVITE_CODE_CHARSET.len());
            INVITE_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// 生成随机密码（种子管理员账号）
pub fn generate_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LENGTH);
            assert!(code.bytes().all(|b| INVITE_CODE_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn test_generate_password_length() {
        let pwd = generate_password(20);
        assert_eq!(pwd.chars().count(), 20);
        assert!(pwd.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
