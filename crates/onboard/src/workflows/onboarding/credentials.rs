use rand::seq::SliceRandom;
use rand::thread_rng;

const PASSWORD_LENGTH: usize = 10;
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `first.last@domain`, lowercased with non-alphanumerics stripped. Single
/// word names get the `emp` placeholder surname so the address still has
/// two parts.
pub fn derive_work_email(full_name: &str, domain: &str) -> String {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().map(sanitize).unwrap_or_default();
    let last = parts
        .last()
        .map(sanitize)
        .filter(|part| !part.is_empty())
        .unwrap_or_else(|| "emp".to_string());
    let first = if first.is_empty() {
        "emp".to_string()
    } else {
        first
    };
    format!("{first}.{last}@{domain}")
}

/// Ten characters drawn uniformly from letters, digits, and `!@#$%`.
pub fn generate_password() -> String {
    let mut rng = thread_rng();
    (0..PASSWORD_LENGTH)
        .map(|_| {
            let byte = PASSWORD_CHARSET
                .choose(&mut rng)
                .copied()
                .unwrap_or(b'x');
            byte as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_email_uses_first_and_last_name() {
        assert_eq!(
            derive_work_email("Asha Rao", "unity.com"),
            "asha.rao@unity.com"
        );
    }

    #[test]
    fn middle_names_are_skipped() {
        assert_eq!(
            derive_work_email("Asha Kumari Rao", "unity.com"),
            "asha.rao@unity.com"
        );
    }

    #[test]
    fn punctuation_and_case_are_normalized() {
        assert_eq!(
            derive_work_email("  O'Neil   D'Souza ", "unity.com"),
            "oneil.dsouza@unity.com"
        );
    }

    #[test]
    fn single_word_names_get_placeholder_surname() {
        assert_eq!(derive_work_email("Madonna", "unity.com"), "madonna.emp@unity.com");
    }

    #[test]
    fn password_has_expected_length_and_charset() {
        for _ in 0..50 {
            let password = generate_password();
            assert_eq!(password.len(), PASSWORD_LENGTH);
            assert!(password
                .bytes()
                .all(|b| PASSWORD_CHARSET.contains(&b)));
        }
    }
}
