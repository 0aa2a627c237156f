use base64::{engine::general_purpose, Engine as _};
use lazorkey::{DeviceFingerprint, LocalEncryptor};

const CHROME_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

fn device(platform: &str) -> LocalEncryptor {
    LocalEncryptor::with_iterations(DeviceFingerprint::new(CHROME_MAC, platform), 1_000)
}

fn flip_ciphertext_byte(payload: &str, index: usize) -> String {
    let parts: Vec<&str> = payload.split('.').collect();
    let mut ciphertext = general_purpose::STANDARD.decode(parts[2]).unwrap();
    ciphertext[index] ^= 0x01;
    format!("{}.{}.{}", parts[0], parts[1], general_purpose::STANDARD.encode(ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_on_the_same_device() {
        let enc = device("MacIntel");
        let long = "x".repeat(4096);
        for plaintext in ["", "a", "credential-id-123", "ünïcödé ✓", long.as_str()] {
            let payload = enc.encrypt(plaintext).unwrap();
            assert_eq!(enc.decrypt(&payload).as_deref(), Some(plaintext));
        }
    }

    #[test]
    fn round_trips_with_default_iterations() {
        let enc = LocalEncryptor::new(DeviceFingerprint::new(CHROME_MAC, "MacIntel"));
        let payload = enc.encrypt("passkey-credential").unwrap();
        assert_eq!(enc.decrypt(&payload).as_deref(), Some("passkey-credential"));
    }

    #[test]
    fn fresh_iv_and_salt_every_time() {
        let enc = device("MacIntel");
        let a = enc.encrypt("same").unwrap();
        let b = enc.encrypt("same").unwrap();
        assert_ne!(a, b);

        let a_parts: Vec<&str> = a.split('.').collect();
        let b_parts: Vec<&str> = b.split('.').collect();
        assert_ne!(a_parts[0], b_parts[0]);
        assert_ne!(a_parts[1], b_parts[1]);
    }

    #[test]
    fn other_device_gets_none() {
        let payload = device("MacIntel").encrypt("credential").unwrap();
        assert_eq!(device("Win32").decrypt(&payload), None);

        let other_agent = LocalEncryptor::with_iterations(DeviceFingerprint::new("curl/8.0", "MacIntel"), 1_000);
        assert_eq!(other_agent.decrypt(&payload), None);
    }

    #[test]
    fn any_flipped_ciphertext_byte_gets_none() {
        let enc = device("MacIntel");
        let payload = enc.encrypt("credential").unwrap();
        let len = general_purpose::STANDARD
            .decode(payload.split('.').nth(2).unwrap())
            .unwrap()
            .len();

        for index in 0..len {
            assert_eq!(enc.decrypt(&flip_ciphertext_byte(&payload, index)), None, "byte {}", index);
        }
    }

    #[test]
    fn malformed_payloads_get_none() {
        let enc = device("MacIntel");
        for payload in ["not.a.validpayload", "", "...", "onlyone", "a.b", "!!!.###.$$$"] {
            assert_eq!(enc.decrypt(payload), None, "payload {:?}", payload);
        }
    }
}
