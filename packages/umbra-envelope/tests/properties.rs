//! Property-based tests for padding and the envelope round trip.

use proptest::prelude::*;
use umbra_envelope::padding::{calc_padded_len, pad, unpad, MAX_PLAINTEXT_SIZE, MIN_PADDED_LEN};
use umbra_envelope::{
    decrypt, decrypt_with_conversation_key, encrypt, encrypt_with_salt, ConversationKey, Salt,
    SecretKey,
};

fn secret_strategy() -> impl Strategy<Value = SecretKey> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |bytes| {
        SecretKey::from_bytes(&bytes).ok()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn padded_len_covers_and_is_monotonic(n in 1usize..=MAX_PLAINTEXT_SIZE) {
        let padded = calc_padded_len(n);
        prop_assert!(padded >= n);
        prop_assert!(padded >= MIN_PADDED_LEN);
        prop_assert_eq!(padded % 32, 0);
        if n < MAX_PLAINTEXT_SIZE {
            prop_assert!(calc_padded_len(n + 1) >= padded);
        }
    }

    #[test]
    fn padded_len_covers_any_length(n in any::<usize>()) {
        prop_assert!(calc_padded_len(n) >= n);
    }

    #[test]
    fn pad_then_unpad(text in "\\PC{1,300}") {
        let padded = pad(&text).unwrap();
        prop_assert_eq!(padded.len(), 2 + calc_padded_len(text.len()));
        prop_assert_eq!(unpad(&padded).unwrap(), text);
    }

    #[test]
    fn conversation_key_is_symmetric(a in secret_strategy(), b in secret_strategy()) {
        let ab = ConversationKey::derive(&a, &b.public_key());
        let ba = ConversationKey::derive(&b, &a.public_key());
        prop_assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn peers_round_trip(
        a in secret_strategy(),
        b in secret_strategy(),
        text in "\\PC{1,200}",
    ) {
        let payload = encrypt(&a, &b.public_key(), &text).unwrap();
        prop_assert_eq!(decrypt(&b, &a.public_key(), &payload).unwrap(), text);
    }

    #[test]
    fn fixed_salt_round_trip(
        key in any::<[u8; 32]>(),
        salt in any::<[u8; 32]>(),
        text in "\\PC{1,500}",
    ) {
        let key = ConversationKey::from_bytes(key);
        let payload = encrypt_with_salt(&key, &text, Salt::from_bytes(salt)).unwrap();
        prop_assert_eq!(decrypt_with_conversation_key(&key, &payload).unwrap(), text);
    }

    #[test]
    fn arbitrary_text_never_panics(payload in "[A-Za-z0-9+/=#]{0,400}") {
        let key = ConversationKey::from_bytes([1u8; 32]);
        let _ = decrypt_with_conversation_key(&key, &payload);
    }
}
