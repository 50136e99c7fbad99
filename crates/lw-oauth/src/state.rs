//! CSRF state generation

use rand::{thread_rng, Rng};

/// Generate a random state string for CSRF protection.
///
/// Creates a 32-character random string using URL-safe characters
/// (A-Z, a-z, 0-9). Used when the host does not pin its own `auth_state`;
/// the provider echoes it on the redirect and the flow verifies the match.
pub fn generate_state() -> String {
    let mut rng = thread_rng();
    (0..32)
        .map(|_| {
            let idx = rng.gen_range(0..62);
            match idx {
                0..=25 => (b'A' + idx) as char,
                26..=51 => (b'a' + (idx - 26)) as char,
                _ => (b'0' + (idx - 52)) as char,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_state() {
        let state = generate_state();

        // Verify length (32 characters)
        assert_eq!(state.len(), 32);

        // Verify uses only allowed characters
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_state_uniqueness() {
        let state1 = generate_state();
        let state2 = generate_state();

        // Each call should generate different values
        assert_ne!(state1, state2);
    }

    #[test]
    fn test_state_randomness() {
        // Generate multiple states and verify they're all different
        let mut states = std::collections::HashSet::new();
        for _ in 0..100 {
            let state = generate_state();
            assert!(states.insert(state), "Generated duplicate state");
        }
        assert_eq!(states.len(), 100);
    }
}
