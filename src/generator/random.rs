use rand::Rng;

use crate::model::ValueKind;

/// Full alphanumeric alphabet used for display names.
pub const ALPHANUMERIC: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Lowercase subset used for identifier tails.
pub const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Prefix shared by all generated identifiers. Guarantees the first character
/// is a letter, which the server's id rules require.
pub const IDENTIFIER_PREFIX: &str = "test";

const IDENTIFIER_TAIL: usize = 10;
const NAME_LENGTH: usize = 12;

/// Produce a random string of `len` characters drawn from `alphabet`.
///
/// Stateless: a fresh thread-local generator is used per call, so concurrent
/// test threads need no synchronization.
pub fn random_string(len: usize, alphabet: &[u8]) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Random identifier satisfying the server's id rules: starts with a letter,
/// alphanumeric only, well under the length ceiling.
pub fn identifier() -> String {
    format!(
        "{IDENTIFIER_PREFIX}{}",
        random_string(IDENTIFIER_TAIL, LOWER_ALPHANUMERIC)
    )
}

/// Random human-readable display name.
pub fn display_name() -> String {
    random_string(NAME_LENGTH, ALPHANUMERIC)
}

/// Fresh value for a parametrizable field of the given kind.
pub fn value_for(kind: ValueKind) -> String {
    match kind {
        ValueKind::Identifier => identifier(),
        ValueKind::Name => display_name(),
    }
}
