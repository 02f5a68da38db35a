//! Reversible run-code scheme with a 64-word list.
//! Code format: <DIFF>-<WORD><NN>, e.g., NM-PHOBOS42, IN-CUPOLA07

use crate::difficulty::Difficulty;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for run codes
pub const WORD_LIST: [&str; 64] = [
    "PHOBOS", "DEIMOS", "OLYMPUS", "VALLES", "THARSIS", "ELYSIUM", "UTOPIA", "ARCADIA", "HELLAS",
    "ARGYRE", "CYDONIA", "GUSEV", "JEZERO", "MERIDNI", "SYRTIS", "TEMPE", "CUPOLA", "AIRLOCK",
    "HABITAT", "TRANSIT", "ORBIT", "LANDER", "ROVER", "CAPSULE", "THRUST", "APOGEE", "PERIGEE",
    "DOCKING", "TETHER", "VISOR", "SUIT", "RATION", "COMMS", "UPLINK", "BEACON", "RELAY",
    "COHESN", "MORALE", "STRESS", "FATIGUE", "CONNECT", "SUPPORT", "CONSOLE", "MODULE", "GALLEY",
    "BUNK", "CIRCADN", "MONOTNY", "DEBRIEF", "ROTATE", "TRIAGE", "STEADY", "DRIFT", "SIGNAL",
    "SILENCE", "HORIZON", "CRATER", "DUNES", "BASALT", "CANYON", "POLAR", "EQUATOR", "SUNRISE",
    "VOYAGE",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

const fn difficulty_prefix(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Normal => "NM",
        Difficulty::Hard => "HD",
        Difficulty::VeryHard => "VH",
        Difficulty::Impossible => "IM",
        Difficulty::Insane => "IN",
    }
}

fn parse_prefix(prefix: &str) -> Option<Difficulty> {
    match prefix.to_ascii_uppercase().as_str() {
        "NM" => Some(Difficulty::Normal),
        "HD" => Some(Difficulty::Hard),
        "VH" => Some(Difficulty::VeryHard),
        "IM" => Some(Difficulty::Impossible),
        "IN" => Some(Difficulty::Insane),
        _ => None,
    }
}

fn compose_seed(difficulty: Difficulty, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 10];
    buf[..6].copy_from_slice(b"MARSB-");
    buf[6] = difficulty as u8;
    buf[7] = (packed & 0xFF) as u8;
    buf[8] = (packed >> 8) as u8;
    buf[9] = 0xA5;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

#[must_use]
pub fn encode_friendly(difficulty: Difficulty, seed: u64) -> String {
    let prefix = difficulty_prefix(difficulty);
    let packed = (seed & 0xFFFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST.get(wi as usize).copied().unwrap_or("PHOBOS");
    if nn > 99 {
        nn %= 100;
    }
    format!("{prefix}-{word}{nn:02}")
}

#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(Difficulty, u64)> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    let difficulty = parse_prefix(prefix)?;
    if rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    let seed = compose_seed(difficulty, wi, nn);
    Some((difficulty, seed))
}

#[must_use]
pub fn generate_code_from_entropy(difficulty: Difficulty, entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    let seed = compose_seed(difficulty, wi, nn);
    encode_friendly(difficulty, seed)
}
