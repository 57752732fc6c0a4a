use chrono::Utc;
use rand::Rng;

const RANDOM_WIDTH: usize = 13;

/// Generates entry identifiers: a base-36 millisecond clock followed by a
/// fixed-width base-36 random suffix.
///
/// The clock part never goes backwards for a given generator, and the random
/// part keeps ids distinct within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_millis: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_millis = self.last_millis.max(now);

        let random: u64 = rand::thread_rng().gen();
        format!(
            "{}{:0>width$}",
            to_base36(self.last_millis),
            to_base36(random),
            width = RANDOM_WIDTH
        )
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
