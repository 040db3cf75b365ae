use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A duration written as `90`, `45s`, `10m`, `1h30m` or `30d`.
///
/// A trailing number without a unit counts as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut digits = String::new();
        let mut seen_number = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if digits.is_empty() {
                return Err(format!("Expected a number before '{}' in {:?}", c, s));
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| format!("Number too large in {:?}", s))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 60 * 60,
                'd' => 24 * 60 * 60,
                _ => return Err(format!("Invalid duration unit '{}' in {:?}", c, s)),
            };
            total = value
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| format!("Duration too large: {:?}", s))?;
            digits.clear();
            seen_number = true;
        }

        if !digits.is_empty() {
            let value: u64 = digits
                .parse()
                .map_err(|_| format!("Number too large in {:?}", s))?;
            total = total
                .checked_add(value)
                .ok_or_else(|| format!("Duration too large: {:?}", s))?;
            seen_number = true;
        }

        if !seen_number {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}

impl From<HumanDuration> for Duration {
    fn from(value: HumanDuration) -> Self {
        value.0
    }
}
