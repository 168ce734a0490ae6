//! Value transforms behind the built-in mask patterns.
//!
//! Every function is total: empty or oddly-shaped input yields a masked
//! (possibly empty) string, never a panic. Lengths are counted in chars.

use complimask_domain::constants::data_types;
use once_cell::sync::Lazy;
use regex::Regex;

use super::registry::PatternContext;

static COMPONENT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("valid component separator regex"));
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit run regex"));
static US_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid US date regex"));
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid ISO date regex"));
static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.[0-9]{1,3}\.[0-9]{1,3}$").expect("valid IPv4 regex")
});

const MIN_MASK_LEN: usize = 3;
const CARD_VISIBLE_TAIL: usize = 4;
const IPV6_MASKED_GROUPS: usize = 4;

fn stars(n: usize) -> String {
    "*".repeat(n)
}

fn digits_of(value: &str) -> Vec<char> {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn last_chars(chars: &[char], n: usize) -> String {
    chars[chars.len().saturating_sub(n)..].iter().collect()
}

/// The value unchanged.
pub fn identity(value: &str) -> String {
    value.to_string()
}

/// Replace every alphanumeric character, keeping separators.
pub fn mask_alphanumeric(value: &str) -> String {
    value.chars().map(|c| if c.is_alphanumeric() { '*' } else { c }).collect()
}

/// `*` for every character, at least three.
pub fn mask_all(value: &str) -> String {
    stars(value.chars().count().max(MIN_MASK_LEN))
}

/// Stars followed by the trailing `n` characters; all stars when the value
/// is not longer than `n`.
pub fn reveal_last(value: &str, n: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= n {
        return stars(chars.len());
    }
    format!("{}{}", stars(chars.len() - n), last_chars(&chars, n))
}

/// `***-**-6789` / `***-**-*789`, derived from digits only.
pub fn ssn_partial(value: &str, n: usize) -> String {
    let digits = digits_of(value);
    let tail = last_chars(&digits, n);
    if digits.len() >= 9 {
        format!("***-**-{}{}", stars(4usize.saturating_sub(n)), tail)
    } else {
        format!("***{tail}")
    }
}

/// Mask all digits except the trailing `n`, keeping separators.
pub fn digits_tail(value: &str, n: usize) -> String {
    let total = value.chars().filter(char::is_ascii_digit).count();
    if total == 0 {
        return reveal_last(value, n);
    }
    let hidden = total.saturating_sub(n);
    let mut seen = 0;
    value
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= hidden {
                    return '*';
                }
            }
            c
        })
        .collect()
}

/// Mask the local part except its trailing `n` characters; keep the domain.
pub fn email_partial(value: &str, n: usize) -> String {
    let Some((local, domain)) = value.split_once('@') else {
        return reveal_last(value, n);
    };
    let local_len = local.chars().count();
    let masked_local = if local_len <= n { stars(MIN_MASK_LEN) } else { reveal_last(local, n) };
    format!("{masked_local}@{domain}")
}

/// First digit and last four digits of a 13 to 19 digit card number;
/// 16-digit numbers are grouped in fours.
pub fn credit_card(value: &str) -> String {
    let digits = digits_of(value);
    if !(13..=19).contains(&digits.len()) {
        return stars(value.chars().count());
    }

    let mut masked = String::with_capacity(digits.len());
    masked.push(digits[0]);
    masked.push_str(&stars(digits.len() - 1 - CARD_VISIBLE_TAIL));
    masked.push_str(&last_chars(&digits, CARD_VISIBLE_TAIL));

    if digits.len() == 16 {
        let grouped: Vec<String> = masked
            .chars()
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|chunk| chunk.iter().collect())
            .collect();
        return grouped.join(" ");
    }
    masked
}

/// Mask the street number of `street, city, region` addresses; otherwise
/// every digit run.
pub fn address(value: &str) -> String {
    let parts: Vec<&str> = COMPONENT_SEPARATOR.split(value).collect();
    if parts.len() < 3 {
        return DIGIT_RUN.replace_all(value, "***").into_owned();
    }
    let street = DIGIT_RUN.replace_all(parts[0], "***").into_owned();
    std::iter::once(street)
        .chain(parts[1..].iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Mask the first name entirely and keep only the initial of later names.
pub fn name(value: &str) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [single] => initial_only(single),
        [first, rest @ ..] => std::iter::once(stars(first.chars().count()))
            .chain(rest.iter().map(|part| initial_only(part)))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn initial_only(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => format!("{first}{}", stars(chars.count())),
        None => String::new(),
    }
}

/// Keep the year of ASCII `MM/DD/YYYY` and `YYYY-MM-DD` dates; otherwise
/// mask every numeric character, including non-ASCII digits.
pub fn date(value: &str) -> String {
    if US_DATE.is_match(value) {
        if let Some(year) = value.get(6..) {
            return format!("**/**/{year}");
        }
    }
    if ISO_DATE.is_match(value) {
        if let Some(year) = value.get(..4) {
            return format!("{year}-**-**");
        }
    }
    value.chars().map(|c| if c.is_numeric() { '*' } else { c }).collect()
}

/// Keep the first two IPv4 octets or all but the last four IPv6 groups.
pub fn ip_address(value: &str) -> String {
    if let Some(caps) = IPV4.captures(value) {
        return format!("{}.{}.***.**", &caps[1], &caps[2]);
    }
    if value.contains(':') {
        let groups: Vec<&str> = value.split(':').collect();
        let keep = groups.len().saturating_sub(IPV6_MASKED_GROUPS);
        return groups
            .iter()
            .enumerate()
            .map(|(i, group)| if i < keep { *group } else { "****" })
            .collect::<Vec<_>>()
            .join(":");
    }
    stars(value.chars().count())
}

/// Data-type aware `MaskAll`.
pub fn mask_all_for(value: &str, context: &PatternContext) -> String {
    match context.data_type.as_str() {
        data_types::SSN | data_types::PHONE | data_types::CREDIT_CARD => mask_alphanumeric(value),
        _ => mask_all(value),
    }
}

/// Data-type aware partial reveal of the trailing `n` characters.
pub fn partial_for(value: &str, context: &PatternContext, n: usize) -> String {
    match context.data_type.as_str() {
        data_types::SSN => ssn_partial(value, n),
        data_types::PHONE | data_types::CREDIT_CARD => digits_tail(value, n),
        data_types::EMAIL => email_partial(value, n),
        _ => reveal_last(value, n),
    }
}
