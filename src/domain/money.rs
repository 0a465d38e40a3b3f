use std::fmt;

/// Amounts are integer cents so that sums never drift.
/// A positive amount is money coming in, a negative amount is money going out.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 8550 -> "85.50", -1499 -> "-14.99"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents the way the dashboard tables show money: currency symbol,
/// thousands separators, sign in front.
/// Example: -350000 -> "-$3,500.00"
pub fn format_currency(cents: Cents, symbol: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}.{:02}", sign, symbol, grouped, abs_cents % 100)
}

/// Parse a decimal string into cents, rounding to the nearest cent.
/// Example: "85.50" -> 8550, "12.5" -> 1250, "-3500" -> -350000, "0.125" -> 13
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::OutOfRange)?
    };

    let mut fraction = 0i64;
    for (i, digit) in decimal_str.chars().take(2).enumerate() {
        let value = i64::from(digit as u8 - b'0');
        fraction += if i == 0 { value * 10 } else { value };
    }
    // Third decimal decides rounding
    if let Some(next) = decimal_str.chars().nth(2) {
        if next >= '5' {
            fraction += 1;
        }
    }

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(ParseCentsError::OutOfRange)?;
    Ok(if negative { -cents } else { cents })
}

/// Convert a floating-point amount in currency units (as found in JSON
/// payloads) into cents.
pub fn cents_from_units(units: f64) -> Result<Cents, ParseCentsError> {
    if !units.is_finite() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let cents = (units * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return Err(ParseCentsError::OutOfRange);
    }
    Ok(cents as Cents)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
