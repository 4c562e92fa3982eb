/// Size in kilobytes with three decimals and grouped thousands: `1,234.567`.
pub fn kilobytes(bytes: u64) -> String {
    grouped_fixed(bytes as f64 / 1024.0, 3)
}

/// Line count in thousands with three decimals: `12.345`.
pub fn kilolines(lines: u64) -> String {
    grouped_fixed(lines as f64 / 1000.0, 3)
}

/// Integer with grouped thousands: `1,234,567`.
pub fn grouped(n: u64) -> String {
    group_digits(&n.to_string())
}

fn grouped_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    match text.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&text),
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
