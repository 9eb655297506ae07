use solana_sdk::native_token::LAMPORTS_PER_SOL;

pub fn lamports_to_sol(lamports: f64) -> f64 {
    lamports / LAMPORTS_PER_SOL as f64
}

/// Compact display form for token amounts.
///
/// `[1, 1e3)` keeps two decimals, `[1e3, 1e6)` is scaled to `K` with one
/// decimal, then `M`/`B`/`T` analogously; anything else (sub-unit values)
/// keeps three significant digits. Trailing zeros and a dangling decimal
/// point are stripped from the numeric part.
pub fn format_token_amount(n: f64) -> String {
    if (1.0..1e3).contains(&n) {
        strip_trailing_zeros(&format!("{:.2}", n))
    } else if (1e3..1e6).contains(&n) {
        format!("{}K", strip_trailing_zeros(&format!("{:.1}", n / 1e3)))
    } else if (1e6..1e9).contains(&n) {
        format!("{}M", strip_trailing_zeros(&format!("{:.1}", n / 1e6)))
    } else if (1e9..1e12).contains(&n) {
        format!("{}B", strip_trailing_zeros(&format!("{:.1}", n / 1e9)))
    } else if n >= 1e12 {
        format!("{}T", strip_trailing_zeros(&format!("{:.1}", n / 1e12)))
    } else {
        strip_trailing_zeros(&to_precision_3(n))
    }
}

/// Decimal expansion with three significant digits, like JS `toPrecision(3)`
/// for values below one.
fn to_precision_3(n: f64) -> String {
    if n == 0.0 {
        return "0.00".to_string();
    }
    let exponent = n.abs().log10().floor() as i32;
    let decimals = (2 - exponent).max(0) as usize;
    format!("{:.*}", decimals, n)
}

fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
