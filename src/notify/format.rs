//! Telegram HTML rendering of screening results.

use chrono::{DateTime, FixedOffset};

use crate::models::instrument::AssetClass;
use crate::models::signal::{ScreeningResult, TradeSignal};

/// Optional fiat conversion line appended to crypto signals.
#[derive(Debug, Clone, PartialEq)]
pub struct FxConversion {
    /// Units of the local currency per USD.
    pub rate: f64,
    pub symbol: String,
}

impl FxConversion {
    pub fn new(rate: f64, symbol: impl Into<String>) -> Self {
        Self {
            rate,
            symbol: symbol.into(),
        }
    }
}

/// `Entry | TP1 | TP2 | SL` recovered from a rendered signal block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLine {
    pub entry: f64,
    pub target1: f64,
    pub target2: f64,
    pub stop: f64,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// `1_250_000.0` -> `1.25M`
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        return format!("{value:.0}");
    };
    format!("{scaled:.2}{suffix}")
}

/// Display precision per asset class: equities use two decimals, crypto up
/// to eight with trailing zeros trimmed.
pub fn format_price(price: f64, asset_class: AssetClass) -> String {
    let raw = match asset_class {
        AssetClass::Equities => format!("{price:.2}"),
        AssetClass::Crypto => {
            let fixed = format!("{price:.8}");
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    };
    match raw.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&raw),
    }
}

/// Short zone name for the timestamp line.
pub fn zone_label(offset: &FixedOffset) -> String {
    match offset.local_minus_utc() {
        25_200 => "WIB".to_string(),
        28_800 => "WITA".to_string(),
        32_400 => "WIT".to_string(),
        0 => "UTC".to_string(),
        _ => format!("UTC{offset}"),
    }
}

fn timestamp(now: &DateTime<FixedOffset>) -> String {
    format!("{} {}", now.format("%d-%b-%Y %H:%M"), zone_label(now.offset()))
}

fn price_line(signal: &TradeSignal, asset_class: AssetClass) -> String {
    let prefix = match asset_class {
        AssetClass::Equities => "",
        AssetClass::Crypto => "$",
    };
    format!(
        "🎯 Entry: {p}{} | TP1: {p}{} | TP2: {p}{} | SL: {p}{}",
        format_price(signal.entry, asset_class),
        format_price(signal.target1, asset_class),
        format_price(signal.target2, asset_class),
        format_price(signal.stop, asset_class),
        p = prefix,
    )
}

/// Recover the price levels from the first `Entry:` line of `block`.
pub fn parse_price_line(block: &str) -> Option<PriceLine> {
    let line = block.lines().find(|l| l.contains("Entry:"))?;
    let mut values = line.split('|').map(|field| {
        let (_, value) = field.split_once(':')?;
        let cleaned: String = value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        cleaned.parse::<f64>().ok()
    });

    Some(PriceLine {
        entry: values.next()??,
        target1: values.next()??,
        target2: values.next()??,
        stop: values.next()??,
    })
}

fn indicator_summary(signal: &TradeSignal) -> Option<String> {
    let set = signal.indicators.as_ref()?;
    let mut parts = Vec::new();

    if let Some(rsi) = set.rsi14 {
        parts.push(format!("RSI {rsi:.0}"));
    }
    if let (Some(fast), Some(slow)) = (set.ema20, set.ema50) {
        parts.push(format!("EMA {}", if fast > slow { "✅" } else { "⚠️" }));
    }
    if let (Some(line), Some(signal_line)) = (set.macd, set.macd_signal) {
        parts.push(format!("MACD {}", if line > signal_line { "✅" } else { "⚠️" }));
    }
    if let Some(fg) = &set.fear_greed {
        parts.push(format!("FG: {} ({})", fg.value, escape_html(&fg.classification)));
    }
    if let Some(rate) = set.funding_rate {
        parts.push(format!("Funding {rate:.4}%"));
    }

    (!parts.is_empty()).then(|| format!("🔍 Indicators: {}", parts.join(" | ")))
}

fn equity_block(signal: &TradeSignal) -> String {
    let mut block = format!("💡 <b>{}</b>\n", escape_html(&signal.symbol));
    block.push_str(&format!("📈 {}\n", escape_html(&signal.label)));
    block.push_str(&price_line(signal, AssetClass::Equities));
    block.push('\n');
    block.push_str(&format!(
        "📊 Volume: {} | Change: {:+.2}%",
        group_thousands(signal.volume),
        signal.change_pct
    ));
    if let Some(cap) = signal.market_cap {
        block.push_str(&format!(" | MCap: Rp {}", compact(cap)));
    }
    block.push('\n');
    block
}

fn crypto_block(signal: &TradeSignal, fx: Option<&FxConversion>) -> String {
    let name = signal.name.as_deref().unwrap_or(&signal.symbol);
    let mut block = format!(
        "💎 <b>{}</b> - {}\n",
        escape_html(&signal.symbol),
        escape_html(name)
    );
    block.push_str(&format!("📈 {}\n", escape_html(&signal.label)));
    block.push_str(&price_line(signal, AssetClass::Crypto));
    block.push('\n');

    if let Some(fx) = fx {
        block.push_str(&format!(
            "💱 {s} {} | {s} {} | {s} {} | {s} {}\n",
            group_thousands((signal.entry * fx.rate).round() as u64),
            group_thousands((signal.target1 * fx.rate).round() as u64),
            group_thousands((signal.target2 * fx.rate).round() as u64),
            group_thousands((signal.stop * fx.rate).round() as u64),
            s = escape_html(&fx.symbol),
        ));
    }

    block.push_str(&format!(
        "📊 Vol: ${} | 24h: {:+.1}%",
        compact(signal.volume as f64),
        signal.change_pct
    ));
    if let Some(cap) = signal.market_cap {
        block.push_str(&format!(" | MCap: ${}", compact(cap)));
    }
    block.push('\n');

    if let Some(summary) = indicator_summary(signal) {
        block.push_str(&summary);
        block.push('\n');
    }
    if !signal.indicator_labels.is_empty() {
        let labels: Vec<String> = signal
            .indicator_labels
            .iter()
            .take(3)
            .map(|l| escape_html(l))
            .collect();
        block.push_str(&format!("📉 {}\n", labels.join(", ")));
    }
    block
}

pub fn format_equity_alert(
    session: &str,
    result: &ScreeningResult,
    now: &DateTime<FixedOffset>,
) -> String {
    let mut message = format!("📊 <b>Update {}</b>\n🕐 {}\n", escape_html(session), timestamp(now));

    if result.signals.is_empty() {
        message.push_str("\nNo equities met the screening criteria today.");
        return message;
    }

    message.push_str(&format!("{}\n\n", escape_html(result.method.describe())));
    for signal in &result.signals {
        message.push_str(&equity_block(signal));
        message.push('\n');
    }
    message.push_str("#scalptrix #IDX");
    message
}

pub fn format_crypto_alert(
    session: &str,
    result: &ScreeningResult,
    now: &DateTime<FixedOffset>,
    fx: Option<&FxConversion>,
) -> String {
    let mut message = format!(
        "🪙 <b>Crypto Update {}</b>\n🕐 {}\n",
        escape_html(session),
        timestamp(now)
    );

    if result.signals.is_empty() {
        message.push_str("\nNo crypto assets met the screening criteria today.");
        return message;
    }

    message.push_str(&format!("{}\n", escape_html(result.method.describe())));
    if let Some(fx) = fx {
        message.push_str(&format!(
            "💱 Rate: 1 USD = {} {}\n",
            escape_html(&fx.symbol),
            group_thousands(fx.rate.round() as u64)
        ));
    }
    message.push('\n');

    for signal in &result.signals {
        message.push_str(&crypto_block(signal, fx));
        message.push('\n');
    }
    message.push_str("#scalptrix #crypto");
    message
}

/// Dispatch on the result's asset class.
pub fn format_alert(
    session: &str,
    result: &ScreeningResult,
    now: &DateTime<FixedOffset>,
    fx: Option<&FxConversion>,
) -> String {
    match result.asset_class {
        AssetClass::Equities => format_equity_alert(session, result, now),
        AssetClass::Crypto => format_crypto_alert(session, result, now, fx),
    }
}

pub fn format_webhook_alert(symbol: &str, signal: &str, now: &DateTime<FixedOffset>) -> String {
    format!(
        "⚡ <b>TradingView Alert</b>\n\n📊 {}\n📈 {}\n\n🕐 {}",
        escape_html(symbol),
        escape_html(signal),
        timestamp(now)
    )
}

pub fn format_test_message(now: &DateTime<FixedOffset>) -> String {
    format!(
        "🧪 <b>Test Message</b>\n\nscalptrix is up and able to reach Telegram.\n\n🕐 {}",
        timestamp(now)
    )
}
