//! Markup Fragments
//!
//! String builders shared by the views. Every piece of API-provided text
//! goes through [`text`] or [`attr`] before it lands in markup.

use chrono::{DateTime, Utc};
use std::borrow::Cow;

use crate::api::{Player, PlayerSummary, Transaction, TransactionType};

/// Escape text content
pub fn text(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

/// Escape a double-quoted attribute value
pub fn attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// Two decimals with thousands separators: `1,234.56`
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac)
}

/// Short date and time, `dd/mm/yy HH:MM:SS`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%y %H:%M:%S").to_string()
}

pub fn avatar_url(name: &str, size: u32) -> String {
    format!(
        "https://minotar.net/helm/{}/{}.png",
        urlencoding::encode(name),
        size
    )
}

/// Plain status line inside a region
pub fn message(s: &str) -> String {
    format!("<div>{}</div>", text(s))
}

pub fn error_message(s: &str) -> String {
    format!("<p class=\"text-red-500 text-center\">{}</p>", text(s))
}

pub fn navbar() -> String {
    r#"<header class="bg-gradient-to-r from-blue-900 via-blue-800 to-blue-900 text-white shadow-lg shadow-black/30">
  <div class="container mx-auto flex items-center justify-between p-4">
    <h1 class="text-2xl font-bold text-blue-100 select-none">Economy</h1>
    <nav class="flex-1 flex justify-center space-x-10">
      <a href="/" data-link class="text-blue-200 hover:text-white font-medium transition-colors duration-300">Dashboard</a>
      <a href="/players" data-link class="text-blue-200 hover:text-white font-medium transition-colors duration-300">Players</a>
    </nav>
  </div>
</header>"#
        .to_string()
}

/// Link card for the players grid
pub fn player_card(player: &PlayerSummary) -> String {
    let name = player.display_name();
    format!(
        r#"<a href="/player/{uuid}" data-link class="player-card flex items-center bg-gray-800 hover:bg-gray-700 text-gray-100 rounded-xl p-4 gap-4 w-full">
  <img src="{avatar}" class="w-20 h-20 rounded-lg flex-shrink-0"/>
  <h3 class="text-lg font-semibold truncate">{name}</h3>
</a>"#,
        uuid = player.uuid,
        avatar = attr(&avatar_url(&name, 600)),
        name = text(&name),
    )
}

pub fn player_cards<'a>(players: impl IntoIterator<Item = &'a PlayerSummary>) -> String {
    players.into_iter().map(player_card).collect()
}

pub fn balance_rows(player: &Player) -> String {
    player
        .balances
        .iter()
        .map(|(currency, amount)| {
            format!(
                r#"<tr class="border-b border-gray-700"><td class="px-4 py-2 font-medium text-blue-200">{}</td><td class="px-4 py-2 text-right text-gray-200">{}</td></tr>"#,
                text(currency),
                format_money(*amount)
            )
        })
        .collect()
}

fn type_class(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Deposit => "text-green-400",
        TransactionType::Withdraw => "text-red-400",
        TransactionType::Set | TransactionType::Other => "text-yellow-400",
    }
}

pub fn transaction_row(tx: &Transaction) -> String {
    let sign = if tx.kind == TransactionType::Withdraw { '-' } else { '+' };
    format!(
        r#"<tr class="border-b border-gray-700"><td class="px-3 py-2">{date}</td><td class="px-3 py-2 text-center {class}">{kind}</td><td class="px-3 py-2">{currency}</td><td class="px-3 py-2 text-right">{sign}{amount}</td></tr>"#,
        date = format_timestamp(&tx.timestamp),
        class = type_class(tx.kind),
        kind = tx.kind,
        currency = text(&tx.currency),
        sign = sign,
        amount = format_money(tx.amount),
    )
}

/// `<option>` list with one entry preselected
pub fn options<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: Option<&str>,
) -> String {
    entries
        .into_iter()
        .map(|(value, label)| {
            let mark = if Some(value) == selected { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                attr(value),
                mark,
                text(label)
            )
        })
        .collect()
}
