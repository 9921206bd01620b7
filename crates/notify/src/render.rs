//! Message texts and inline keyboards for every chat flow.
//!
//! Both the bot and the HTTP relay render through this module so a user
//! sees one consistent voice regardless of which side of the system
//! produced the message. All texts use Telegram Markdown.

use ledgeguard_core::contract::{self, ContractInfo, ProtectionReceipt};
use ledgeguard_core::deeplink::SignedLink;
use ledgeguard_core::position::Position;
use ledgeguard_core::risk::RiskLevel;

use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback-data prefix for "activate protection" buttons.
pub const CALLBACK_PROTECT_PREFIX: &str = "protect_";

/// Callback-data prefix for "view details" buttons.
pub const CALLBACK_DETAILS_PREFIX: &str = "details_";

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Traffic-light emoji for a risk level.
pub fn risk_emoji(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "\u{1F534}",     // red circle
        RiskLevel::Elevated => "\u{1F7E1}", // yellow circle
        RiskLevel::Low => "\u{1F7E2}",      // green circle
    }
}

/// Format a USD amount with thousands separators and two decimals,
/// e.g. `10,000.00`.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac:02}")
}

/// Format a fraction as a whole percentage, e.g. `0.85` -> `85%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

// ---------------------------------------------------------------------------
// Bot command texts
// ---------------------------------------------------------------------------

/// `/start` welcome card.
pub fn welcome() -> String {
    "\u{1F6E1} *Welcome to Ledgeguard!*\n\n\
     I'm your personal lending protection assistant. I keep an eye on \
     your positions and help shield them from liquidation.\n\n\
     *Available Commands:*\n\
     \u{2022} /status - Check your position health\n\
     \u{2022} /alert - Preview a liquidation risk alert\n\
     \u{2022} /contract - View the SafetyVault contract\n\
     \u{2022} /demo - See a demo protection result\n\
     \u{2022} /ping - Connection test\n\n\
     Stay safe! \u{1F680}"
        .to_string()
}

/// `/status` with no open positions.
pub fn no_positions() -> String {
    "\u{1F4CA} *Position Status*\n\n\
     No active lending positions found.\n\n\
     Connect your wallet to start using the lending markets!"
        .to_string()
}

/// `/status` overview: one traffic-light line per position.
pub fn status_overview(positions: &[Position]) -> String {
    let mut text = String::from("\u{1F4CA} *Your Lending Positions*\n\n");
    for p in positions {
        text.push_str(&format!(
            "{} *{}*: ${}\n   Risk: {} | Health: {:.2}\n\n",
            risk_emoji(p.risk_level()),
            p.asset,
            format_usd(p.amount),
            format_percent(p.risk_score),
            p.health_factor,
        ));
    }
    text
}

/// Keyboard for `/status`: a protect button per eligible position, or
/// `None` when nothing qualifies.
pub fn status_keyboard(positions: &[Position]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<_> = positions
        .iter()
        .filter(|p| p.needs_protection())
        .map(|p| {
            vec![InlineKeyboardButton::callback(
                format!("\u{1F6E1} Activate Protection - {}", p.asset),
                format!("{CALLBACK_PROTECT_PREFIX}{}", p.id),
            )]
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}

/// Detail card for one position.
pub fn position_details(position: &Position, contract: &ContractInfo) -> String {
    format!(
        "\u{1F4CA} *Position Details*\n\n\
         \u{1F3F7} ID: `{}`\n\
         \u{1F3AF} Asset: {}\n\
         \u{1F4B0} Collateral: ${}\n\
         \u{1F4B8} Debt: ${}\n\
         \u{1F4C8} LTV: {}\n\
         \u{1F525} Health Factor: {:.2}\n\
         \u{26A1} Liquidation Price: ${:.3}\n\n\
         \u{1F6E1} SafetyVault: {}",
        position.id,
        position.asset,
        format_usd(position.collateral),
        format_usd(position.debt),
        format_percent(position.ltv),
        position.health_factor,
        position.liquidation_price,
        contract.status,
    )
}

/// Keyboard for the detail card: a single protect button.
pub fn details_keyboard(position_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single(InlineKeyboardButton::callback(
        "\u{1F6E1} Activate Protection",
        format!("{CALLBACK_PROTECT_PREFIX}{position_id}"),
    ))
}

/// `/contract` info card.
pub fn contract_card(info: &ContractInfo) -> String {
    format!(
        "\u{1F517} *SafetyVault Contract Info*\n\n\
         *Contract:*\n`{}`\n\n\
         *Network:* {}\n\
         *Version:* {}\n\n\
         This contract protects your lending positions through automated \
         safety actions.",
        info.contract_id, info.network, info.version,
    )
}

// ---------------------------------------------------------------------------
// Alert and protection flow texts
// ---------------------------------------------------------------------------

/// Liquidation-risk alert pushed for a high-risk position.
pub fn liquidation_alert(position: &Position, contract: &ContractInfo) -> String {
    format!(
        "\u{26A0} *Liquidation Risk Alert*\n\n\
         \u{1F3AF} Position: {}\n\
         \u{1F4CA} Risk Score: {}\n\
         \u{1F4B0} Amount: ${}\n\
         \u{1F525} Health Factor: {:.2}\n\n\
         \u{26A1} *Action Required* - Your position is at risk of liquidation!\n\
         \u{1F6E1} SafetyVault: `{}`",
        position.asset,
        format_percent(position.risk_score),
        format_usd(position.amount),
        position.health_factor,
        contract::short_contract_id(contract.contract_id),
    )
}

/// Keyboard for the alert: protect + details on one row.
pub fn alert_keyboard(position_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            "\u{1F6E1} Activate Protection",
            format!("{CALLBACK_PROTECT_PREFIX}{position_id}"),
        ),
        InlineKeyboardButton::callback(
            "\u{1F4CA} View Details",
            format!("{CALLBACK_DETAILS_PREFIX}{position_id}"),
        ),
    ]])
}

/// Confirmation shown after a protect button press, pointing at the
/// deep link. An unsigned fallback link is called out so the user (and
/// the front-end) can tell it apart from a signed one.
pub fn protection_activated(link: &SignedLink) -> String {
    let security_line = if link.is_signed() {
        "\u{2705} Secure HMAC-signed deep link generated"
    } else {
        "\u{26A0} Unsigned demo link - signing is currently unavailable"
    };

    format!(
        "\u{1F6E1} *Protection Activated!*\n\n\
         {}\n\
         \u{1F510} Position: `{}`\n\
         \u{1F464} User: `{}`\n\n\
         Tap below to open the Ledgeguard protection interface:",
        security_line, link.position_id, link.user_id,
    )
}

/// Keyboard for [`protection_activated`]: a single open-app URL button.
/// The link is embedded verbatim; nothing here re-derives or edits it.
pub fn open_app_keyboard(link: &SignedLink) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single(InlineKeyboardButton::url(
        "\u{1F6E1} Open Protection App",
        link.url(),
    ))
}

/// `/demo` canned protection result, rendered from a vault receipt.
pub fn demo_result(receipt: &ProtectionReceipt, new_health: f64) -> String {
    let tx_hash = &receipt.tx_hash;
    format!(
        "\u{26A0} *DEMO: Protection Applied*\n\
         \u{1F517} TX: `{}...`\n\
         \u{1F195} Health Factor: *{:.2}*\n\n\
         \u{1F6E1} {}",
        &tx_hash[..16.min(tx_hash.len())],
        new_health,
        receipt.message,
    )
}

/// Terminal success notification relayed after protection executed.
pub fn protection_success(position_id: &str, tx_hash: &str, new_health: f64) -> String {
    format!(
        "\u{2705} *Position Protected!*\n\n\
         \u{2022} Position: `{position_id}`\n\
         \u{2022} TX Hash: `{tx_hash}`\n\
         \u{2022} New Health Factor: `{new_health:.2}`"
    )
}

/// Keyboard linking a transaction hash to the block explorer.
pub fn explorer_keyboard(tx_hash: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single(InlineKeyboardButton::url(
        "View Transaction",
        contract::explorer_tx_url(tx_hash),
    ))
}

/// Apology shown when a callback blows up mid-handling.
pub fn callback_error() -> String {
    "\u{274C} An error occurred while processing your request. Please try again.".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ledgeguard_core::deeplink::DeeplinkService;
    use ledgeguard_core::position::PositionStore;
    use url::Url;

    fn demo_position() -> Position {
        PositionStore::new().position_details("XLM-123")
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(10_000.0), "10,000.00");
        assert_eq!(format_usd(8_500.0), "8,500.00");
        assert_eq!(format_usd(999.5), "999.50");
        assert_eq!(format_usd(1_234_567.891), "1,234,567.89");
        assert_eq!(format_usd(0.0), "0.00");
    }

    #[test]
    fn percent_formatting_rounds_to_whole() {
        assert_eq!(format_percent(0.85), "85%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn status_overview_shows_traffic_light_and_amount() {
        let text = status_overview(&[demo_position()]);
        assert!(text.contains("\u{1F534}"), "high risk renders red");
        assert!(text.contains("*XLM*: $10,000.00"));
        assert!(text.contains("Risk: 85% | Health: 1.15"));
    }

    #[test]
    fn status_keyboard_only_offers_eligible_positions() {
        let mut safe = demo_position();
        safe.risk_score = 0.3;
        assert!(status_keyboard(&[safe]).is_none());

        let keyboard = status_keyboard(&[demo_position()]).expect("high risk gets a button");
        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.callback_data.as_deref(), Some("protect_XLM-123"));
    }

    #[test]
    fn details_card_lists_core_figures() {
        let text = position_details(&demo_position(), &contract::contract_info());
        assert!(text.contains("`XLM-123`"));
        assert!(text.contains("Collateral: $10,000.00"));
        assert!(text.contains("Debt: $8,500.00"));
        assert!(text.contains("LTV: 85%"));
        assert!(text.contains("Liquidation Price: $0.095"));
    }

    #[test]
    fn protection_activated_distinguishes_unsigned_links() {
        let base = Url::parse("http://localhost:3000").unwrap();

        let signed_svc = DeeplinkService::new(base.clone(), Some("topsecret".into()));
        let signed = signed_svc.issue("XLM-123", "555000111");
        assert!(protection_activated(&signed).contains("HMAC-signed"));

        let degraded_svc = DeeplinkService::new(base, None);
        let unsigned = degraded_svc.issue("XLM-123", "555000111");
        assert!(protection_activated(&unsigned).contains("Unsigned demo link"));
    }

    #[test]
    fn open_app_keyboard_embeds_link_verbatim() {
        let svc = DeeplinkService::new(
            Url::parse("http://localhost:3000").unwrap(),
            Some("topsecret".into()),
        );
        let link = svc.issue("XLM-123", "555000111");
        let keyboard = open_app_keyboard(&link);
        assert_eq!(
            keyboard.inline_keyboard[0][0].url.as_deref(),
            Some(link.url())
        );
    }

    #[test]
    fn success_text_carries_receipt_fields() {
        let text = protection_success("XLM-123", "d1f2a3b4", 1.85);
        assert!(text.contains("`XLM-123`"));
        assert!(text.contains("`d1f2a3b4`"));
        assert!(text.contains("`1.85`"));
    }

    #[test]
    fn explorer_keyboard_points_at_testnet_explorer() {
        let keyboard = explorer_keyboard("cafebabe");
        assert_eq!(
            keyboard.inline_keyboard[0][0].url.as_deref(),
            Some("https://stellar.expert/explorer/testnet/tx/cafebabe")
        );
    }

    #[test]
    fn demo_result_truncates_the_hash_and_quotes_the_vault() {
        let receipt = contract::trigger_protection("XLM-123");
        let text = demo_result(&receipt, 1.85);
        assert!(text.contains("`stellar_tx_XLM-1...`"));
        assert!(text.contains("SafetyVault v2.0 protection activated"));
        assert!(text.contains("*1.85*"));
    }

    #[test]
    fn alert_text_and_keyboard_cover_both_actions() {
        let text = liquidation_alert(&demo_position(), &contract::contract_info());
        assert!(text.contains("Liquidation Risk Alert"));
        assert!(text.contains("Risk Score: 85%"));

        let keyboard = alert_keyboard("XLM-123");
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row[0].callback_data.as_deref(), Some("protect_XLM-123"));
        assert_eq!(row[1].callback_data.as_deref(), Some("details_XLM-123"));
    }
}
