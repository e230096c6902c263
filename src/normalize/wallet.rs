//! Wallet list and transaction normalizers.

use serde_json::Value;

use crate::models::{WalletActivity, WalletBalance, WalletTransaction};
use crate::normalize::coerce::{pick, pick_str, to_amount, to_datetime, to_id};

/// Normalize the wallet list. Anything that is not an array is treated as
/// an empty list; the dashboard's summary shapes are handled separately by
/// the overview normalizer.
pub fn normalize_wallets(raw: Option<&Value>) -> Vec<WalletBalance> {
    raw.and_then(Value::as_array)
        .map(|wallets| {
            wallets
                .iter()
                .map(|wallet| WalletBalance {
                    id: to_id(wallet.get("id")).unwrap_or_default(),
                    currency: pick_str(wallet, &["currency"]),
                    available_balance: to_amount(wallet.get("availableBalance")),
                    pending_balance: to_amount(wallet.get("pendingBalance")),
                    status: pick_str(wallet, &["status"]).unwrap_or_else(|| "ACTIVE".to_string()),
                    created_at: to_datetime(wallet.get("createdAt")),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Normalize a wallet's transaction feed: `{wallet, transactions}` with a
/// legacy `entries` alias for the list.
pub fn normalize_wallet_activity(raw: Option<&Value>) -> WalletActivity {
    let Some(raw) = raw.filter(|value| value.is_object()) else {
        return WalletActivity::default();
    };

    let transactions = raw
        .get("transactions")
        .and_then(Value::as_array)
        .or_else(|| raw.get("entries").and_then(Value::as_array))
        .map(|list| list.iter().map(map_transaction).collect())
        .unwrap_or_default();

    WalletActivity {
        wallet: raw.get("wallet").filter(|value| !value.is_null()).cloned(),
        transactions,
    }
}

fn map_transaction(transaction: &Value) -> WalletTransaction {
    WalletTransaction {
        id: to_id(transaction.get("id")),
        tx_type: pick_str(transaction, &["type"]),
        direction: pick_str(transaction, &["direction"]),
        amount: to_amount(transaction.get("amount")),
        currency: pick_str(transaction, &["currency"]),
        status: pick_str(transaction, &["status"]),
        created_at: to_datetime(pick(transaction, &["createdAt", "date"])),
        related_type: pick_str(transaction, &["relatedType"]),
        related_id: to_id(transaction.get("relatedId")),
    }
}
