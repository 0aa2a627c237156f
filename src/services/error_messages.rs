//! Turns raw wallet, passkey and RPC error text into messages fit for users.

use serde::Serialize;

/// Broad class of a failure as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    UserRejected,
    InsufficientFunds,
    InsufficientFeeBalance,
    BlockhashExpired,
    SlippageExceeded,
    SimulationFailed,
    InvalidAddress,
    SessionExpired,
    Timeout,
    Network,
    Unknown,
}

impl ErrorCategory {
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::UserRejected => "The request was cancelled. Approve it with your passkey to continue.",
            ErrorCategory::InsufficientFunds => "Insufficient balance to complete this transaction.",
            ErrorCategory::InsufficientFeeBalance => "Not enough SOL to cover network fees.",
            ErrorCategory::BlockhashExpired => "The transaction took too long and expired. Please try again.",
            ErrorCategory::SlippageExceeded => "Price moved beyond your slippage tolerance. Try again or raise the tolerance.",
            ErrorCategory::SimulationFailed => "The transaction would fail on-chain and was not sent.",
            ErrorCategory::InvalidAddress => "The recipient address is not a valid Solana address.",
            ErrorCategory::SessionExpired => "Your session has expired. Please reconnect your wallet.",
            ErrorCategory::Timeout => "The request timed out. Please try again.",
            ErrorCategory::Network => "Network error. Check your connection and try again.",
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }
}

// Checked in order; the first substring found wins, so specific phrases sit
// above the generic ones they contain.
const RULES: &[(&str, ErrorCategory)] = &[
    ("user rejected", ErrorCategory::UserRejected),
    ("user denied", ErrorCategory::UserRejected),
    ("user cancelled", ErrorCategory::UserRejected),
    ("user canceled", ErrorCategory::UserRejected),
    ("notallowederror", ErrorCategory::UserRejected),
    ("the operation either timed out or was not allowed", ErrorCategory::UserRejected),
    ("insufficient funds for fee", ErrorCategory::InsufficientFeeBalance),
    ("insufficient lamports", ErrorCategory::InsufficientFeeBalance),
    ("insufficient funds", ErrorCategory::InsufficientFunds),
    ("insufficient balance", ErrorCategory::InsufficientFunds),
    ("blockhash not found", ErrorCategory::BlockhashExpired),
    ("block height exceeded", ErrorCategory::BlockhashExpired),
    ("blockhash expired", ErrorCategory::BlockhashExpired),
    ("slippage", ErrorCategory::SlippageExceeded),
    ("simulation failed", ErrorCategory::SimulationFailed),
    ("invalid public key", ErrorCategory::InvalidAddress),
    ("invalid address", ErrorCategory::InvalidAddress),
    ("session expired", ErrorCategory::SessionExpired),
    ("timed out", ErrorCategory::Timeout),
    ("timeout", ErrorCategory::Timeout),
    ("failed to fetch", ErrorCategory::Network),
    ("network", ErrorCategory::Network),
    ("econnrefused", ErrorCategory::Network),
];

/// Classifies raw error text by case-insensitive substring match.
pub fn classify_error(raw: &str) -> ErrorCategory {
    let lowered = raw.to_lowercase();
    RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Unknown)
}

/// Shorthand for `classify_error(raw).user_message()`.
pub fn user_message_for(raw: &str) -> &'static str {
    classify_error(raw).user_message()
}
