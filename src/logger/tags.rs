/// Log tags, one per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Session,
    Wallet,
    Tokens,
    Router,
    Swap,
    System,
}

impl LogTag {
    /// Key used by `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::Session => "session",
            LogTag::Wallet => "wallet",
            LogTag::Tokens => "tokens",
            LogTag::Router => "router",
            LogTag::Swap => "swap",
            LogTag::System => "system",
        }
        .to_string()
    }

    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::Session => "SESSION",
            LogTag::Wallet => "WALLET",
            LogTag::Tokens => "TOKENS",
            LogTag::Router => "ROUTER",
            LogTag::Swap => "SWAP",
            LogTag::System => "SYSTEM",
        }
    }

    pub fn from_debug_key(key: &str) -> Option<Self> {
        match key {
            "session" => Some(LogTag::Session),
            "wallet" => Some(LogTag::Wallet),
            "tokens" => Some(LogTag::Tokens),
            "router" => Some(LogTag::Router),
            "swap" => Some(LogTag::Swap),
            "system" => Some(LogTag::System),
            _ => None,
        }
    }
}
