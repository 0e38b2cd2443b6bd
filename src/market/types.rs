//! Core data types for the CLAIRON feed
//!
//! This module defines the records handed to presentation code:
//! - `Chain` / `ChainInfo`: Static reference table of source chains
//! - `Opportunity`: A synthetic convergence (arbitrage-style) bet
//! - `BridgeFlow`: A synthetic cross-chain transfer
//! - `ChainLoad`: Per-chain network share shown in the side panel
//! - `RiskTier` and `FlowStatus`: Classification enums

use serde::{Deserialize, Serialize};

/// Label of the market every opportunity and flow converges into
pub const TARGET_MARKET: &str = "CLAIRON";

/// Bet descriptions, cycled by opportunity index
pub const BET_POOL: [&str; 8] = [
    "BTC > $120k Q2 2025",
    "ETH staking yields > 8%",
    "SOL flips BNB mcap",
    "Fed rate cut March",
    "SpaceX Mars mission",
    "AI regulation passed",
    "Gold hits $3200",
    "DeFi TVL > $300B",
];

/// A source chain
///
/// Serialized by its display name ("Ethereum", "Polygon", ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Avalanche,
}

/// Display attributes of a chain
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain: Chain,
    pub name: &'static str,
    pub color: &'static str,
    pub abbr: &'static str,
}

/// The chain table, in declaration order
pub static CHAINS: [ChainInfo; 6] = [
    ChainInfo {
        chain: Chain::Ethereum,
        name: "Ethereum",
        color: "#ff9955",
        abbr: "ETH",
    },
    ChainInfo {
        chain: Chain::Polygon,
        name: "Polygon",
        color: "#b3502c",
        abbr: "MATIC",
    },
    ChainInfo {
        chain: Chain::Arbitrum,
        name: "Arbitrum",
        color: "#ffb45e",
        abbr: "ARB",
    },
    ChainInfo {
        chain: Chain::Optimism,
        name: "Optimism",
        color: "#ff6b35",
        abbr: "OP",
    },
    ChainInfo {
        chain: Chain::Base,
        name: "Base",
        color: "#c9a47a",
        abbr: "BASE",
    },
    ChainInfo {
        chain: Chain::Avalanche,
        name: "Avalanche",
        color: "#8b4513",
        abbr: "AVAX",
    },
];

impl Chain {
    /// Get all chains in declaration order
    pub fn all() -> [Chain; 6] {
        CHAINS.map(|info| info.chain)
    }

    /// Display attributes for this chain
    pub fn info(&self) -> &'static ChainInfo {
        // CHAINS is indexed by declaration order
        &CHAINS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Resolve a chain by exact display name
    pub fn from_name(name: &str) -> Option<Chain> {
        lookup_chain(name).map(|info| info.chain)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::from_name(s).ok_or_else(|| format!("Unknown chain: {}", s))
    }
}

impl ChainInfo {
    /// Two-letter badge shown next to a record ("ET", "MA", ...)
    pub fn badge(&self) -> &'static str {
        let end = self.abbr.len().min(2);
        &self.abbr[..end]
    }
}

/// Look up display attributes by exact chain name
///
/// Unknown names yield `None`; callers render them as an unknown chain.
pub fn lookup_chain(name: &str) -> Option<&'static ChainInfo> {
    CHAINS.iter().find(|info| info.name == name)
}

/// Risk tier of an opportunity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn all() -> &'static [RiskTier] {
        &[RiskTier::Low, RiskTier::Medium, RiskTier::High]
    }

    /// Badge color used by the opportunity cards
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#ff9955",
            RiskTier::Medium => "#c9a47a",
            RiskTier::High => "#b3502c",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Status of a bridge flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Active,
    Pending,
    Completed,
}

impl FlowStatus {
    /// Round-robin status for the flow at `index`
    pub fn for_index(index: usize) -> Self {
        const CYCLE: [FlowStatus; 3] = [
            FlowStatus::Active,
            FlowStatus::Pending,
            FlowStatus::Completed,
        ];
        CYCLE[index % CYCLE.len()]
    }

    /// Dot and badge color in the live bridges panel
    pub fn color(&self) -> &'static str {
        match self {
            FlowStatus::Active => "#ff9955",
            FlowStatus::Pending => "#c9a47a",
            FlowStatus::Completed => "#b3502c",
        }
    }
}

impl std::fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowStatus::Active => write!(f, "active"),
            FlowStatus::Pending => write!(f, "pending"),
            FlowStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A synthetic convergence opportunity
///
/// `sell_price > buy_price` holds by construction, so `spread` is always
/// positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Opportunity {
    /// Unique within one generated batch ("opp-0" ..)
    pub id: String,
    pub source_chain: Chain,
    pub target_market: String,
    pub bet: String,
    pub buy_price: f64,
    pub sell_price: f64,
    /// (sell - buy) / buy * 100
    pub spread: f64,
    /// Formatted as "$<n>K"
    pub volume: String,
    /// Formatted as "<n>h"
    pub time_left: String,
    /// In [70, 100)
    pub confidence: f64,
    pub risk: RiskTier,
}

impl Opportunity {
    /// Percentage gain from buying at `buy` and selling at `sell`
    pub fn spread_of(buy: f64, sell: f64) -> f64 {
        (sell - buy) / buy * 100.0
    }

    /// Display attributes of the source chain
    pub fn chain_info(&self) -> &'static ChainInfo {
        self.source_chain.info()
    }
}

/// A synthetic cross-chain transfer into the target market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeFlow {
    /// "flow-0" ..
    pub id: String,
    pub from: Chain,
    pub to: String,
    /// Formatted as "$<n.n>M"
    pub amount: String,
    pub status: FlowStatus,
    /// In [50, 350)
    pub latency_ms: u32,
}

/// Network share of a chain in the side panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainLoad {
    pub chain: Chain,
    /// In [20, 70)
    pub share_percent: f64,
    /// Fill width of the load bar, in [30, 80)
    pub bar_width_percent: f64,
}

/// Format a thousands-denominated volume as "$<n>K"
///
/// Halves round up, so 300.5 reads "$301K".
pub fn format_volume_k(value: f64) -> String {
    format!("${:.0}K", value.round())
}

/// Format a millions-denominated amount as "$<n.n>M"
///
/// Halves round up, so 2.25 reads "$2.3M".
pub fn format_amount_m(value: f64) -> String {
    format!("${:.1}M", (value * 10.0).round() / 10.0)
}

/// Format a whole number of hours as "<n>h"
pub fn format_hours(hours: u32) -> String {
    format!("{}h", hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_table_order() {
        let names: Vec<_> = CHAINS.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Ethereum", "Polygon", "Arbitrum", "Optimism", "Base", "Avalanche"]
        );
        for (i, chain) in Chain::all().iter().enumerate() {
            assert_eq!(chain.info().chain, *chain);
            assert_eq!(CHAINS[i].chain, *chain);
        }
    }

    #[test]
    fn test_lookup_chain() {
        let info = lookup_chain("Arbitrum").unwrap();
        assert_eq!(info.abbr, "ARB");
        assert_eq!(info.color, "#ffb45e");

        assert!(lookup_chain("arbitrum").is_none());
        assert!(lookup_chain("Solana").is_none());
        assert!(lookup_chain("").is_none());
    }

    #[test]
    fn test_chain_from_str() {
        assert_eq!("Base".parse::<Chain>().unwrap(), Chain::Base);
        assert!("Cosmos".parse::<Chain>().is_err());
    }

    #[test]
    fn test_badge() {
        assert_eq!(Chain::Polygon.info().badge(), "MA");
        assert_eq!(Chain::Optimism.info().badge(), "OP");
    }

    #[test]
    fn test_flow_status_cycle() {
        assert_eq!(FlowStatus::for_index(0), FlowStatus::Active);
        assert_eq!(FlowStatus::for_index(1), FlowStatus::Pending);
        assert_eq!(FlowStatus::for_index(2), FlowStatus::Completed);
        assert_eq!(FlowStatus::for_index(3), FlowStatus::Active);
        assert_eq!(FlowStatus::for_index(5), FlowStatus::Completed);
    }

    #[test]
    fn test_serialization_names() {
        assert_eq!(serde_json::to_string(&Chain::Avalanche).unwrap(), "\"Avalanche\"");
        assert_eq!(serde_json::to_string(&RiskTier::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&FlowStatus::Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_volume_k(123.4), "$123K");
        assert_eq!(format_volume_k(549.6), "$550K");
        assert_eq!(format_amount_m(3.14), "$3.1M");
        assert_eq!(format_hours(48), "48h");
    }

    #[test]
    fn test_formatting_rounds_halves_up() {
        assert_eq!(format_amount_m(2.25), "$2.3M");
        assert_eq!(format_amount_m(0.75), "$0.8M");
        assert_eq!(format_volume_k(300.5), "$301K");
        assert_eq!(format_volume_k(250.5), "$251K");
        assert_eq!(format_volume_k(50.0), "$50K");
    }

    #[test]
    fn test_spread_of() {
        let spread = Opportunity::spread_of(0.5, 0.6);
        assert!((spread - 20.0).abs() < 1e-9);
    }
}
