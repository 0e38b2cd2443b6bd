//! Snapshot Generator
//!
//! Builds the record set the dashboard renders for a whole session:
//! twelve opportunities ranked by spread, one bridge flow per chain, and the
//! network load figures for the side panel.
//!
//! Shape is fixed (cardinality, ranges, formats); values come from the
//! injected `RandomSource`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::types::{
    format_amount_m, format_hours, format_volume_k, BridgeFlow, Chain, ChainLoad, FlowStatus,
    Opportunity, RiskTier, BET_POOL, CHAINS, TARGET_MARKET,
};

/// Number of opportunities in a snapshot
pub const OPPORTUNITY_COUNT: usize = 12;

/// Number of chains listed in the network load panel
pub const NETWORK_LOAD_CHAINS: usize = 5;

/// Generate the opportunity batch, sorted by spread descending
pub fn generate_opportunities(rng: &mut dyn RandomSource) -> Vec<Opportunity> {
    let mut opportunities: Vec<Opportunity> = (0..OPPORTUNITY_COUNT)
        .map(|i| {
            let buy_price = rng.uniform(0.3, 0.7);
            let sell_price = buy_price + rng.uniform(0.05, 0.20);
            let volume = rng.uniform(50.0, 550.0);
            let hours = rng.floor_scaled(48.0, 1.0) as u32;
            let confidence = rng.uniform(70.0, 100.0);
            let risk = RiskTier::all()[rng.index(RiskTier::all().len())];

            Opportunity {
                id: format!("opp-{}", i),
                source_chain: CHAINS[i % CHAINS.len()].chain,
                target_market: TARGET_MARKET.to_string(),
                bet: BET_POOL[i % BET_POOL.len()].to_string(),
                buy_price,
                sell_price,
                spread: Opportunity::spread_of(buy_price, sell_price),
                volume: format_volume_k(volume),
                time_left: format_hours(hours),
                confidence,
                risk,
            }
        })
        .collect();

    // Stable: equal spreads keep index order
    opportunities.sort_by(|a, b| b.spread.total_cmp(&a.spread));
    opportunities
}

/// Generate one bridge flow per chain, in chain order
pub fn generate_bridge_flows(rng: &mut dyn RandomSource) -> Vec<BridgeFlow> {
    CHAINS
        .iter()
        .enumerate()
        .map(|(i, info)| {
            let amount = rng.uniform(1.0, 11.0);
            let latency_ms = rng.floor_scaled(300.0, 50.0) as u32;

            BridgeFlow {
                id: format!("flow-{}", i),
                from: info.chain,
                to: TARGET_MARKET.to_string(),
                amount: format_amount_m(amount),
                status: FlowStatus::for_index(i),
                latency_ms,
            }
        })
        .collect()
}

/// Generate network load figures for the first five chains
pub fn generate_network_loads(rng: &mut dyn RandomSource) -> Vec<ChainLoad> {
    CHAINS
        .iter()
        .take(NETWORK_LOAD_CHAINS)
        .map(|info| ChainLoad {
            chain: info.chain,
            share_percent: rng.uniform(20.0, 70.0),
            bar_width_percent: rng.uniform(30.0, 80.0),
        })
        .collect()
}

/// The immutable record set of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ranked by spread, highest first
    pub opportunities: Vec<Opportunity>,
    pub bridge_flows: Vec<BridgeFlow>,
    pub network_loads: Vec<ChainLoad>,
    /// Milliseconds since epoch
    pub generated_at: i64,
}

impl Snapshot {
    /// Generate a complete snapshot
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        let opportunities = generate_opportunities(rng);
        let bridge_flows = generate_bridge_flows(rng);
        let network_loads = generate_network_loads(rng);

        tracing::debug!(
            opportunities = opportunities.len(),
            bridge_flows = bridge_flows.len(),
            best_spread = opportunities.first().map(|o| o.spread).unwrap_or_default(),
            "Generated snapshot"
        );

        Self {
            opportunities,
            bridge_flows,
            network_loads,
            generated_at: Utc::now().timestamp_millis(),
        }
    }

    /// The `count` opportunities with the highest spread
    pub fn top_performers(&self, count: usize) -> &[Opportunity] {
        let end = count.min(self.opportunities.len());
        &self.opportunities[..end]
    }

    pub fn opportunity(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    pub fn flow_for(&self, chain: Chain) -> Option<&BridgeFlow> {
        self.bridge_flows.iter().find(|f| f.from == chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::random::{RngSource, SequenceSource};
    use std::collections::HashSet;

    #[test]
    fn test_opportunity_count_and_order() {
        for seed in 0..50 {
            let mut rng = RngSource::seeded(seed);
            let opportunities = generate_opportunities(&mut rng);

            assert_eq!(opportunities.len(), OPPORTUNITY_COUNT);
            for pair in opportunities.windows(2) {
                assert!(pair[0].spread >= pair[1].spread);
            }
        }
    }

    #[test]
    fn test_opportunity_invariants() {
        let mut rng = RngSource::seeded(1234);
        for _ in 0..20 {
            for opp in generate_opportunities(&mut rng) {
                assert!(opp.sell_price > opp.buy_price);
                assert!(opp.buy_price >= 0.3 && opp.buy_price < 0.7);
                assert!(opp.sell_price < 1.0);

                let expected = (opp.sell_price - opp.buy_price) / opp.buy_price * 100.0;
                assert!((opp.spread - expected).abs() < 1e-9);
                assert!(opp.spread > 0.0);

                assert!(opp.confidence >= 70.0 && opp.confidence < 100.0);
                assert_eq!(opp.target_market, TARGET_MARKET);
            }
        }
    }

    #[test]
    fn test_opportunity_formats() {
        let mut rng = RngSource::seeded(99);
        for opp in generate_opportunities(&mut rng) {
            let volume = opp
                .volume
                .strip_prefix('$')
                .and_then(|v| v.strip_suffix('K'))
                .unwrap();
            let volume: u32 = volume.parse().unwrap();
            assert!((50..=550).contains(&volume));

            let hours: u32 = opp.time_left.strip_suffix('h').unwrap().parse().unwrap();
            assert!((1..=48).contains(&hours));
        }
    }

    #[test]
    fn test_opportunity_ids_unique_and_chains_cycle() {
        let mut rng = RngSource::seeded(5);
        let opportunities = generate_opportunities(&mut rng);

        let ids: HashSet<_> = opportunities.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids.len(), OPPORTUNITY_COUNT);

        for opp in &opportunities {
            let index: usize = opp.id.strip_prefix("opp-").unwrap().parse().unwrap();
            assert_eq!(opp.source_chain, CHAINS[index % 6].chain);
            assert_eq!(opp.bet, BET_POOL[index % 8]);
        }
    }

    #[test]
    fn test_fixed_source_values() {
        // Every draw is 0.5
        let mut rng = SequenceSource::constant(0.5);
        let opportunities = generate_opportunities(&mut rng);

        let first = &opportunities[0];
        assert!((first.buy_price - 0.5).abs() < 1e-12);
        assert!((first.sell_price - 0.625).abs() < 1e-12);
        assert!((first.spread - 25.0).abs() < 1e-9);
        assert_eq!(first.volume, "$300K");
        assert_eq!(first.time_left, "25h");
        assert!((first.confidence - 85.0).abs() < 1e-12);
        assert_eq!(first.risk, RiskTier::Medium);

        // All spreads tie, so the stable sort keeps index order
        let ids: Vec<_> = opportunities.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids[0], "opp-0");
        assert_eq!(ids[11], "opp-11");
    }

    #[test]
    fn test_bridge_flows() {
        let mut rng = RngSource::seeded(3);
        let flows = generate_bridge_flows(&mut rng);

        assert_eq!(flows.len(), CHAINS.len());
        for (i, flow) in flows.iter().enumerate() {
            assert_eq!(flow.id, format!("flow-{}", i));
            assert_eq!(flow.from, CHAINS[i].chain);
            assert_eq!(flow.to, TARGET_MARKET);
            assert_eq!(flow.status, FlowStatus::for_index(i));
            assert!(flow.latency_ms >= 50 && flow.latency_ms < 350);

            let amount: f64 = flow
                .amount
                .strip_prefix('$')
                .and_then(|a| a.strip_suffix('M'))
                .unwrap()
                .parse()
                .unwrap();
            assert!((1.0..=11.0).contains(&amount));
        }
    }

    #[test]
    fn test_bridge_flow_status_cycle() {
        let mut rng = SequenceSource::constant(0.0);
        let statuses: Vec<_> = generate_bridge_flows(&mut rng)
            .into_iter()
            .map(|f| f.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                FlowStatus::Active,
                FlowStatus::Pending,
                FlowStatus::Completed,
                FlowStatus::Active,
                FlowStatus::Pending,
                FlowStatus::Completed,
            ]
        );
    }

    #[test]
    fn test_network_loads() {
        let mut rng = RngSource::seeded(11);
        let loads = generate_network_loads(&mut rng);

        assert_eq!(loads.len(), NETWORK_LOAD_CHAINS);
        assert_eq!(loads[0].chain, Chain::Ethereum);
        assert_eq!(loads[4].chain, Chain::Base);
        for load in &loads {
            assert!(load.share_percent >= 20.0 && load.share_percent < 70.0);
            assert!(load.bar_width_percent >= 30.0 && load.bar_width_percent < 80.0);
        }
    }

    #[test]
    fn test_snapshot_top_performers() {
        let mut rng = RngSource::seeded(8);
        let snapshot = Snapshot::generate(&mut rng);

        let top = snapshot.top_performers(5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].id, snapshot.opportunities[0].id);
        assert_eq!(snapshot.top_performers(100).len(), OPPORTUNITY_COUNT);
        assert!(snapshot.top_performers(0).is_empty());
    }

    #[test]
    fn test_snapshot_lookups() {
        let mut rng = RngSource::seeded(21);
        let snapshot = Snapshot::generate(&mut rng);

        assert!(snapshot.opportunity("opp-3").is_some());
        assert!(snapshot.opportunity("opp-12").is_none());
        assert_eq!(snapshot.flow_for(Chain::Avalanche).unwrap().id, "flow-5");
    }

    #[test]
    fn test_seeded_snapshots_match() {
        let a = Snapshot::generate(&mut RngSource::seeded(77));
        let b = Snapshot::generate(&mut RngSource::seeded(77));
        assert_eq!(a.opportunities, b.opportunities);
        assert_eq!(a.bridge_flows, b.bridge_flows);
    }
}
