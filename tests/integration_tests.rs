// Integration tests for Pairing Algo

use std::collections::{BTreeMap, HashMap};

use pairing_algo::core::{
    blocking_pairs, is_stable, PreferenceTable, StableMatcher, WeightTable,
    WeightedBiddingMatcher,
};
use pairing_algo::models::{BlockingPair, Dataset, MatchResult};
use pairing_algo::toolkit::{random_bidding_dataset, random_preference_table};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn five_by_five() -> PreferenceTable {
    PreferenceTable::builder()
        .proposer("A", ["V", "W", "Z", "Y", "X"])
        .proposer("B", ["V", "W", "Y", "Z", "X"])
        .proposer("C", ["Z", "V", "W", "Y", "X"])
        .proposer("D", ["Y", "X", "Z", "W", "V"])
        .proposer("E", ["X", "Y", "Z", "V", "W"])
        .receiver("V", ["A", "C", "B", "E", "D"])
        .receiver("W", ["A", "B", "C", "D", "E"])
        .receiver("X", ["D", "E", "A", "B", "C"])
        .receiver("Y", ["B", "A", "D", "C", "E"])
        .receiver("Z", ["A", "C", "B", "D", "E"])
        .build()
        .unwrap()
}

fn seeded_table(seed: u64, n: usize) -> PreferenceTable {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_preference_table(n, n, &mut rng).unwrap()
}

fn uniform(names: &[&str], value: f64) -> HashMap<String, f64> {
    names.iter().map(|n| (n.to_string(), value)).collect()
}

/// Every perfect matching of a balanced table, as MatchResults
fn all_perfect_matchings(table: &PreferenceTable) -> Vec<MatchResult> {
    fn permute(items: &mut Vec<usize>, k: usize, out: &mut Vec<Vec<usize>>) {
        if k == items.len() {
            out.push(items.clone());
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permute(items, k + 1, out);
            items.swap(k, i);
        }
    }

    let mut receivers: Vec<usize> = (0..table.receiver_count()).collect();
    let mut perms = Vec::new();
    permute(&mut receivers, 0, &mut perms);

    perms
        .into_iter()
        .map(|perm| {
            let engagements: BTreeMap<String, String> = perm
                .iter()
                .enumerate()
                .map(|(p, &r)| (table.receivers()[r].clone(), table.proposers()[p].clone()))
                .collect();
            MatchResult::new(engagements, vec![])
        })
        .collect()
}

#[test]
fn test_concrete_market() {
    let table = five_by_five();
    let (result, log) = StableMatcher::new().run_logged(&table).unwrap();

    let expected = [("A", "V"), ("B", "W"), ("C", "Z"), ("D", "Y"), ("E", "X")];
    for (p, r) in expected {
        assert!(result.contains_pair(p, r), "expected {}-{}", p, r);
    }
    // B is turned away by V before settling on W
    assert_eq!(log.proposals(), 6);
    assert!(is_stable(&result, &table).unwrap());
}

#[test]
fn test_random_markets_are_perfect_and_stable() {
    for seed in 0..40 {
        let table = seeded_table(seed, 8);
        let result = StableMatcher::new().run(&table).unwrap();

        assert_eq!(result.len(), 8, "seed {}", seed);
        assert!(result.unmatched.is_empty());
        assert!(is_stable(&result, &table).unwrap(), "seed {}", seed);
    }
}

#[test]
fn test_runs_are_idempotent() {
    let table = seeded_table(99, 10);
    let matcher = StableMatcher::new();

    let first = matcher.run(&table).unwrap();
    let second = matcher.run(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_replay_reproduces_engagements() {
    for seed in 0..20 {
        let table = seeded_table(seed, 7);
        let (result, log) = StableMatcher::new().run_logged(&table).unwrap();

        assert_eq!(log.replay().unwrap(), result.engagements);
        assert!(log.proposals() <= 7 * 7);
    }
}

#[test]
fn test_mutual_top_choice_pair_matches() {
    let table = five_by_five();
    assert_eq!(table.proposer_preferences("A").unwrap()[0], "V");
    assert_eq!(table.receiver_preferences("V").unwrap()[0], "A");

    let result = StableMatcher::new().run(&table).unwrap();
    assert!(result.contains_pair("A", "V"));
}

#[test]
fn test_mutual_top_choice_always_matches() {
    for seed in 0..30 {
        let mut table = seeded_table(seed, 5);

        let top = table.proposer_preferences("P1").unwrap()[0].to_string();
        table.swap_proposer_preferences("P1", &top, "R1").unwrap();
        let top = table.receiver_preferences("R1").unwrap()[0].to_string();
        table.swap_receiver_preferences("R1", &top, "P1").unwrap();

        let result = StableMatcher::new().run(&table).unwrap();
        assert!(result.contains_pair("P1", "R1"), "seed {}", seed);
    }
}

#[test]
fn test_adjacent_swap_keeps_everyone_matched() {
    let base = five_by_five();

    for proposer in ["A", "B", "C", "D", "E"] {
        for k in 0..4 {
            let mut table = base.clone();
            let list: Vec<String> = table
                .proposer_preferences(proposer)
                .unwrap()
                .into_iter()
                .map(str::to_string)
                .collect();
            table
                .swap_proposer_preferences(proposer, &list[k], &list[k + 1])
                .unwrap();

            let result = StableMatcher::new().run(&table).unwrap();
            assert_eq!(result.len(), 5);
            assert!(result.partner_of_proposer(proposer).is_some());
            assert!(is_stable(&result, &table).unwrap());
        }
    }
}

#[test]
fn test_proposer_optimal_and_receiver_pessimal() {
    for seed in 0..15 {
        let table = seeded_table(seed, 5);
        let result = StableMatcher::new().run(&table).unwrap();

        let stable: Vec<MatchResult> = all_perfect_matchings(&table)
            .into_iter()
            .filter(|m| is_stable(m, &table).unwrap())
            .collect();
        assert!(stable.contains(&result));

        for other in &stable {
            for (p, r) in other.pairs() {
                let ours = result.partner_of_proposer(p).unwrap();
                assert!(
                    table.proposer_rank(p, ours).unwrap() <= table.proposer_rank(p, r).unwrap(),
                    "seed {}: {} could do better with {}",
                    seed,
                    p,
                    r
                );
                let held = result.partner_of_receiver(r).unwrap();
                assert!(table.receiver_rank(r, held).unwrap() >= table.receiver_rank(r, p).unwrap());
            }
        }
    }
}

#[test]
fn test_greedy_bidding_can_be_unstable() {
    let weights = WeightTable::builder()
        .proposer("P1", [("R1", 10), ("R2", 1), ("R3", 1)])
        .proposer("P2", [("R1", 1), ("R2", 9), ("R3", 1)])
        .proposer("P3", [("R1", 1), ("R2", 5), ("R3", 1)])
        .receiver("R1", [("P1", 10), ("P2", 1), ("P3", 1)])
        .receiver("R2", [("P1", 1), ("P2", 9), ("P3", 10)])
        .receiver("R3", [("P1", 1), ("P2", 1), ("P3", 1)])
        .build()
        .unwrap();
    let budgets = uniform(&["P1", "P2", "P3"], 1500.0);
    let capacities = uniform(&["R1", "R2", "R3"], 100.0);

    let outcome = WeightedBiddingMatcher::default()
        .run_detailed(&weights, &budgets, &capacities)
        .unwrap();

    let order: Vec<(&str, &str)> = outcome
        .awards
        .iter()
        .map(|a| (a.proposer.as_str(), a.receiver.as_str()))
        .collect();
    assert_eq!(order, vec![("P1", "R1"), ("P2", "R2"), ("P3", "R3")]);

    assert_eq!(
        blocking_pairs(&outcome.matching, &weights).unwrap(),
        vec![BlockingPair {
            proposer: "P3".to_string(),
            receiver: "R2".to_string(),
        }]
    );
    assert!(!is_stable(&outcome.matching, &weights).unwrap());
}

#[test]
fn test_random_bidding_markets() {
    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let market = random_bidding_dataset(6, 4, &mut rng).to_market().unwrap();

        let (result, satisfaction) = WeightedBiddingMatcher::default()
            .run(&market.weights, &market.budgets, &market.capacities)
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.unmatched.len(), 2);
        assert_eq!(satisfaction.len(), 6);
        for name in &result.unmatched {
            assert_eq!(satisfaction[name], 0.0);
        }
        // Blocking pairs are only a diagnostic here
        assert!(blocking_pairs(&result, &market.weights).is_ok());
    }
}

#[test]
fn test_dataset_end_to_end() {
    let json = r#"{
        "preferences": {
            "proposers": [
                {"name": "A", "preferences": ["X", "Y"]},
                {"name": "B", "preferences": ["X", "Y"]}
            ],
            "receivers": [
                {"name": "X", "preferences": ["B", "A"]},
                {"name": "Y", "preferences": ["A", "B"]}
            ]
        }
    }"#;

    let dataset = Dataset::from_json_str(json).unwrap();
    assert!(dataset.bidding.is_none());

    let table = dataset.preferences.unwrap().to_table().unwrap();
    let result = StableMatcher::new().run(&table).unwrap();

    assert!(result.contains_pair("B", "X"));
    assert!(result.contains_pair("A", "Y"));
}
