#![cfg(test)]

// State-machine property tests for ProbeTable, kept inside the crate so they
// can inspect the slot array directly.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::probe_table::{Handle, KeyFn, ProbeTable, Slot};
use crate::strategy::Strategy as Probing;
use hashbrown::HashMap;
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Rec {
    key: String,
    tag: usize,
}

fn key(r: &Rec) -> &str {
    &r.key
}

#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Delete(usize),
    Lookup(usize),
    Absent(String),
    Iterate,
    Clear,
}

fn arb_probing() -> impl Strategy<Value = Probing> {
    prop_oneof![Just(Probing::DoubleHashing), Just(Probing::LinearProbing)]
}

// `key_pattern` controls collision pressure: a tiny alphabet yields many
// duplicate keys and shared probe paths.
fn arb_scenario(
    key_pattern: &'static str,
) -> impl Strategy<Value = (TableConfig, Vec<String>, Vec<Op>)> {
    let config = (0usize..10, 0.1f64..0.95, arb_probing())
        .prop_map(|(buckets, lf, s)| TableConfig::new(buckets, s, lf));
    let pool = proptest::collection::vec(key_pattern, 1..=12);
    (config, pool).prop_flat_map(|(config, pool)| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => idx.clone().prop_map(Op::Insert),
            3 => idx.clone().prop_map(Op::Delete),
            3 => idx.prop_map(Op::Lookup),
            1 => "[x-z]{6}".prop_map(Op::Absent),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (config, pool.clone(), ops))
    })
}

fn run(config: TableConfig, pool: Vec<String>, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut: ProbeTable<Rec> = ProbeTable::new(key as KeyFn<Rec>, config).unwrap();
    let initial = sut.capacity();
    // Multiset of live keys.
    let mut model: HashMap<String, usize> = HashMap::new();
    let mut issued: Vec<Handle> = Vec::new();
    let mut next_tag = 0usize;

    for op in ops {
        match op {
            Op::Insert(i) => {
                let before = sut.capacity();
                let len = sut.len();
                let rec = Rec {
                    key: pool[i].clone(),
                    tag: next_tag,
                };
                next_tag += 1;
                match sut.insert(rec) {
                    Ok(h) => {
                        prop_assert_eq!(sut.get(h).map(|r| r.tag), Some(next_tag - 1));
                        issued.push(h);
                        *model.entry(pool[i].clone()).or_insert(0) += 1;
                    }
                    // Short double-hashing cycles (step sharing a factor with
                    // the capacity) can fill up even after the forced resize.
                    Err(e) => {
                        prop_assert!(
                            matches!(e.error(), TableError::ProbeExhausted { .. }),
                            "unexpected insert error: {}",
                            e
                        );
                        prop_assert_eq!(sut.len(), len);
                        let back = e.into_record();
                        prop_assert_eq!(&back.key, &pool[i]);
                    }
                }
                prop_assert!(sut.capacity() >= before);
            }
            Op::Delete(i) => {
                let k = &pool[i];
                let expected = model.get(k).copied().unwrap_or(0) > 0;
                let len = sut.len();
                prop_assert_eq!(sut.delete(k), expected);
                if expected {
                    prop_assert_eq!(sut.len(), len - 1);
                    if let Some(c) = model.get_mut(k) {
                        *c -= 1;
                    }
                } else {
                    prop_assert_eq!(sut.len(), len);
                }
            }
            Op::Lookup(i) => {
                let k = &pool[i];
                let present = model.get(k).copied().unwrap_or(0) > 0;
                let found = sut.lookup(k);
                prop_assert_eq!(found.is_some(), present);
                if let Some(r) = found {
                    prop_assert_eq!(&r.key, k);
                }
                prop_assert_eq!(sut.find(k).is_some(), present);
            }
            Op::Absent(k) => {
                let present = model.get(&k).copied().unwrap_or(0) > 0;
                prop_assert_eq!(sut.contains_key(&k), present);
            }
            Op::Iterate => {
                let mut seen: HashMap<String, usize> = HashMap::new();
                for (_, r) in sut.iter() {
                    *seen.entry(r.key.clone()).or_insert(0) += 1;
                }
                let live: HashMap<String, usize> = model
                    .iter()
                    .filter(|(_, c)| **c > 0)
                    .map(|(k, c)| (k.clone(), *c))
                    .collect();
                prop_assert_eq!(seen, live);
            }
            Op::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
                prop_assert_eq!(sut.tombstones(), 0);
            }
        }

        // Post-conditions after each op.
        let live: usize = model.values().sum();
        prop_assert_eq!(sut.len(), live);
        prop_assert_eq!(sut.is_empty(), live == 0);
        prop_assert!((sut.len() as f64) < sut.capacity() as f64 * config.load_factor);
        // Capacity only ever doubles.
        let ratio = sut.capacity() / initial;
        prop_assert_eq!(sut.capacity() % initial, 0);
        prop_assert!(ratio.is_power_of_two());
        // Slot bookkeeping agrees with the slot array.
        let occupied = sut
            .slots
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied(_)))
            .count();
        let tombs = sut
            .slots
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        prop_assert_eq!(occupied, sut.len());
        prop_assert_eq!(tombs, sut.tombstones());
        // Exactly the live records' handles resolve.
        let resolving = issued.iter().filter(|h| sut.get(**h).is_some()).count();
        prop_assert_eq!(resolving, sut.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((config, pool, ops) in arb_scenario("[0-9]{5}")) {
        run(config, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_duplicates((config, pool, ops) in arb_scenario("[ab]{0,2}")) {
        run(config, pool, ops)?;
    }
}
