//! Tests for long mutation sequences
//!
//! This tests:
//! - Dense order after arbitrary add/remove/reorder chains
//! - Reorder idempotence
//! - Remove-then-reindex shifting
//! - Rejected mutations leaving the document untouched

use coursecraft_editor::{BlockDocument, BlockId, BlockKind, Mutation, MutationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn order_values(doc: &BlockDocument) -> Vec<usize> {
    let mut orders: Vec<usize> = doc.blocks().iter().map(|b| b.order()).collect();
    orders.sort_unstable();
    orders
}

fn ids(doc: &BlockDocument) -> Vec<BlockId> {
    doc.blocks().iter().map(|b| b.id().clone()).collect()
}

#[test]
fn test_order_stays_dense_for_random_sequences() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut doc = BlockDocument::new(format!("seq-{}", seed));

        for _ in 0..200 {
            let current = ids(&doc);
            match rng.gen_range(0..4) {
                0 | 1 => {
                    let kind = BlockKind::ALL[rng.gen_range(0..BlockKind::ALL.len())];
                    doc.add_block(kind, None).unwrap();
                }
                2 if !current.is_empty() => {
                    let id = &current[rng.gen_range(0..current.len())];
                    doc.remove_block(id).unwrap();
                }
                _ if !current.is_empty() => {
                    let id = &current[rng.gen_range(0..current.len())];
                    doc.reorder(id, rng.gen_range(0..current.len() + 3)).unwrap();
                }
                _ => {}
            }

            let expected: Vec<usize> = (0..doc.len()).collect();
            assert_eq!(order_values(&doc), expected, "seed {}", seed);
            assert!(doc.is_dense());
        }
    }
}

#[test]
fn test_reorder_twice_equals_once() {
    let mut doc = BlockDocument::new("idem");
    for kind in [BlockKind::Text, BlockKind::Quiz, BlockKind::Image, BlockKind::Poll] {
        doc.add_block(kind, None).unwrap();
    }
    let target = ids(&doc)[3].clone();

    doc.reorder(&target, 1).unwrap();
    let once = doc.snapshot();

    doc.reorder(&target, 1).unwrap();
    assert_eq!(doc.snapshot(), once);
}

#[test]
fn test_remove_shifts_later_blocks_down_by_one() {
    let mut doc = BlockDocument::new("shift");
    for _ in 0..6 {
        doc.add_block(BlockKind::Text, None).unwrap();
    }
    let before = ids(&doc);
    let k = 2;

    doc.remove_block(&before[k]).unwrap();

    for (old_index, id) in before.iter().enumerate() {
        if old_index == k {
            assert!(doc.get(id).is_none());
            continue;
        }
        let expected = if old_index > k { old_index - 1 } else { old_index };
        assert_eq!(doc.get(id).unwrap().order(), expected);
    }
}

#[test]
fn test_rejected_mutations_change_nothing() {
    let mut doc = BlockDocument::new("reject");
    let text = doc.add_block(BlockKind::Text, None).unwrap().id().clone();
    doc.add_block(BlockKind::Quiz, None).unwrap();
    let before = doc.snapshot();

    let rejected = vec![
        Mutation::UpdateContent {
            block_id: text.clone(),
            content: BlockKind::Survey.default_content(),
        },
        Mutation::RemoveBlock {
            block_id: BlockId::new("missing"),
        },
        Mutation::Reorder {
            block_id: BlockId::new("missing"),
            target_index: 0,
        },
        Mutation::AddBlock {
            kind: BlockKind::Image,
            content: Some(BlockKind::Video.default_content()),
        },
    ];

    for mutation in rejected {
        assert!(mutation.validate(&doc).is_err());
        assert!(doc.apply(mutation).is_err());
        assert_eq!(doc.snapshot(), before);
    }
}

#[test]
fn test_unknown_block_type_by_name() {
    let mut doc = BlockDocument::new("names");

    assert_eq!(
        doc.add_block_named("carousel", None).unwrap_err(),
        MutationError::InvalidBlockType("carousel".to_string())
    );
    assert!(doc.is_empty());

    let block = doc.add_block_named("interactive-timeline", None).unwrap();
    assert_eq!(block.kind(), BlockKind::InteractiveTimeline);
}
