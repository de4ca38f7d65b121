use veilchain::chain::ChainStore;
use veilchain::errors::ChainError;

// ----------------------- Helpers ---------------------------

fn porch_conversation() -> ChainStore {
    let mut chain = ChainStore::new();
    chain.append("human", "hello", None).expect("append 0");
    chain.append("ai", "hi there", Some(0)).expect("append 1");
    chain
        .append("human", "a different branch", Some(0))
        .expect("append 2");
    chain
}

// ----------------------- Tests -----------------------------

#[test]
fn branching_scenario_links_and_lineage() {
    let chain = porch_conversation();

    let b0 = chain.get(0).expect("block 0");
    let b1 = chain.get(1).expect("block 1");
    let b2 = chain.get(2).expect("block 2");

    // Genesis has no temporal predecessor; everyone else links to id - 1,
    // regardless of which block they logically reply to.
    assert_eq!(b0.previous_hash, None);
    assert_eq!(b1.previous_hash.as_deref(), Some(b0.hash.as_str()));
    assert_eq!(b2.previous_hash.as_deref(), Some(b1.hash.as_str()));
    assert_eq!(b2.parent_id, Some(0));

    // Lineage is a separate structure: both replies branch off block 0.
    assert_eq!(chain.children_of(0), &[1, 2]);
    assert_eq!(chain.children_of(1), &[] as &[u64]);
    assert_eq!(chain.roots(), &[0]);

    chain.verify().expect("freshly built chain verifies");
}

#[test]
fn verify_succeeds_after_any_append_sequence() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    let mut chain = ChainStore::new();
    chain.verify().expect("empty chain is trivially valid");

    for i in 0..40u64 {
        let speaker = if i % 2 == 0 { "human" } else { "ai" };
        // Reply to a random earlier block to exercise branching.
        let parent = if i == 0 { None } else { Some(rng.gen_range(0..i)) };
        chain
            .append(speaker, &format!("message {}", i), parent)
            .expect("append");
        chain.verify().expect("chain verifies after every append");
    }

    // Structural check, independent of verify(): every non-genesis block
    // carries the stored hash of its predecessor.
    let blocks: Vec<_> = chain.iter().collect();
    for pair in blocks.windows(2) {
        assert_eq!(
            pair[1].previous_hash.as_deref(),
            Some(pair[0].hash.as_str())
        );
    }
}

#[test]
fn ids_are_dense_and_assigned_by_the_store() {
    let chain = porch_conversation();
    assert_eq!(chain.len(), 3);
    for (pos, block) in chain.iter().enumerate() {
        assert_eq!(block.id, pos as u64);
    }
    assert!(chain.get(3).is_none());
}

#[test]
fn invalid_parent_is_rejected_without_mutation() {
    let mut chain = porch_conversation();
    let before = chain.len();
    let last = chain.last_hash().map(str::to_string);

    // One past the end: not an existing block.
    let err = chain
        .append("ai", "dangling reply", Some(before as u64))
        .expect_err("out-of-range parent must fail");
    assert_eq!(
        err,
        ChainError::InvalidParent {
            parent_id: before as u64,
            len: before as u64
        }
    );

    assert_eq!(chain.len(), before, "failed append must not grow the chain");
    assert_eq!(chain.last_hash().map(str::to_string), last);
    chain.verify().expect("chain still verifies");
}

#[test]
fn iteration_is_restartable() {
    let chain = porch_conversation();
    let first: Vec<u64> = chain.iter().map(|b| b.id).collect();
    let second: Vec<u64> = chain.iter().map(|b| b.id).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![0, 1, 2]);
}

#[test]
fn speaker_is_case_normalized_and_content_verbatim() {
    let mut chain = ChainStore::new();
    chain
        .append("HuMaN", "  Mixed Case, spaces kept  ", None)
        .expect("append");
    let b = chain.get(0).expect("block");
    assert_eq!(b.speaker, "human");
    assert_eq!(b.content, "  Mixed Case, spaces kept  ");

    // Empty strings are discouraged but not rejected.
    chain.append("", "", Some(0)).expect("empty append allowed");
    chain.verify().expect("verify");
}
