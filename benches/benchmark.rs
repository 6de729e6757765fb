use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use treeweave::decode::{DecodeConfig, Decoder};

const TREE_SIZES: &[(&str, usize)] = &[("n1k", 1_000), ("n10k", 10_000), ("n100k", 100_000)];

/// Lines of a complete binary tree with `num_nodes` nodes in heap numbering,
/// shuffled deterministically.
fn shuffled_input(num_nodes: usize) -> String {
    let mut lines: Vec<String> = (1..=num_nodes)
        .map(|id| {
            let (left, right) = (2 * id, 2 * id + 1);
            if right <= num_nodes {
                format!("{id} {left} {right} node {id}")
            } else {
                format!("{id} leaf {id}")
            }
        })
        .collect();

    // xorshift64, Fisher-Yates
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for i in (1..lines.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        lines.swap(i, j);
    }
    lines.join("\n")
}

fn decode(input: &str) {
    let mut decoder = Decoder::new(DecodeConfig::new());
    let tree = decoder.decode_str(input).unwrap();
    black_box(tree.num_vertices());
}

fn shuffled_decoding(c: &mut Criterion) {
    for (name, size) in TREE_SIZES {
        // Odd sizes only, so every inner node has two children
        let input = shuffled_input(size | 1);
        c.bench_function(name, |b| {
            b.iter(|| decode(&input));
        });
    }
}

criterion_group! {
    name = decoding;
    config = Criterion::default().sample_size(10);
    targets = shuffled_decoding
}
criterion_main!(decoding);
