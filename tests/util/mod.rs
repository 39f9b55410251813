#![allow(dead_code)]
use rand::Rng;

pub fn random_data(num_bytes: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..num_bytes).map(|_| rng.random::<u8>()).collect()
}

/// Random bytes whose symbol-width chunks all index into an `order`-point
/// table.
pub fn random_data_within(order: usize, dim: usize, num_symbols: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bits: Vec<bool> = Vec::with_capacity(num_symbols * dim);
    for _ in 0..num_symbols {
        let symbol = rng.random_range(0..order);
        bits.extend((0..dim).map(|i| (symbol >> i) & 1 == 1));
    }
    bits.chunks(8)
        .map(|byte| {
            byte.iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << i))
        })
        .collect()
}
