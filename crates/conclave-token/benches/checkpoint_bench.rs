use conclave_token::CheckpointLedger;
use conclave_types::{Address, U256};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn ledger_with_checkpoints(n: u64) -> (CheckpointLedger, Address) {
    let account = Address::from_bytes([7u8; 20]);
    let mut ledger = CheckpointLedger::new();
    for block in 0..n {
        ledger.write(account, U256::from(block + 1), block * 2);
    }
    (ledger, account)
}

fn bench_prior_votes(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkpoint_prior");
    for n in [16u64, 256, 4_096, 65_536] {
        let (ledger, account) = ledger_with_checkpoints(n);
        let current = n * 2 + 1;

        group.bench_with_input(BenchmarkId::new("interior", n), &n, |bencher, _| {
            bencher.iter(|| ledger.prior(&account, n, current))
        });
        group.bench_with_input(BenchmarkId::new("latest_shortcut", n), &n, |bencher, _| {
            bencher.iter(|| ledger.prior(&account, current - 1, current))
        });
    }
    group.finish();
}

fn bench_checkpoint_write(c: &mut Criterion) {
    c.bench_function("checkpoint_append", |bencher| {
        let account = Address::from_bytes([7u8; 20]);
        let mut block = 0u64;
        let mut ledger = CheckpointLedger::new();
        bencher.iter(|| {
            block += 1;
            ledger.write(account, U256::from(block), block);
        })
    });

    c.bench_function("checkpoint_same_block_overwrite", |bencher| {
        let account = Address::from_bytes([7u8; 20]);
        let mut ledger = CheckpointLedger::new();
        let mut votes = 0u64;
        bencher.iter(|| {
            votes += 1;
            ledger.write(account, U256::from(votes), 1);
        })
    });
}

criterion_group!(benches, bench_prior_votes, bench_checkpoint_write);
criterion_main!(benches);
