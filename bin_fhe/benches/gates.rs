use bin_fhe::lwe::{LWECiphertext, LWESecretKey};
use bin_fhe::{BinFHEContext, BinFHEMethod, BinFHEParamSet, BinGate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sampling::source::Source;

fn eval_bin_gate(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("eval_bin_gate");
    b.sample_size(10);

    for method in [BinFHEMethod::AP, BinFHEMethod::GINX] {
        let Ok(mut ctx) = BinFHEContext::generate(BinFHEParamSet::Toy, method) else {
            continue;
        };
        let mut source: Source = Source::new([0u8; 32]);
        let sk: LWESecretKey = ctx.key_gen(&mut source);
        if ctx.bt_key_gen(&sk, &mut source).is_err() {
            continue;
        }
        let ct1: LWECiphertext = ctx.encrypt(&sk, 1, &mut source);
        let ct2: LWECiphertext = ctx.encrypt(&sk, 0, &mut source);

        for gate in [BinGate::And, BinGate::Xor] {
            let id: BenchmarkId = BenchmarkId::new(format!("{:?}", method), format!("{:?}", gate));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
                b.iter(|| ctx.eval_bin_gate(gate, &ct1, &ct2))
            });
        }
    }
}

criterion_group!(benches, eval_bin_gate);
criterion_main!(benches);
