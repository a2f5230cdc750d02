use bin_fhe::lwe::{LWECiphertext, LWESecretKey};
use bin_fhe::{BinFHEContext, BinFHEError, BinFHEMethod, BinFHEParamSet, BinGate};
use sampling::source::Source;

const TRIALS: usize = 3;
const LONG_TRIALS: usize = 1000;

#[test]
fn bootstrapping_ap() {
    bootstrapping(BinFHEMethod::AP, [1u8; 32]);
}

#[test]
fn bootstrapping_ginx() {
    bootstrapping(BinFHEMethod::GINX, [2u8; 32]);
}

#[test]
#[ignore = "slow: 12000 bootstrapped gates"]
fn bootstrapping_many_trials() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    for (method, seed) in [(BinFHEMethod::AP, [3u8; 32]), (BinFHEMethod::GINX, [4u8; 32])] {
        let mut ctx: BinFHEContext = BinFHEContext::generate(BinFHEParamSet::Toy, method).unwrap();
        let mut source: Source = Source::new(seed);
        let sk: LWESecretKey = ctx.key_gen(&mut source);
        ctx.bt_key_gen(&sk, &mut source).unwrap();

        for gate in BinGate::ALL {
            let inputs: [(u64, u64); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];
            let mut failures: usize = 0;
            for (m1, m2) in inputs.iter().cycle().take(LONG_TRIALS) {
                let ct1: LWECiphertext = ctx.encrypt(&sk, *m1, &mut source);
                let ct2: LWECiphertext = ctx.encrypt(&sk, *m2, &mut source);
                let out: LWECiphertext = ctx.eval_bin_gate(gate, &ct1, &ct2).unwrap();
                if ctx.decrypt(&sk, &out) != gate.eval(*m1 == 1, *m2 == 1) as u64 {
                    failures += 1;
                }
            }
            assert_eq!(failures, 0, "{method:?} {gate:?}: {failures}/{LONG_TRIALS} wrong");
        }
    }
}

fn bootstrapping(method: BinFHEMethod, seed: [u8; 32]) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut ctx: BinFHEContext = BinFHEContext::generate(BinFHEParamSet::Toy, method).unwrap();
    let mut source: Source = Source::new(seed);
    let sk: LWESecretKey = ctx.key_gen(&mut source);

    sub_test("test_gate_without_key", || {
        test_gate_without_key(&ctx, &sk, &mut source)
    });

    ctx.bt_key_gen(&sk, &mut source).unwrap();

    sub_test("test_and_1_0", || {
        test_scenario(&ctx, &sk, &mut source, BinGate::And, 1, 0, 0)
    });
    sub_test("test_or_1_0", || {
        test_scenario(&ctx, &sk, &mut source, BinGate::Or, 1, 0, 1)
    });
    sub_test("test_xor_1_1", || {
        test_scenario(&ctx, &sk, &mut source, BinGate::Xor, 1, 1, 0)
    });
    sub_test("test_not", || test_not(&ctx, &sk, &mut source));
    sub_test("test_all_gates", || test_all_gates(&ctx, &sk, &mut source));
    sub_test("test_chained_gates", || {
        test_chained_gates(&ctx, &sk, &mut source)
    });
    sub_test("test_same_object_rejected", || {
        test_same_object_rejected(&ctx, &sk, &mut source)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn test_gate_without_key(ctx: &BinFHEContext, sk: &LWESecretKey, source: &mut Source) {
    let ct1: LWECiphertext = ctx.encrypt(sk, 1, source);
    let ct2: LWECiphertext = ctx.encrypt(sk, 0, source);
    assert!(matches!(
        ctx.eval_bin_gate(BinGate::And, &ct1, &ct2),
        Err(BinFHEError::Config(_))
    ));
}

fn test_scenario(
    ctx: &BinFHEContext,
    sk: &LWESecretKey,
    source: &mut Source,
    gate: BinGate,
    m1: u64,
    m2: u64,
    expected: u64,
) {
    let ct1: LWECiphertext = ctx.encrypt(sk, m1, source);
    let ct2: LWECiphertext = ctx.encrypt(sk, m2, source);
    let out: LWECiphertext = ctx.eval_bin_gate(gate, &ct1, &ct2).unwrap();
    assert_eq!(out.modulus(), ctx.params().lwe().q);
    assert_eq!(out.n(), ctx.params().lwe().n);
    assert_eq!(ctx.decrypt(sk, &out), expected, "{gate:?}({m1}, {m2})");
}

fn test_not(ctx: &BinFHEContext, sk: &LWESecretKey, source: &mut Source) {
    for m in [0u64, 1] {
        let ct: LWECiphertext = ctx.encrypt(sk, m, source);
        assert_eq!(ctx.decrypt(sk, &ctx.eval_not(&ct)), 1 - m);
    }
}

fn test_all_gates(ctx: &BinFHEContext, sk: &LWESecretKey, source: &mut Source) {
    for gate in BinGate::ALL {
        for (m1, m2) in [(0u64, 0u64), (0, 1), (1, 0), (1, 1)] {
            let expected: u64 = gate.eval(m1 == 1, m2 == 1) as u64;
            for _ in 0..TRIALS {
                test_scenario(ctx, sk, source, gate, m1, m2, expected);
            }
        }
    }
}

/// Bootstrapped outputs are valid gate inputs: (m1 NAND m2) XOR NOT(m1).
fn test_chained_gates(ctx: &BinFHEContext, sk: &LWESecretKey, source: &mut Source) {
    for (m1, m2) in [(0u64, 0u64), (0, 1), (1, 0), (1, 1)] {
        let ct1: LWECiphertext = ctx.encrypt(sk, m1, source);
        let ct2: LWECiphertext = ctx.encrypt(sk, m2, source);
        let nand: LWECiphertext = ctx.eval_bin_gate(BinGate::Nand, &ct1, &ct2).unwrap();
        let not: LWECiphertext = ctx.eval_not(&ct1);
        let out: LWECiphertext = ctx.eval_bin_gate(BinGate::Xor, &nand, &not).unwrap();
        let expected: u64 = (1 - (m1 & m2)) ^ (1 - m1);
        assert_eq!(ctx.decrypt(sk, &out), expected, "({m1}, {m2})");
    }
}

fn test_same_object_rejected(ctx: &BinFHEContext, sk: &LWESecretKey, source: &mut Source) {
    let ct: LWECiphertext = ctx.encrypt(sk, 1, source);
    assert!(matches!(
        ctx.eval_bin_gate(BinGate::And, &ct, &ct),
        Err(BinFHEError::Config(_))
    ));
    let copy: LWECiphertext = ct.clone();
    assert_eq!(ctx.decrypt(sk, &ctx.eval_bin_gate(BinGate::And, &ct, &copy).unwrap()), 1);
}
