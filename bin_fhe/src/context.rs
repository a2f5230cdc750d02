use std::sync::Arc;

use sampling::source::{new_seed, Source};
use tracing::debug;

use crate::error::{BinFHEError, Result};
use crate::gates::{eval_bin_gate, eval_not, BinGate};
use crate::lwe::{LWECiphertext, LWEPlaintext, LWEScheme, LWESecretKey};
use crate::params::{BinFHEMethod, BinFHEParamSet, RingGSWParams};
use crate::rgsw::key::RingGSWEvalKey;
use crate::rgsw::keygen::key_gen;

/// Owns a parameter set, the LWE scheme over it and, once generated, the
/// evaluation key.
pub struct BinFHEContext {
    params: Arc<RingGSWParams>,
    lwe: LWEScheme,
    eval_key: Option<RingGSWEvalKey>,
}

impl BinFHEContext {
    pub fn generate(set: BinFHEParamSet, method: BinFHEMethod) -> Result<Self> {
        let params: RingGSWParams = set.ring_gsw_params(method)?;
        debug!(?set, ?method, "context generated");
        Ok(Self::from_params(params))
    }

    pub fn from_params(params: RingGSWParams) -> Self {
        let lwe: LWEScheme = LWEScheme::new(params.lwe().clone());
        Self {
            params: Arc::new(params),
            lwe,
            eval_key: None,
        }
    }

    pub fn params(&self) -> &Arc<RingGSWParams> {
        &self.params
    }

    pub fn lwe(&self) -> &LWEScheme {
        &self.lwe
    }

    /// Source seeded from the thread-local generator, for callers that do not
    /// need reproducible keys.
    pub fn fresh_source() -> Source {
        Source::new(new_seed())
    }

    pub fn key_gen(&self, source: &mut Source) -> LWESecretKey {
        self.lwe.key_gen(source)
    }

    /// Generates and stores the bootstrapping and key-switching keys for sk.
    pub fn bt_key_gen(&mut self, sk: &LWESecretKey, source: &mut Source) -> Result<()> {
        self.eval_key = Some(key_gen(&self.params, &self.lwe, sk, source)?);
        Ok(())
    }

    pub fn eval_key(&self) -> Option<&RingGSWEvalKey> {
        self.eval_key.as_ref()
    }

    /// Installs a previously generated key, e.g. after deserialization.
    pub fn set_eval_key(&mut self, ek: RingGSWEvalKey) -> Result<()> {
        if ek.bs_key().method() != self.params.method() {
            return Err(BinFHEError::Config(format!(
                "{:?} key does not match {:?} parameters",
                ek.bs_key().method(),
                self.params.method()
            )));
        }
        self.eval_key = Some(ek);
        Ok(())
    }

    pub fn encrypt(
        &self,
        sk: &LWESecretKey,
        m: LWEPlaintext,
        source: &mut Source,
    ) -> LWECiphertext {
        self.lwe.encrypt(sk, m, source)
    }

    pub fn decrypt(&self, sk: &LWESecretKey, ct: &LWECiphertext) -> LWEPlaintext {
        self.lwe.decrypt(sk, ct)
    }

    /// Fails if no evaluation key is present or if ct1 and ct2 are the same object.
    pub fn eval_bin_gate(
        &self,
        gate: BinGate,
        ct1: &LWECiphertext,
        ct2: &LWECiphertext,
    ) -> Result<LWECiphertext> {
        let ek: &RingGSWEvalKey = self.eval_key.as_ref().ok_or_else(|| {
            BinFHEError::Config("bootstrapping key not generated; call bt_key_gen first".into())
        })?;
        eval_bin_gate(&self.params, gate, ek, ct1, ct2, &self.lwe)
    }

    pub fn eval_not(&self, ct: &LWECiphertext) -> LWECiphertext {
        eval_not(&self.params, ct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_source_encrypts_and_decrypts() {
        let ctx: BinFHEContext =
            BinFHEContext::generate(BinFHEParamSet::Toy, BinFHEMethod::AP).unwrap();
        let mut source: Source = BinFHEContext::fresh_source();
        let sk: LWESecretKey = ctx.key_gen(&mut source);
        for m in [0u64, 1, 1, 0] {
            let ct: LWECiphertext = ctx.encrypt(&sk, m, &mut source);
            assert_eq!(ctx.decrypt(&sk, &ct), m);
        }
    }

    #[test]
    fn gate_without_key_is_config_error() {
        let ctx: BinFHEContext =
            BinFHEContext::generate(BinFHEParamSet::Toy, BinFHEMethod::GINX).unwrap();
        let mut source: Source = Source::new([21u8; 32]);
        let sk: LWESecretKey = ctx.key_gen(&mut source);
        let ct1: LWECiphertext = ctx.encrypt(&sk, 1, &mut source);
        let ct2: LWECiphertext = ctx.encrypt(&sk, 1, &mut source);
        assert!(matches!(
            ctx.eval_bin_gate(BinGate::And, &ct1, &ct2),
            Err(BinFHEError::Config(_))
        ));
    }
}
