use crate::PublicKey;

#[cfg(not(feature = "fake_crypto"))]
type Inner = milagro_bls::PublicKey;
#[cfg(feature = "fake_crypto")]
type Inner = ();

/// The pointwise sum of several `PublicKey`s, used to verify an `IndexedAttestation`'s signature
/// against its full `attesting_indices` set without needing per-signer verification.
#[derive(Clone)]
pub struct AggregatePublicKey(Inner);

impl AggregatePublicKey {
    #[cfg(not(feature = "fake_crypto"))]
    pub fn aggregate(public_keys: &[&PublicKey]) -> Result<Self, crate::Error> {
        if public_keys.is_empty() {
            return Err(crate::Error::EmptyAggregate);
        }
        let mut agg = public_keys[0].raw().clone();
        for pk in &public_keys[1..] {
            agg.add_assign(pk.raw());
        }
        Ok(Self(agg))
    }

    #[cfg(feature = "fake_crypto")]
    pub fn aggregate(public_keys: &[&PublicKey]) -> Result<Self, crate::Error> {
        if public_keys.is_empty() {
            return Err(crate::Error::EmptyAggregate);
        }
        Ok(Self(()))
    }

    #[cfg(not(feature = "fake_crypto"))]
    pub fn into_public_key(self) -> PublicKey {
        PublicKey::from_raw(self.0)
    }

    #[cfg(feature = "fake_crypto")]
    pub fn into_public_key(self) -> PublicKey {
        PublicKey::from_raw([0; crate::BLS_PUBLIC_KEY_BYTE_SIZE])
    }
}
