//! Nonce allocation against the on-chain unordered nonce registry.
//!
//! The registry tracks spent nonces as per-owner 256-bit words; a bit, once
//! set, is never cleared. [`NonceManager`] allocates the lowest unused nonce
//! for an owner while caching the most recent word so repeated allocations
//! do not re-scan from zero.

pub mod bitmap;

use {
    alloy_primitives::{Address, Bytes, U256},
    alloy_sol_types::SolCall,
    anyhow::{Context, Result},
    contracts::INonceRegistry,
    ethrpc::{Call, ChainReading},
    std::{
        collections::{HashMap, HashSet},
        sync::Arc,
    },
    tracing::instrument,
};

/// Allocates guaranteed-unused nonces for signing addresses.
///
/// Allocated nonces are reserved optimistically in a local cache, so a
/// second allocation in the same process never hands out the same nonce
/// even before any order lands on-chain. The cache assumes a single
/// writer: other processes spending nonces for the same owner are
/// invisible to it and can cause eventual on-chain collisions.
pub struct NonceManager {
    reader: Arc<dyn ChainReading>,
    registry: Address,
    cache: HashMap<Address, CachedWord>,
}

struct CachedWord {
    word: U256,
    bitmap: U256,
}

impl NonceManager {
    /// A manager talking to the canonical registry deployment.
    pub fn new(reader: Arc<dyn ChainReading>) -> Self {
        Self {
            reader,
            registry: contracts::deployments::NONCE_REGISTRY,
            cache: HashMap::new(),
        }
    }

    /// Overrides the registry address, for chains with a non-standard
    /// deployment.
    pub fn with_registry(mut self, registry: Address) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the lowest unused nonce for the owner and reserves it
    /// locally.
    ///
    /// The word scan only moves forward: once a word saturates it is never
    /// revisited.
    #[instrument(skip(self))]
    pub async fn use_nonce(&mut self, owner: Address) -> Result<U256> {
        let (word, bitmap) = match self.cache.get(&owner) {
            Some(cached) if cached.bitmap != U256::MAX => (cached.word, cached.bitmap),
            Some(cached) => {
                self.next_free_word(owner, cached.word + U256::ONE)
                    .await?
            }
            None => self.next_free_word(owner, U256::ZERO).await?,
        };

        let bit = bitmap::first_unset_bit(bitmap).expect("scanned word has a free bit");
        self.cache.insert(
            owner,
            CachedWord {
                word,
                bitmap: bitmap::set_bit(bitmap, bit),
            },
        );

        let nonce = bitmap::build_nonce(word, bit);
        tracing::debug!(?owner, %nonce, "reserved nonce");
        Ok(nonce)
    }

    /// Whether the given nonce has been spent on-chain. Always reads the
    /// registry fresh, ignoring local reservations.
    pub async fn is_used(&self, owner: Address, nonce: U256) -> Result<bool> {
        let (word, bit) = bitmap::split_nonce(nonce);
        let bitmap = self.fetch_bitmap(owner, word).await?;
        Ok(bitmap::is_bit_set(bitmap, bit))
    }

    /// Point-checks a batch of nonces in one concurrent sweep. The result
    /// order matches the input order; each distinct word is fetched once.
    pub async fn batch_check_nonces(
        &self,
        owner: Address,
        nonces: &[U256],
    ) -> Result<Vec<bool>> {
        let words = nonces
            .iter()
            .map(|nonce| bitmap::split_nonce(*nonce).0)
            .collect::<HashSet<_>>();
        let bitmaps = futures::future::try_join_all(
            words
                .into_iter()
                .map(|word| async move { Ok::<_, anyhow::Error>((word, self.fetch_bitmap(owner, word).await?)) }),
        )
        .await?
        .into_iter()
        .collect::<HashMap<_, _>>();

        Ok(nonces
            .iter()
            .map(|nonce| {
                let (word, bit) = bitmap::split_nonce(*nonce);
                bitmap::is_bit_set(bitmaps[&word], bit)
            })
            .collect())
    }

    async fn next_free_word(&self, owner: Address, from: U256) -> Result<(U256, U256)> {
        let mut word = from;
        loop {
            let bitmap = self.fetch_bitmap(owner, word).await?;
            if bitmap != U256::MAX {
                return Ok((word, bitmap));
            }
            word += U256::ONE;
        }
    }

    async fn fetch_bitmap(&self, owner: Address, word: U256) -> Result<U256> {
        let data: Bytes = INonceRegistry::nonceBitmapCall { owner, word }
            .abi_encode()
            .into();
        let output = self
            .reader
            .call(Call {
                to: self.registry,
                data,
            })
            .await
            .context("nonce bitmap fetch failed")?;
        INonceRegistry::nonceBitmapCall::abi_decode_returns(&output)
            .context("could not decode nonce bitmap")
    }
}
