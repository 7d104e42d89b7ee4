// Derived from the pow module of github.com/feeless/feeless@978eba7.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blake2b_simd::Params;
use rand::RngCore;

use super::{Difficulty, Hash, NetworkMode};
use crate::hexify;
use crate::util::Error;

/// An 8-byte proof-of-work nonce attached to every block as a spam
/// deterrent. The all-zero value is a sentinel the test network accepts
/// without any threshold check.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(align(8))]
pub struct Work(pub [u8; 8]);

hexify!(Work, "work");

#[static_init::dynamic]
static PARAMS: Params = {
    let mut params = Params::new();
    params.hash_length(8);
    params
};

impl Work {
    pub const LEN: usize = 8;

    /// The zero sentinel honored by the test network.
    pub const fn zero() -> Self {
        Self([0u8; Self::LEN])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; Self::LEN]
    }

    pub fn random() -> Self {
        let mut s = Self([0u8; Self::LEN]);
        rand::thread_rng().fill_bytes(&mut s.0);
        s
    }

    fn hash(work_and_subject: &[u8]) -> [u8; Self::LEN] {
        PARAMS.hash(work_and_subject).as_bytes().try_into().unwrap()
    }

    /// The check a delegate applies before accepting a block: enough work
    /// for the mode's threshold, or the zero sentinel on the test network.
    pub fn check(&self, subject: &Hash, mode: NetworkMode) -> bool {
        if self.is_zero() {
            return mode == NetworkMode::Test;
        }
        self.difficulty(subject) >= mode.threshold()
    }

    /// Block and search until a nonce clears the threshold. Prefer
    /// [`spawn_generate`] anywhere the unbounded search time matters.
    pub fn generate(subject: &Hash, threshold: Difficulty) -> Self {
        let cancel = AtomicBool::new(false);
        // The flag is never raised, so the search always yields a nonce.
        Self::search(subject, threshold, &cancel).unwrap()
    }

    fn search(subject: &Hash, threshold: Difficulty, cancel: &AtomicBool) -> Option<Self> {
        let mut work_and_subject = [0u8; Self::LEN + Hash::LEN];
        // The subject sits in the second part of the slice and never
        // changes.
        work_and_subject[Self::LEN..].copy_from_slice(subject.as_bytes());
        rand::thread_rng().fill_bytes(&mut work_and_subject[0..Self::LEN]);

        let mut since_check = 0u32;
        loop {
            if since_check == 1 << 12 {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                since_check = 0;
            }
            since_check += 1;

            // Pick a random byte position and increment.
            let idx = (rand::random::<u8>() % (Self::LEN as u8)) as usize;
            let c = work_and_subject[idx];
            work_and_subject[idx] = if c == 0xff { 0 } else { c + 1 };

            let b = Self::hash(&work_and_subject);
            if Difficulty::from_le_fixed(&b) >= threshold {
                break;
            }
        }

        let mut nonce = [0u8; Self::LEN];
        nonce.copy_from_slice(&work_and_subject[0..Self::LEN]);
        // Nonces travel over the wire in the opposite byte order to the one
        // the hasher consumes.
        nonce.reverse();
        Some(Self(nonce))
    }

    pub fn difficulty(&self, subject: &Hash) -> Difficulty {
        let mut work_and_subject = [0u8; Self::LEN + Hash::LEN];

        let mut reversed_work = self.0;
        reversed_work.reverse();

        work_and_subject[0..Self::LEN].copy_from_slice(&reversed_work);
        work_and_subject[Self::LEN..].copy_from_slice(subject.as_bytes());
        let hash = Self::hash(&work_and_subject);
        Difficulty::from_le_fixed(&hash)
    }
}

/// A proof-of-work search running on a blocking worker, off the caller's
/// critical path. Dropping the handle does not stop the search; call
/// [`WorkTask::cancel`] first.
pub struct WorkTask {
    cancel: Arc<AtomicBool>,
    handle: tokio::task::JoinHandle<Option<Work>>,
}

impl WorkTask {
    /// Ask the search to stop at its next checkpoint. `wait` then resolves
    /// to [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub async fn wait(self) -> Result<Work, Error> {
        self.handle.await?.ok_or(Error::Cancelled)
    }
}

/// Start a cancellable nonce search over `subject` at the mode's threshold.
pub fn spawn_generate(subject: Hash, mode: NetworkMode) -> WorkTask {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    let threshold = mode.threshold();
    let handle =
        tokio::task::spawn_blocking(move || Work::search(&subject, threshold, &flag));
    WorkTask { cancel, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn difficulty_fixtures() {
        // Each hash is incremented by one.
        let fixtures = vec![
            (
                "2387767168f9453db0eca227c79d7e7a31b78cafb58bd9cdee630881c70979b8",
                "c3f097857cc7106b",
                "fffffff867b3146b",
            ),
            (
                "2387767168f9453db0eca227c79d7e7a31b78cafb58bd9cdee630881c70979b9",
                "ec4f0960a70fdcbe",
                "fffffffde26451db",
            ),
            (
                "2387767168f9453db0eca227c79d7e7a31b78cafb58bd9cdee630881c70979ba",
                "b58e13f297179bc2",
                "fffffffb6fc1b4a6",
            ),
        ];

        for fixture in fixtures {
            let (hash, work, expected_difficulty) = &fixture;
            let hash = Hash::from_str(hash).unwrap();
            let work = Work::from_str(work).unwrap();
            let expected_difficulty = Difficulty::from_str(expected_difficulty).unwrap();
            assert_eq!(work.difficulty(&hash), expected_difficulty, "{:?}", &fixture);
            assert!(work.check(&hash, NetworkMode::Live), "{:?}", &fixture);
            assert!(work.check(&hash, NetworkMode::Test), "{:?}", &fixture);
        }
    }

    #[test]
    fn zero_sentinel_is_mode_gated() {
        let hash = Hash::random();
        assert!(Work::zero().check(&hash, NetworkMode::Test));
        assert!(!Work::zero().check(&hash, NetworkMode::Live));
    }

    #[test]
    fn insufficient_work_fails() {
        let hash = Hash::random();
        // Find a nonce below the live threshold; the first random one almost
        // always is, but keep drawing until the outcome is certain.
        let mut work = Work::random();
        while work.is_zero() || work.difficulty(&hash) >= Difficulty::LIVE {
            work = Work::random();
        }
        assert!(!work.check(&hash, NetworkMode::Live));
    }

    #[test]
    fn generate_work() {
        // Use the test-network difficulty so this doesn't take forever.
        let hash = Hash::random();
        let work = Work::generate(&hash, Difficulty::TEST);
        assert!(work.difficulty(&hash) >= Difficulty::TEST);
        assert!(work.check(&hash, NetworkMode::Test));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spawned_generation_completes() {
        let hash = Hash::random();
        let work = spawn_generate(hash, NetworkMode::Test).wait().await.unwrap();
        assert!(work.check(&hash, NetworkMode::Test));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancelled_generation_reports_it() {
        // The live threshold keeps the search busy long enough to observe
        // the cancellation.
        let task = spawn_generate(Hash::random(), NetworkMode::Live);
        task.cancel();
        assert!(matches!(task.wait().await, Err(Error::Cancelled)));
    }
}
