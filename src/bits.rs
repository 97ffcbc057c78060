use strum_macros::Display;

/// Classified outcome of a flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    Ones,
    Zeros,
    Tie,
}

/// Set vs. unset bit counts over a byte sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitTally {
    pub ones: u64,
    pub zeros: u64,
}

impl BitTally {
    pub fn total(&self) -> u64 {
        self.ones + self.zeros
    }

    pub fn verdict(&self) -> Verdict {
        match self.ones.cmp(&self.zeros) {
            std::cmp::Ordering::Greater => Verdict::Ones,
            std::cmp::Ordering::Less => Verdict::Zeros,
            std::cmp::Ordering::Equal => Verdict::Tie,
        }
    }
}

/// Count every bit position of every byte. Empty input yields (0, 0).
pub fn count_bits(bytes: &[u8]) -> BitTally {
    bytes.iter().fold(BitTally::default(), |mut tally, byte| {
        let set = u64::from(byte.count_ones());
        tally.ones += set;
        tally.zeros += 8 - set;
        tally
    })
}

/// One completed flip. Fields are private so a result cannot drift from its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipResult {
    ones: u64,
    zeros: u64,
    verdict: Verdict,
}

impl FlipResult {
    pub fn from_tally(tally: BitTally) -> Self {
        Self {
            ones: tally.ones,
            zeros: tally.zeros,
            verdict: tally.verdict(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_tally(count_bits(bytes))
    }

    pub fn ones(&self) -> u64 {
        self.ones
    }

    pub fn zeros(&self) -> u64 {
        self.zeros
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}
