use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::GraphError;
use crate::kmer::kmer::{base_to_code, code_to_base, complement, KmerU64};

/// An owned nucleotide sequence stored as 2-bit base codes, one per byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.bases
    }

    /// Append `other`, skipping its first `overlap` bases
    pub fn append_overlapping(&mut self, other: &Sequence, overlap: usize) {
        self.bases.extend_from_slice(&other.bases[overlap.min(other.len())..]);
    }

    pub fn reverse_complement(&self) -> Sequence {
        Sequence { bases: self.bases.iter().rev().map(|&b| complement(b)).collect() }
    }

    pub fn is_palindrome(&self) -> bool {
        let n = self.bases.len();
        (0..n).all(|i| self.bases[i] == complement(self.bases[n - 1 - i]))
    }

    /// The k-mer starting at `pos`
    pub fn kmer_at(&self, pos: usize, k: usize) -> KmerU64 {
        KmerU64::from_codes(&self.bases[pos..pos + k])
    }
}

impl Index<usize> for Sequence {
    type Output = u8;

    fn index(&self, i: usize) -> &u8 {
        &self.bases[i]
    }
}

impl FromStr for Sequence {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bases = s
            .bytes()
            .enumerate()
            .map(|(position, b)| {
                base_to_code(b).ok_or(GraphError::InvalidBase { base: b as char, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sequence { bases })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.bases.iter().map(|&b| code_to_base(b) as char).collect();
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let seq: Sequence = "acGT".parse().unwrap();
        assert_eq!(seq.codes(), &[0, 1, 2, 3]);
        assert_eq!(seq.to_string(), "ACGT");
    }

    #[test]
    fn test_parse_rejects_ambiguous_base() {
        let err = "ACNT".parse::<Sequence>().unwrap_err();
        assert!(matches!(err, GraphError::InvalidBase { base: 'N', position: 2 }));
    }

    #[test]
    fn test_reverse_complement_and_palindrome() {
        let seq: Sequence = "GATTACA".parse().unwrap();
        assert_eq!(seq.reverse_complement().to_string(), "TGTAATC");
        assert!(!seq.is_palindrome());
        assert!("ACGT".parse::<Sequence>().unwrap().is_palindrome());
    }

    #[test]
    fn test_append_overlapping() {
        let mut seq: Sequence = "AAAT".parse().unwrap();
        seq.append_overlapping(&"ATCG".parse().unwrap(), 2);
        assert_eq!(seq.to_string(), "AAATCG");
    }
}
