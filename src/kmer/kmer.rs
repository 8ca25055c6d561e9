//! Packed k-mers over the ACGT alphabet.
//!
//! Bases are stored as 2-bit codes (A=0, C=1, G=2, T=3) with the first base in
//! the most significant position, so numeric order equals lexicographic order.
//! Under this coding the complement of a base `b` is `3 - b`.

/// Longest k-mer that fits in a `u64`.
pub const MAX_KMER_SIZE: usize = 32;

/// Map an ASCII nucleotide to its 2-bit code
#[inline]
pub fn base_to_code(b: u8) -> Option<u8> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Map a 2-bit code back to its ASCII nucleotide
#[inline]
pub fn code_to_base(code: u8) -> u8 {
    b"ACGT"[(code & 3) as usize]
}

/// Complement of a 2-bit base code
#[inline]
pub fn complement(code: u8) -> u8 {
    3 - (code & 3)
}

/// Decodes a 2-bit packed k-mer of length `k` back to a string
pub fn decode_kmer(encoded: u64, k: usize) -> String {
    (0..k)
        .map(|i| code_to_base(((encoded >> ((k - 1 - i) * 2)) & 3) as u8) as char)
        .collect()
}

/// Returns the reverse complement of a DNA sequence
pub fn reverse_complement(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|b| match b {
            b'A' | b'a' => 'T',
            b'T' | b't' => 'A',
            b'C' | b'c' => 'G',
            b'G' | b'g' => 'C',
            _ => 'N',
        })
        .collect()
}

/// A k-mer packed into a single `u64`.
///
/// The graph uses it as the content key of its begin-k-mer index: every
/// vertex is registered under the canonical form of its first k bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerU64 {
    pub encoded: u64,
    pub len: u8,
}

impl KmerU64 {
    /// Build a k-mer from 2-bit base codes. The caller guarantees
    /// `codes.len() <= MAX_KMER_SIZE`.
    pub fn from_codes(codes: &[u8]) -> Self {
        debug_assert!(codes.len() <= MAX_KMER_SIZE);
        let mut encoded = 0u64;
        for &c in codes {
            encoded = (encoded << 2) | (c & 3) as u64;
        }
        KmerU64 { encoded, len: codes.len() as u8 }
    }

    #[inline]
    fn mask(&self) -> u64 {
        if self.len as usize >= MAX_KMER_SIZE {
            u64::MAX
        } else {
            (1u64 << (2 * self.len as u32)) - 1
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.len as usize
    }

    /// Slide the window one base to the right, appending `code`
    #[inline]
    pub fn shift_append(&mut self, code: u8) {
        self.encoded = ((self.encoded << 2) | (code & 3) as u64) & self.mask();
    }

    pub fn reverse_complement(&self) -> Self {
        let mut value = self.encoded;
        let mut rc = 0u64;
        for _ in 0..self.len {
            rc = (rc << 2) | (3 - (value & 3));
            value >>= 2;
        }
        KmerU64 { encoded: rc, len: self.len }
    }

    /// The strand-independent representative: the smaller of the k-mer and
    /// its reverse complement.
    pub fn canonical(&self) -> Self {
        let rc = self.reverse_complement();
        if rc.encoded < self.encoded { rc } else { *self }
    }

    pub fn is_palindrome(&self) -> bool {
        self.reverse_complement().encoded == self.encoded
    }

    pub fn decode(&self) -> String {
        decode_kmer(self.encoded, self.size())
    }
}

impl std::fmt::Display for KmerU64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.decode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmer(seq: &str) -> KmerU64 {
        let codes: Vec<u8> = seq.bytes().map(|b| base_to_code(b).unwrap()).collect();
        KmerU64::from_codes(&codes)
    }

    #[test]
    fn test_codes_and_decode() {
        let encoded = kmer("ACGT").encoded;
        assert_eq!(encoded, 0b00_01_10_11);
        assert_eq!(decode_kmer(encoded, 4), "ACGT");
        assert_eq!(base_to_code(b'N'), None);
        assert_eq!(complement(base_to_code(b'c').unwrap()), 2);
    }

    #[test]
    fn test_shift_append() {
        let mut kmer = kmer("AAT");
        kmer.shift_append(1);
        assert_eq!(kmer.decode(), "ATC");
        kmer.shift_append(3);
        assert_eq!(kmer.to_string(), "TCT");
    }

    #[test]
    fn test_full_width_kmer() {
        let seq = "ACGTACGTACGTACGTACGTACGTACGTACGT";
        let mut kmer = kmer(seq);
        kmer.shift_append(0);
        assert_eq!(kmer.decode(), format!("{}A", &seq[1..]));
    }

    #[test]
    fn test_canonical_and_palindrome() {
        let ttg = kmer("TTG");
        assert_eq!(ttg.reverse_complement().decode(), "CAA");
        assert_eq!(ttg.canonical().decode(), "CAA");
        assert!(kmer("ACGT").is_palindrome());
        assert!(!kmer("AAC").is_palindrome());
    }

    #[test]
    fn test_reverse_complement_str() {
        assert_eq!(reverse_complement("GATTACA"), "TGTAATC");
    }
}
