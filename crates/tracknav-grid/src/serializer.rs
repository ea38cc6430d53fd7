//! Mapping between multi-bin indices and the flat bin index.
//!
//! Axis 0 varies fastest: `g = b0 + n0 * (b1 + n1 * (b2 + ...))`.

/// Flat index of a multi-bin.
pub fn serialize<const D: usize>(nbins: &[usize; D], mbin: &[usize; D]) -> usize {
    let mut gbin = 0;
    let mut stride = 1;
    for (n, b) in nbins.iter().zip(mbin) {
        gbin += b * stride;
        stride *= n;
    }
    gbin
}

/// Multi-bin of a flat index.
pub fn deserialize<const D: usize>(nbins: &[usize; D], gbin: usize) -> [usize; D] {
    let mut rest = gbin;
    std::array::from_fn(|i| {
        let b = rest % nbins[i];
        rest /= nbins[i];
        b
    })
}
