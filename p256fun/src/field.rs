//! Montgomery arithmetic modulo the two P-256 primes.
//!
//! An [`Fe<M>`] holds a value `a` in the range `[0, M)` as its Montgomery
//! residue `a·R mod M` with `R = 2²⁵⁶`. The modulus is a type parameter so a
//! coordinate (mod P) and a scalar (mod N) can never be combined by accident.
use crate::{ct, util::*};
use core::{
    fmt,
    marker::PhantomData,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// Reduction constants for one odd 256-bit modulus.
///
/// All limb arrays are little-endian.
pub trait Modulus: Copy + Clone + fmt::Debug + Default + Send + Sync + 'static {
    /// The modulus `M`.
    const MODULUS: [u64; 4];
    /// `M - 2`, the Fermat inversion exponent.
    const MODULUS_MINUS_TWO: [u64; 4];
    /// `2²⁵⁶ mod M`, i.e. one in Montgomery form.
    const R: [u64; 4];
    /// `2⁵¹² mod M`, used to move values into Montgomery form.
    const R2: [u64; 4];
    /// `-M⁻¹ mod 2⁶⁴`.
    const N0: u64;

    /// Computes `a⁻¹` as `a^(M-2)`.
    ///
    /// Moduli with a cheaper fixed addition chain override this.
    fn invert(a: &Fe<Self>) -> Fe<Self> {
        a.pow(&Self::MODULUS_MINUS_TWO)
    }
}

/// An element of the integers modulo `M`, kept in canonical Montgomery form.
pub struct Fe<M: Modulus> {
    limbs: [u64; 4],
    _modulus: PhantomData<M>,
}

impl<M: Modulus> Clone for Fe<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Modulus> Copy for Fe<M> {}

impl<M: Modulus> fmt::Debug for Fe<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.to_canonical();
        write!(
            f,
            "Fe(0x{:016x}{:016x}{:016x}{:016x})",
            c[3], c[2], c[1], c[0]
        )
    }
}

impl<M: Modulus> Fe<M> {
    /// Zero element.
    pub const ZERO: Self = Self::from_montgomery_unchecked([0; 4]);

    /// Multiplicative identity.
    pub const ONE: Self = Self::from_montgomery_unchecked(M::R);

    /// Wraps limbs that are already a canonical Montgomery residue.
    pub(crate) const fn from_montgomery_unchecked(limbs: [u64; 4]) -> Self {
        Self {
            limbs,
            _modulus: PhantomData,
        }
    }

    /// Interprets `limbs` as a Montgomery residue.
    ///
    /// Returns `None` if the limbs are not below the modulus.
    pub fn from_montgomery(limbs: [u64; 4]) -> CtOption<Self> {
        CtOption::new(Self::from_montgomery_unchecked(limbs), is_canonical::<M>(&limbs))
    }

    /// The raw Montgomery residue `a·R mod M`.
    pub fn to_montgomery(&self) -> [u64; 4] {
        self.limbs
    }

    /// Converts an integer into Montgomery form.
    ///
    /// Returns `None` if `limbs` is not below the modulus.
    pub fn from_canonical(limbs: [u64; 4]) -> CtOption<Self> {
        let fe = Self::from_montgomery_unchecked(montgomery_mul::<M>(&limbs, &M::R2));
        CtOption::new(fe, is_canonical::<M>(&limbs))
    }

    /// Converts any 256-bit integer into Montgomery form after reducing it modulo `M`.
    ///
    /// Both moduli exceed 2²⁵⁵ so a single conditional subtraction is enough.
    pub fn from_uint_reduced(limbs: [u64; 4]) -> Self {
        let reduced = reduce_once::<M>(&limbs, 0);
        Self::from_montgomery_unchecked(montgomery_mul::<M>(&reduced, &M::R2))
    }

    /// Converts out of Montgomery form, returning the integer value in `[0, M)`.
    pub fn to_canonical(&self) -> [u64; 4] {
        montgomery_mul::<M>(&self.limbs, &[1, 0, 0, 0])
    }

    /// Reads the integer value from 32 big-endian bytes.
    ///
    /// A plain integer conversion for fixed vectors and callers that already
    /// hold 32-byte values. No point or wire encoding lives in this crate.
    /// Returns `None` if the value is not below the modulus.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        Self::from_canonical(limbs_from_be_bytes(bytes))
    }

    /// The integer value as 32 big-endian bytes. Inverse of [`Fe::from_bytes`].
    pub fn to_bytes(&self) -> [u8; 32] {
        limbs_to_be_bytes(&self.to_canonical())
    }

    /// Small integer constructor.
    pub fn from_u64(value: u64) -> Self {
        Self::from_uint_reduced([value, 0, 0, 0])
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        ct::limbs_are_zero(&self.limbs)
    }

    /// Determine if the integer value (not its Montgomery residue) is odd.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.to_canonical()[0] & 1) as u8)
    }

    /// Montgomery multiplication: given residues of `a` and `b` returns the residue of `a·b`.
    pub fn montgomery_mul(a: &Self, b: &Self) -> Self {
        Self::from_montgomery_unchecked(montgomery_mul::<M>(&a.limbs, &b.limbs))
    }

    /// Returns `self * rhs mod M`.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::montgomery_mul(self, rhs)
    }

    /// Returns `self * self mod M`.
    pub fn square(&self) -> Self {
        Self::montgomery_mul(self, self)
    }

    /// Squares `k` times in a row.
    pub fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns `self + rhs mod M`.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add4(&self.limbs, &rhs.limbs);
        Self::from_montgomery_unchecked(reduce_once::<M>(&sum, carry))
    }

    /// Returns `self - rhs mod M`.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub4(&self.limbs, &rhs.limbs);
        let modulus = M::MODULUS.map(|limb| limb & borrow);
        let (fixed, _) = add4(&diff, &modulus);
        Self::from_montgomery_unchecked(fixed)
    }

    /// Returns `-self mod M`.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns `2·self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `3·self`.
    pub fn triple(&self) -> Self {
        self.double().add(self)
    }

    /// Returns `self / 2`.
    ///
    /// Adds the modulus when the residue is odd and shifts right by one, so
    /// no inversion is involved.
    pub fn half(&self) -> Self {
        let odd = Choice::from((self.limbs[0] & 1) as u8);
        let modulus = M::MODULUS.map(|limb| limb & ct::mask(odd));
        let (sum, carry) = add4(&self.limbs, &modulus);
        Self::from_montgomery_unchecked([
            (sum[0] >> 1) | (sum[1] << 63),
            (sum[1] >> 1) | (sum[2] << 63),
            (sum[2] >> 1) | (sum[3] << 63),
            (sum[3] >> 1) | (carry << 63),
        ])
    }

    /// Raises `self` to a public exponent given as little-endian limbs.
    ///
    /// Runs a fixed 4-bit window: the sequence of operations depends only on
    /// the exponent, never on `self`.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut powers = [Self::ONE; 16];
        for i in 1..16 {
            powers[i] = powers[i - 1].mul(self);
        }

        let mut acc = Self::ONE;
        for limb in exp.iter().rev() {
            for nibble in (0..16).rev() {
                acc = acc.pow2k(4);
                acc = acc.mul(&powers[((limb >> (nibble * 4)) & 0xf) as usize]);
            }
        }
        acc
    }

    /// Returns the multiplicative inverse in constant time.
    ///
    /// The inverse of zero comes out as zero. Callers must not rely on that.
    pub fn invert(&self) -> Self {
        M::invert(self)
    }

    /// Returns the multiplicative inverse, if self is non-zero.
    pub fn try_invert(&self) -> CtOption<Self> {
        CtOption::new(self.invert(), !self.is_zero())
    }

    /// Returns the multiplicative inverse using a binary extended GCD.
    ///
    /// **Not constant time.** This exists to cross-check [`Fe::invert`] and must
    /// never see secret values.
    pub fn invert_vartime(&self) -> Self {
        let inverse = crate::inverse::binary_gcd_inverse(&self.to_canonical(), &M::MODULUS);
        Self::from_montgomery_unchecked(montgomery_mul::<M>(&inverse, &M::R2))
    }
}

/// Returns `Choice(1)` when `limbs < M`.
fn is_canonical<M: Modulus>(limbs: &[u64; 4]) -> Choice {
    let (_, borrow) = sub4(limbs, &M::MODULUS);
    Choice::from((borrow & 1) as u8)
}

/// Reduces a value below `2M` (given as four limbs plus a carry bit) to `[0, M)`.
#[inline(always)]
fn reduce_once<M: Modulus>(limbs: &[u64; 4], carry: u64) -> [u64; 4] {
    let (diff, borrow) = sub4(limbs, &M::MODULUS);
    let (_, borrow) = sbb(carry, 0, borrow);
    // borrow is all ones exactly when the value was already below M
    ct::select_limbs(&diff, limbs, Choice::from((borrow & 1) as u8))
}

/// Computes `a·b·R⁻¹ mod M` using interleaved (CIOS) Montgomery reduction.
///
/// Both inputs must be below `M`; the output is below `M`.
fn montgomery_mul<M: Modulus>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let m = &M::MODULUS;
    let mut t = [0u64; 6];

    for &bi in b.iter() {
        let mut carry = 0;
        for j in 0..4 {
            (t[j], carry) = mac(t[j], a[j], bi, carry);
        }
        (t[4], carry) = adc(t[4], carry, 0);
        t[5] = carry;

        let k = t[0].wrapping_mul(M::N0);
        let (_, mut carry) = mac(t[0], k, m[0], 0);
        for j in 1..4 {
            (t[j - 1], carry) = mac(t[j], k, m[j], carry);
        }
        (t[3], carry) = adc(t[4], carry, 0);
        t[4] = t[5] + carry;
    }

    reduce_once::<M>(&[t[0], t[1], t[2], t[3]], t[4])
}

fn limbs_from_be_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.rchunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[i] = u64::from_be_bytes(word);
    }
    limbs
}

fn limbs_to_be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, chunk) in bytes.rchunks_exact_mut(8).enumerate() {
        chunk.copy_from_slice(&limbs[i].to_be_bytes());
    }
    bytes
}

impl<M: Modulus> ConditionallySelectable for Fe<M> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_montgomery_unchecked(ct::select_limbs(&a.limbs, &b.limbs, choice))
    }
}

impl<M: Modulus> ConstantTimeEq for Fe<M> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}

impl<M: Modulus> Default for Fe<M> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<M: Modulus> Eq for Fe<M> {}

impl<M: Modulus> PartialEq for Fe<M> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<M: Modulus> Add<Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn add(self, other: Fe<M>) -> Fe<M> {
        Fe::add(&self, &other)
    }
}

impl<M: Modulus> Add<&Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn add(self, other: &Fe<M>) -> Fe<M> {
        Fe::add(&self, other)
    }
}

impl<M: Modulus> Add<&Fe<M>> for &Fe<M> {
    type Output = Fe<M>;

    fn add(self, other: &Fe<M>) -> Fe<M> {
        Fe::add(self, other)
    }
}

impl<M: Modulus> AddAssign<Fe<M>> for Fe<M> {
    fn add_assign(&mut self, other: Fe<M>) {
        *self = Fe::add(self, &other);
    }
}

impl<M: Modulus> AddAssign<&Fe<M>> for Fe<M> {
    fn add_assign(&mut self, other: &Fe<M>) {
        *self = Fe::add(self, other);
    }
}

impl<M: Modulus> Sub<Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn sub(self, other: Fe<M>) -> Fe<M> {
        Fe::sub(&self, &other)
    }
}

impl<M: Modulus> Sub<&Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn sub(self, other: &Fe<M>) -> Fe<M> {
        Fe::sub(&self, other)
    }
}

impl<M: Modulus> Sub<&Fe<M>> for &Fe<M> {
    type Output = Fe<M>;

    fn sub(self, other: &Fe<M>) -> Fe<M> {
        Fe::sub(self, other)
    }
}

impl<M: Modulus> SubAssign<Fe<M>> for Fe<M> {
    fn sub_assign(&mut self, other: Fe<M>) {
        *self = Fe::sub(self, &other);
    }
}

impl<M: Modulus> SubAssign<&Fe<M>> for Fe<M> {
    fn sub_assign(&mut self, other: &Fe<M>) {
        *self = Fe::sub(self, other);
    }
}

impl<M: Modulus> Mul<Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn mul(self, other: Fe<M>) -> Fe<M> {
        Fe::mul(&self, &other)
    }
}

impl<M: Modulus> Mul<&Fe<M>> for Fe<M> {
    type Output = Fe<M>;

    fn mul(self, other: &Fe<M>) -> Fe<M> {
        Fe::mul(&self, other)
    }
}

impl<M: Modulus> Mul<&Fe<M>> for &Fe<M> {
    type Output = Fe<M>;

    fn mul(self, other: &Fe<M>) -> Fe<M> {
        Fe::mul(self, other)
    }
}

impl<M: Modulus> MulAssign<Fe<M>> for Fe<M> {
    fn mul_assign(&mut self, rhs: Fe<M>) {
        *self = Fe::mul(self, &rhs);
    }
}

impl<M: Modulus> MulAssign<&Fe<M>> for Fe<M> {
    fn mul_assign(&mut self, rhs: &Fe<M>) {
        *self = Fe::mul(self, rhs);
    }
}

impl<M: Modulus> Neg for Fe<M> {
    type Output = Fe<M>;

    fn neg(self) -> Fe<M> {
        self.negate()
    }
}

impl<M: Modulus> Neg for &Fe<M> {
    type Output = Fe<M>;

    fn neg(self) -> Fe<M> {
        self.negate()
    }
}
