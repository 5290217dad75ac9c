//! Precomputed multiples for scalar multiplication.
//!
//! [`GeneratorTable`] holds `(j + 1)·2⁷ⁱ·G` for every 7-bit window `i` so that
//! [`mul_base`](crate::mul::mul_base) needs no doublings at all. It is an
//! ordinary value: build it once and pass it by reference. [`SharedTable`]
//! wraps one in a compute-once cell for callers that want a process-wide copy.
//!
//! [`LocalTable`] is the small per-call table of `1·P … 16·P` used for
//! arbitrary points.
use crate::{affine::AffinePoint, ct, jacobian::JacobianPoint};
use subtle::Choice;

/// Bits per window of the generator table.
pub const BASE_WINDOW_BITS: usize = 7;
/// Number of windows needed to cover a 256-bit scalar (plus the Booth carry).
pub const BASE_WINDOWS: usize = 37;
/// Entries per window: the magnitudes `1..=2⁶` a signed 7-bit digit can take.
pub const BASE_ENTRIES: usize = 1 << (BASE_WINDOW_BITS - 1);

/// Entries in a [`LocalTable`].
pub const LOCAL_ENTRIES: usize = 16;

/// Affine multiples of the generator, one row per 7-bit window.
#[cfg(feature = "alloc")]
#[derive(Clone)]
pub struct GeneratorTable {
    rows: alloc::vec::Vec<[AffinePoint; BASE_ENTRIES]>,
}

#[cfg(feature = "alloc")]
impl GeneratorTable {
    /// Builds the table from the generator.
    ///
    /// Row `0` is `1·G … 64·G`; each following row is the previous one
    /// doubled seven times. All 2368 points are brought to affine together
    /// with a single field inversion.
    pub fn new() -> Self {
        use alloc::vec::Vec;
        let g = AffinePoint::GENERATOR;
        let (no, yes) = (Choice::from(0), Choice::from(1));

        let mut row = [JacobianPoint::IDENTITY; BASE_ENTRIES];
        row[0] = JacobianPoint::from(g);
        row[1] = row[0].double();
        for j in 2..BASE_ENTRIES {
            // j·G never shares an x-coordinate with G here
            row[j] = row[j - 1].add_mixed(&g, no, yes, yes);
        }

        let mut points = Vec::with_capacity(BASE_WINDOWS * BASE_ENTRIES);
        points.extend_from_slice(&row);
        for _ in 1..BASE_WINDOWS {
            for point in row.iter_mut() {
                for _ in 0..BASE_WINDOW_BITS {
                    *point = point.double();
                }
            }
            points.extend_from_slice(&row);
        }

        let mut affine = alloc::vec![AffinePoint::default(); points.len()];
        JacobianPoint::normalize_batch(&points, &mut affine);

        let rows = affine
            .chunks_exact(BASE_ENTRIES)
            .map(|chunk| {
                let mut row = [AffinePoint::default(); BASE_ENTRIES];
                row.copy_from_slice(chunk);
                row
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            windows = BASE_WINDOWS,
            entries = BASE_ENTRIES,
            "built generator table"
        );

        Self { rows }
    }

    /// Returns `(index + 1)·2^(7·window)·G`.
    ///
    /// Indexes directly, so it must only be used with public positions.
    ///
    /// # Panics
    ///
    /// If `window >= 37` or `index >= 64`.
    pub fn entry(&self, window: usize, index: usize) -> &AffinePoint {
        &self.rows[window][index]
    }

    /// Returns `digit·2^(7·window)·G` for `digit` in `1..=64`, scanning the whole row.
    ///
    /// A `digit` of zero yields the all-zero placeholder point.
    pub fn select(&self, window: usize, digit: u32) -> AffinePoint {
        ct::lookup(&self.rows[window], digit.wrapping_sub(1))
    }
}

#[cfg(feature = "alloc")]
impl Default for GeneratorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "alloc")]
impl core::fmt::Debug for GeneratorTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeneratorTable")
            .field("windows", &self.rows.len())
            .field("entries", &BASE_ENTRIES)
            .finish()
    }
}

/// A [`GeneratorTable`] built on first use.
///
/// The first caller of [`SharedTable::get`] builds the table, concurrent
/// callers block until it is ready, and later calls just read it.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct SharedTable {
    cell: once_cell::sync::OnceCell<GeneratorTable>,
}

#[cfg(feature = "std")]
impl SharedTable {
    /// An empty cell.
    pub const fn new() -> Self {
        Self {
            cell: once_cell::sync::OnceCell::new(),
        }
    }

    /// Returns the table, building it if nobody has yet.
    pub fn get(&self) -> &GeneratorTable {
        self.get_or_init_with(GeneratorTable::new)
    }

    /// Like [`SharedTable::get`] but builds with `build` if the table is missing.
    ///
    /// `build` runs at most once per cell no matter how many threads race here.
    pub fn get_or_init_with(&self, build: impl FnOnce() -> GeneratorTable) -> &GeneratorTable {
        self.cell.get_or_init(|| {
            tracing::trace!("initializing shared generator table");
            build()
        })
    }

    /// Has the table been built?
    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(feature = "std")]
impl Default for SharedTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide generator table.
#[cfg(feature = "std")]
pub static GENERATOR_TABLE: SharedTable = SharedTable::new();

/// `1·P … 16·P` for some point `P`, in affine form.
#[derive(Clone, Copy, Debug)]
pub struct LocalTable {
    entries: [AffinePoint; LOCAL_ENTRIES],
}

impl LocalTable {
    /// Builds the multiples of `p` with one batched inversion.
    ///
    /// `p` must be a point on the curve.
    pub fn new(p: &AffinePoint) -> Self {
        let (no, yes) = (Choice::from(0), Choice::from(1));
        let mut multiples = [JacobianPoint::IDENTITY; LOCAL_ENTRIES];
        multiples[0] = JacobianPoint::from(p);
        multiples[1] = multiples[0].double();
        for j in 2..LOCAL_ENTRIES {
            multiples[j] = multiples[j - 1].add_mixed(p, no, yes, yes);
        }

        let mut entries = [AffinePoint::default(); LOCAL_ENTRIES];
        JacobianPoint::normalize_batch(&multiples, &mut entries);
        Self { entries }
    }

    /// Returns `digit·P` for `digit` in `1..=16`, scanning every entry.
    pub fn select(&self, digit: u32) -> AffinePoint {
        ct::lookup(&self.entries, digit.wrapping_sub(1))
    }
}
