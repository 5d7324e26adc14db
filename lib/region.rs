//! Contiguous regions of constant potential energy.

use crate::error::{ QError, QResult };

// slack allowed when comparing a computed width against the minimum width
const WIDTH_SLACK: f64 = 1e-12;

/// A half-open interval `[start, end)` (nm) with constant potential energy
/// (eV).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub start: f64,
    pub end: f64,
    pub energy: f64,
}

impl Region {
    pub fn new(start: f64, end: f64, energy: f64) -> Self {
        Self { start, end, energy }
    }

    pub fn width(&self) -> f64 { self.end - self.start }

    pub fn middle(&self) -> f64 { (self.start + self.end) / 2.0 }

    /// Closed-open containment test.
    pub fn contains(&self, x: f64) -> bool { self.start <= x && x < self.end }
}

/// An ordered, gap-free partition of a finite domain into [`Region`]s.
///
/// Every mutation is validated on a copy before being committed, so a failed
/// call leaves the list untouched. The invariants are
/// ```text
/// regions[i].end == regions[i + 1].start
/// regions[i].end - regions[i].start >= min_width > 0
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RegionList {
    regions: Vec<Region>,
    min_width: f64,
}

impl RegionList {
    /// Minimum region width (nm) used unless another is specified.
    pub const DEFAULT_MIN_WIDTH: f64 = 0.1;

    /// Create a new list with the [default minimum
    /// width][Self::DEFAULT_MIN_WIDTH].
    pub fn new(regions: Vec<Region>) -> QResult<Self> {
        Self::with_min_width(regions, Self::DEFAULT_MIN_WIDTH)
    }

    /// Create a new list with a given minimum region width.
    pub fn with_min_width(regions: Vec<Region>, min_width: f64)
        -> QResult<Self>
    {
        if !(min_width.is_finite() && min_width > 0.0) {
            return Err(QError::InvalidArgument(
                format!("minimum region width must be positive; got {min_width}")
            ));
        }
        validate(&regions, min_width)?;
        Ok(Self { regions, min_width })
    }

    /// Create a new list from `n + 1` ordered boundaries and `n` energies.
    pub fn from_boundaries(
        boundaries: &[f64],
        energies: &[f64],
        min_width: f64,
    ) -> QResult<Self>
    {
        if boundaries.len() != energies.len() + 1 {
            return Err(QError::InvalidArgument(format!(
                "expected {} boundaries for {} regions; got {}",
                energies.len() + 1, energies.len(), boundaries.len(),
            )));
        }
        let regions: Vec<Region>
            = boundaries.iter().zip(boundaries.iter().skip(1)).zip(energies)
            .map(|((&start, &end), &energy)| Region::new(start, end, energy))
            .collect();
        Self::with_min_width(regions, min_width)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.regions.len() }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn as_slice(&self) -> &[Region] { &self.regions }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> { self.regions.iter() }

    pub fn min_width(&self) -> f64 { self.min_width }

    /// Left edge of the domain.
    pub fn domain_start(&self) -> f64 { self.regions[0].start }

    /// Right edge of the domain.
    pub fn domain_end(&self) -> f64 { self.regions[self.regions.len() - 1].end }

    /// Return the index of the region containing `x`.
    ///
    /// Points left of the domain resolve to the first region; points on or
    /// right of the domain's right edge resolve to the last one.
    pub fn index_at(&self, x: f64) -> usize {
        let last = self.regions.len() - 1;
        if x < self.regions[0].start { return 0; }
        self.regions.iter()
            .position(|r| r.contains(x))
            .unwrap_or(last)
    }

    /// Replace the bounds and energy of a region, moving the boundaries shared
    /// with its neighbors to match.
    pub fn set_region(&mut self, index: usize, start: f64, end: f64, energy: f64)
        -> QResult<()>
    {
        QError::check_index(index, self.regions.len(), "region")?;
        if !(start < end) {
            return Err(QError::InvalidRegionBounds { index, start, end });
        }
        let mut candidate = self.regions.clone();
        candidate[index] = Region::new(start, end, energy);
        if index > 0 {
            candidate[index - 1].end = start;
        }
        if index + 1 < candidate.len() {
            candidate[index + 1].start = end;
        }
        validate(&candidate, self.min_width)?;
        self.regions = candidate;
        Ok(())
    }

    /// Set the potential energy of a region.
    pub fn set_energy(&mut self, index: usize, energy: f64) -> QResult<()> {
        QError::check_index(index, self.regions.len(), "region")?;
        if !energy.is_finite() {
            return Err(QError::InvalidArgument(
                format!("region energy must be finite; got {energy}")
            ));
        }
        self.regions[index].energy = energy;
        Ok(())
    }

    /// Move the boundary between regions `index` and `index + 1`.
    pub fn set_boundary(&mut self, index: usize, x: f64) -> QResult<()> {
        QError::check_index(index + 1, self.regions.len(), "boundary")?;
        let r = self.regions[index];
        self.set_region(index, r.start, x, r.energy)
    }

    /// Potential energy at `x`.
    pub fn energy_at(&self, x: f64) -> f64 {
        self.regions[self.index_at(x)].energy
    }
}

fn validate(regions: &[Region], min_width: f64) -> QResult<()> {
    if regions.is_empty() {
        return Err(QError::InvalidArgument(
            "a potential needs at least one region".into()
        ));
    }
    for (index, r) in regions.iter().enumerate() {
        let ok
            = r.start.is_finite() && r.end.is_finite() && r.energy.is_finite()
            && r.width() + WIDTH_SLACK >= min_width;
        if !ok {
            return Err(QError::InvalidRegionBounds {
                index,
                start: r.start,
                end: r.end,
            });
        }
    }
    let gap
        = regions.iter().zip(regions.iter().skip(1))
        .position(|(l, r)| l.end != r.start);
    if let Some(k) = gap {
        return Err(QError::InvalidRegionBounds {
            index: k + 1,
            start: regions[k + 1].start,
            end: regions[k + 1].end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> RegionList {
        RegionList::from_boundaries(&[-4.0, 0.0, 1.0, 4.0], &[0.0, 1.0, 0.0], 0.1)
            .unwrap()
    }

    #[test]
    fn index_lookup() {
        let regions = three();
        assert_eq!(regions.index_at(-10.0), 0);
        assert_eq!(regions.index_at(-4.0), 0);
        assert_eq!(regions.index_at(0.0), 1);
        assert_eq!(regions.index_at(0.999), 1);
        assert_eq!(regions.index_at(1.0), 2);
        assert_eq!(regions.index_at(4.0), 2);
        assert_eq!(regions.index_at(40.0), 2);
    }

    #[test]
    fn set_region_moves_neighbors() {
        let mut regions = three();
        regions.set_region(1, -0.5, 2.0, 0.7).unwrap();
        assert_eq!(regions.get(0).unwrap().end, -0.5);
        assert_eq!(regions.get(2).unwrap().start, 2.0);
        assert_eq!(regions.get(1).unwrap().energy, 0.7);
    }

    #[test]
    fn bad_bounds_are_rejected_before_commit() {
        let mut regions = three();
        let before = regions.clone();
        // inverted
        assert!(matches!(
            regions.set_region(1, 1.0, 0.0, 1.0),
            Err(QError::InvalidRegionBounds { index: 1, .. })
        ));
        // swallows the left neighbor
        assert!(matches!(
            regions.set_region(1, -5.0, 1.0, 1.0),
            Err(QError::InvalidRegionBounds { index: 0, .. })
        ));
        // right neighbor narrower than the minimum width
        assert!(matches!(
            regions.set_region(1, 0.0, 3.95, 1.0),
            Err(QError::InvalidRegionBounds { index: 2, .. })
        ));
        assert_eq!(regions, before);
    }

    #[test]
    fn gaps_are_rejected() {
        let res = RegionList::new(vec![
            Region::new(0.0, 1.0, 0.0),
            Region::new(1.5, 2.0, 0.0),
        ]);
        assert!(matches!(res, Err(QError::InvalidRegionBounds { index: 1, .. })));
        assert!(RegionList::new(vec![]).is_err());
    }
}
